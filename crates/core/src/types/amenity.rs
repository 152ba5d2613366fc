//! Amenities and the fixed amenity catalog.
//!
//! Rooms advertise amenities drawn from a fixed catalog. Admin create/edit
//! paths validate by set membership against [`standard_amenities`] rather
//! than accepting free text.

use serde::{Deserialize, Serialize};

/// Icon category for an amenity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmenityIcon {
    Users,
    Wifi,
    Tv,
    Coffee,
    Wind,
    Presentation,
    Mic,
    Pool,
}

impl AmenityIcon {
    /// Stable identifier used in templates and form values.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Wifi => "wifi",
            Self::Tv => "tv",
            Self::Coffee => "coffee",
            Self::Wind => "wind",
            Self::Presentation => "presentation",
            Self::Mic => "mic",
            Self::Pool => "pool",
        }
    }
}

impl std::fmt::Display for AmenityIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AmenityIcon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(Self::Users),
            "wifi" => Ok(Self::Wifi),
            "tv" => Ok(Self::Tv),
            "coffee" => Ok(Self::Coffee),
            "wind" => Ok(Self::Wind),
            "presentation" => Ok(Self::Presentation),
            "mic" => Ok(Self::Mic),
            "pool" => Ok(Self::Pool),
            _ => Err(format!("invalid amenity icon: {s}")),
        }
    }
}

/// A room amenity: display name plus icon category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amenity {
    /// Display name (e.g., "Wi-Fi").
    pub name: String,
    /// Icon category tag.
    pub icon: AmenityIcon,
}

impl Amenity {
    /// Create an amenity.
    #[must_use]
    pub fn new(name: impl Into<String>, icon: AmenityIcon) -> Self {
        Self {
            name: name.into(),
            icon,
        }
    }
}

/// The fixed catalog of amenities offered in admin create/edit forms.
#[must_use]
pub fn standard_amenities() -> Vec<Amenity> {
    vec![
        Amenity::new("Wi-Fi", AmenityIcon::Wifi),
        Amenity::new("Whiteboard", AmenityIcon::Presentation),
        Amenity::new("Pool", AmenityIcon::Pool),
        Amenity::new("TV Screen", AmenityIcon::Tv),
        Amenity::new("Video Conferencing", AmenityIcon::Mic),
        Amenity::new("Catering Available", AmenityIcon::Coffee),
        Amenity::new("Air Conditioning", AmenityIcon::Wind),
        Amenity::new("Coffee Machine", AmenityIcon::Coffee),
        Amenity::new("Multiple Screens", AmenityIcon::Tv),
        Amenity::new("Smart Board", AmenityIcon::Presentation),
    ]
}

/// Resolve a set of selected names against the standard catalog.
///
/// Names not present in the catalog are silently dropped, which is what
/// keeps amenity assignment set-membership based.
#[must_use]
pub fn amenities_from_names<'a, I>(names: I) -> Vec<Amenity>
where
    I: IntoIterator<Item = &'a str>,
{
    let selected: std::collections::HashSet<&str> = names.into_iter().collect();
    standard_amenities()
        .into_iter()
        .filter(|a| selected.contains(a.name.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_membership() {
        let picked = amenities_from_names(["Wi-Fi", "Sauna", "Smart Board"]);
        let names: Vec<&str> = picked.iter().map(|a| a.name.as_str()).collect();
        // "Sauna" is not in the catalog and gets dropped
        assert_eq!(names, ["Wi-Fi", "Smart Board"]);
    }

    #[test]
    fn test_icon_round_trip() {
        for amenity in standard_amenities() {
            let parsed: AmenityIcon = amenity.icon.as_str().parse().expect("icon parses");
            assert_eq!(parsed, amenity.icon);
        }
    }
}
