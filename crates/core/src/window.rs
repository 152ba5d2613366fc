//! Reservation windows and half-open interval math.
//!
//! Two booking models coexist: whole-day check-in/check-out ranges priced
//! per night, and hourly slots within a single day. Both are variants of
//! one [`ReservationWindow`] union so the availability engine can answer a
//! single query contract.
//!
//! All intervals are half-open (`[start, end)`): a checkout day is free for
//! the next check-in, and a slot ending at 10:00 does not collide with one
//! starting at 10:00.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed duration of a bookable hourly slot, in minutes.
pub const SLOT_MINUTES: i64 = 60;

/// First bookable slot start (business hours open).
pub const SLOT_OPEN_HOUR: u32 = 9;

/// Last bookable slot start.
pub const SLOT_LAST_HOUR: u32 = 17;

/// Date format used at every boundary (`2024-06-10`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format used at every boundary (`14:00`).
pub const TIME_FORMAT: &str = "%H:%M";

/// Errors for invalid reservation windows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    /// Check-out is not strictly after check-in (zero nights).
    #[error("check-out must be after check-in")]
    EmptyDayRange,
    /// Slot end is not strictly after its start.
    #[error("slot end must be after its start")]
    EmptyTimeSlot,
    /// A date or time string at the boundary failed to parse.
    #[error("invalid date or time: {0}")]
    Unparseable(String),
}

/// A reservation window: either a whole-day range or an hourly slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReservationWindow {
    /// Half-open day interval `[check_in, check_out)`; one night per day.
    DayRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    /// Half-open minute interval `[start, end)` within a single day.
    TimeSlot {
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    },
}

impl ReservationWindow {
    /// Build a one-hour slot window from a catalog start time.
    #[must_use]
    pub fn from_slot_start(date: NaiveDate, start: NaiveTime) -> Self {
        Self::TimeSlot {
            date,
            start,
            end: start + Duration::minutes(SLOT_MINUTES),
        }
    }

    /// Check the window's structural invariant.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::EmptyDayRange`] or [`WindowError::EmptyTimeSlot`]
    /// for zero-length or inverted intervals. These are never valid probes
    /// and must never reach the booking store.
    pub fn validate(&self) -> Result<(), WindowError> {
        match self {
            Self::DayRange {
                check_in,
                check_out,
            } if check_out <= check_in => Err(WindowError::EmptyDayRange),
            Self::TimeSlot { start, end, .. } if end <= start => Err(WindowError::EmptyTimeSlot),
            _ => Ok(()),
        }
    }

    /// Half-open overlap test between two windows.
    ///
    /// Same-kind windows intersect iff `a.start < b.end && b.start < a.end`.
    /// Across kinds, a whole-day reservation occupies every slot of its
    /// days, so a slot conflicts with a day range iff its date falls inside
    /// the range. Invalid windows never overlap anything.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.validate().is_err() || other.validate().is_err() {
            return false;
        }
        match (self, other) {
            (
                Self::DayRange {
                    check_in: a_in,
                    check_out: a_out,
                },
                Self::DayRange {
                    check_in: b_in,
                    check_out: b_out,
                },
            ) => a_in < b_out && b_in < a_out,
            (
                Self::TimeSlot {
                    date: a_date,
                    start: a_start,
                    end: a_end,
                },
                Self::TimeSlot {
                    date: b_date,
                    start: b_start,
                    end: b_end,
                },
            ) => a_date == b_date && a_start < b_end && b_start < a_end,
            (
                Self::DayRange {
                    check_in,
                    check_out,
                },
                Self::TimeSlot { date, .. },
            )
            | (
                Self::TimeSlot { date, .. },
                Self::DayRange {
                    check_in,
                    check_out,
                },
            ) => check_in <= date && date < check_out,
        }
    }

    /// Whether a day-range window covers day `d`. Slots cover only their
    /// own date.
    #[must_use]
    pub fn contains_day(&self, d: NaiveDate) -> bool {
        match self {
            Self::DayRange {
                check_in,
                check_out,
            } => *check_in <= d && d < *check_out,
            Self::TimeSlot { date, .. } => *date == d,
        }
    }

    /// Number of nights for a day range, clamped to zero. Slots have no
    /// night count.
    #[must_use]
    pub fn nights(&self) -> i64 {
        match self {
            Self::DayRange {
                check_in,
                check_out,
            } => (*check_out - *check_in).num_days().max(0),
            Self::TimeSlot { .. } => 0,
        }
    }

    /// Total price of a day-range stay at the given nightly rate.
    #[must_use]
    pub fn total_price(&self, price_per_night: Decimal) -> Decimal {
        Decimal::from(self.nights()) * price_per_night
    }

    /// Chronological sort key: a day range starts at midnight of its
    /// check-in day, a slot at its start time.
    #[must_use]
    pub fn start_key(&self) -> NaiveDateTime {
        match self {
            Self::DayRange { check_in, .. } => check_in.and_time(NaiveTime::MIN),
            Self::TimeSlot { date, start, .. } => date.and_time(*start),
        }
    }
}

impl std::fmt::Display for ReservationWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DayRange {
                check_in,
                check_out,
            } => write!(
                f,
                "{} \u{2192} {}",
                check_in.format(DATE_FORMAT),
                check_out.format(DATE_FORMAT)
            ),
            Self::TimeSlot { date, start, end } => write!(
                f,
                "{} {} - {}",
                date.format(DATE_FORMAT),
                start.format(TIME_FORMAT),
                end.format(TIME_FORMAT)
            ),
        }
    }
}

/// Parse a boundary date string (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns [`WindowError::Unparseable`] for malformed input.
pub fn parse_date(s: &str) -> Result<NaiveDate, WindowError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| WindowError::Unparseable(s.to_owned()))
}

/// Parse a boundary time string (24-hour `HH:mm`).
///
/// # Errors
///
/// Returns [`WindowError::Unparseable`] for malformed input.
pub fn parse_time(s: &str) -> Result<NaiveTime, WindowError> {
    NaiveTime::parse_from_str(s, TIME_FORMAT).map_err(|_| WindowError::Unparseable(s.to_owned()))
}

/// The fixed catalog of daily slot start times (hourly, business hours).
#[must_use]
pub fn slot_catalog() -> Vec<NaiveTime> {
    (SLOT_OPEN_HOUR..=SLOT_LAST_HOUR)
        .filter_map(|h| NaiveTime::from_hms_opt(h, 0, 0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).expect("test date")
    }

    fn time(s: &str) -> NaiveTime {
        parse_time(s).expect("test time")
    }

    fn range(check_in: &str, check_out: &str) -> ReservationWindow {
        ReservationWindow::DayRange {
            check_in: date(check_in),
            check_out: date(check_out),
        }
    }

    fn slot(d: &str, start: &str, end: &str) -> ReservationWindow {
        ReservationWindow::TimeSlot {
            date: date(d),
            start: time(start),
            end: time(end),
        }
    }

    #[test]
    fn test_validate_rejects_empty_and_inverted() {
        assert_eq!(
            range("2024-06-10", "2024-06-10").validate(),
            Err(WindowError::EmptyDayRange)
        );
        assert_eq!(
            range("2024-06-12", "2024-06-10").validate(),
            Err(WindowError::EmptyDayRange)
        );
        assert_eq!(
            slot("2024-06-10", "10:00", "10:00").validate(),
            Err(WindowError::EmptyTimeSlot)
        );
        assert!(range("2024-06-10", "2024-06-11").validate().is_ok());
    }

    #[test]
    fn test_day_range_half_open_overlap() {
        let existing = range("2024-06-10", "2024-06-12");
        // Overlap on 06-11
        assert!(existing.overlaps(&range("2024-06-11", "2024-06-13")));
        // Exactly adjacent: checkout day is the next check-in, no conflict
        assert!(!existing.overlaps(&range("2024-06-12", "2024-06-14")));
        assert!(!existing.overlaps(&range("2024-06-08", "2024-06-10")));
        // Containment
        assert!(existing.overlaps(&range("2024-06-09", "2024-06-13")));
    }

    #[test]
    fn test_time_slot_half_open_overlap() {
        let existing = slot("2024-06-10", "09:30", "10:30");
        assert!(existing.overlaps(&slot("2024-06-10", "09:00", "10:00")));
        assert!(existing.overlaps(&slot("2024-06-10", "10:00", "11:00")));
        assert!(!existing.overlaps(&slot("2024-06-10", "10:30", "11:30")));
        assert!(!existing.overlaps(&slot("2024-06-10", "08:30", "09:30")));
        // Different calendar date never conflicts
        assert!(!existing.overlaps(&slot("2024-06-11", "09:30", "10:30")));
    }

    #[test]
    fn test_cross_kind_overlap() {
        let stay = range("2024-06-10", "2024-06-12");
        // A whole-day stay occupies every slot of its days
        assert!(stay.overlaps(&slot("2024-06-10", "10:00", "11:00")));
        assert!(stay.overlaps(&slot("2024-06-11", "16:00", "17:00")));
        // The checkout day itself is free
        assert!(!stay.overlaps(&slot("2024-06-12", "09:00", "10:00")));
    }

    #[test]
    fn test_invalid_windows_are_vacuously_non_blocking() {
        let empty = range("2024-06-10", "2024-06-10");
        let existing = range("2024-06-01", "2024-06-30");
        assert!(!empty.overlaps(&existing));
        assert!(!existing.overlaps(&empty));
    }

    #[test]
    fn test_nights_and_price() {
        use rust_decimal_macros::dec;

        assert_eq!(range("2024-06-10", "2024-06-13").nights(), 3);
        assert_eq!(range("2024-06-10", "2024-06-10").nights(), 0);
        assert_eq!(range("2024-06-12", "2024-06-10").nights(), 0);
        assert_eq!(
            range("2024-06-10", "2024-06-12").total_price(dec!(150)),
            dec!(300)
        );
        assert_eq!(slot("2024-06-10", "09:00", "10:00").nights(), 0);
    }

    #[test]
    fn test_slot_catalog_business_hours() {
        let catalog = slot_catalog();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.first().copied(), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(catalog.last().copied(), NaiveTime::from_hms_opt(17, 0, 0));
    }

    #[test]
    fn test_from_slot_start_is_one_hour() {
        let w = ReservationWindow::from_slot_start(date("2024-06-10"), time("14:00"));
        assert_eq!(w, slot("2024-06-10", "14:00", "15:00"));
        assert!(w.validate().is_ok());
    }

    #[test]
    fn test_start_key_orders_windows_chronologically() {
        let mut windows = vec![
            range("2024-07-01", "2024-07-03"),
            slot("2024-06-11", "09:00", "10:00"),
            range("2024-06-12", "2024-06-14"),
            slot("2024-06-11", "14:00", "15:00"),
        ];
        windows.sort_by_key(ReservationWindow::start_key);
        assert_eq!(
            windows,
            vec![
                slot("2024-06-11", "09:00", "10:00"),
                slot("2024-06-11", "14:00", "15:00"),
                range("2024-06-12", "2024-06-14"),
                range("2024-07-01", "2024-07-03"),
            ]
        );
        // A stay sorts at midnight, ahead of that day's slots
        assert!(
            range("2024-06-11", "2024-06-12").start_key()
                < slot("2024-06-11", "09:00", "10:00").start_key()
        );
    }

    #[test]
    fn test_boundary_formats() {
        assert_eq!(
            range("2024-06-10", "2024-06-12").to_string(),
            "2024-06-10 \u{2192} 2024-06-12"
        );
        assert_eq!(
            slot("2024-06-10", "09:00", "10:00").to_string(),
            "2024-06-10 09:00 - 10:00"
        );
        assert!(parse_date("06/10/2024").is_err());
        assert!(parse_time("9am").is_err());
    }
}
