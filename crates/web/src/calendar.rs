//! Month-grid view model for the range-picker calendar.
//!
//! The two-click state machine runs server-side: every enabled day cell
//! links to the URL whose query parameters encode the selection state that
//! clicking the day would produce. Rendering is a pure function of the
//! booking store snapshot and the current selection.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use roomboard_core::{is_blocked, BookingId, BookingStore, RangeSelection, ReservationWindow, RoomId};

/// One clickable (or disabled) day cell.
pub struct DayCell {
    /// Day of month, 1-based.
    pub day: u32,
    /// Space-separated CSS classes describing the cell's state.
    pub classes: String,
    /// Click target encoding the next selection state; `None` when the day
    /// is disabled (past or blocked).
    pub href: Option<String>,
}

/// A month of day cells arranged in Sunday-first weeks.
pub struct CalendarMonth {
    /// Heading, e.g. "June 2024".
    pub title: String,
    /// Link to the previous month, preserving the selection.
    pub prev_href: String,
    /// Link to the next month, preserving the selection.
    pub next_href: String,
    /// Seven cells per row; `None` pads the first and last week.
    pub weeks: Vec<Vec<Option<DayCell>>>,
}

/// Serialize a selection into query-parameter pairs.
fn selection_params(selection: RangeSelection) -> String {
    let mut parts = Vec::new();
    if let Some(from) = selection.from {
        parts.push(format!("from={}", from.format("%Y-%m-%d")));
    }
    if let Some(to) = selection.to {
        parts.push(format!("to={}", to.format("%Y-%m-%d")));
    }
    parts.join("&")
}

/// Build the page URL for a month and selection.
fn month_href(base_path: &str, year: i32, month: u32, selection: RangeSelection) -> String {
    let mut href = format!("{base_path}?month={year:04}-{month:02}");
    let params = selection_params(selection);
    if !params.is_empty() {
        href.push('&');
        href.push_str(&params);
    }
    href
}

/// The month before `(year, month)`.
const fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

/// The month after `(year, month)`.
const fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Build the calendar grid for one month of one room's availability.
///
/// `exclude` is forwarded to the availability engine so an edit-in-progress
/// booking can re-select its own window.
#[must_use]
pub fn build_calendar(
    base_path: &str,
    store: &BookingStore,
    room_id: RoomId,
    exclude: Option<BookingId>,
    selection: RangeSelection,
    today: NaiveDate,
    year: i32,
    month: u32,
) -> CalendarMonth {
    let day_blocked = |d: NaiveDate| {
        let probe = ReservationWindow::DayRange {
            check_in: d,
            check_out: d + Duration::days(1),
        };
        is_blocked(store, room_id, &probe, exclude)
    };

    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or_else(|| today.with_day(1).unwrap_or(today));
    let title = first.format("%B %Y").to_string();

    let (py, pm) = prev_month(first.year(), first.month());
    let (ny, nm) = next_month(first.year(), first.month());
    let prev_href = month_href(base_path, py, pm, selection);
    let next_href = month_href(base_path, ny, nm, selection);

    let mut weeks: Vec<Vec<Option<DayCell>>> = Vec::new();
    let mut week: Vec<Option<DayCell>> = Vec::new();

    // Leading pad up to the first day's weekday (Sunday-first grid)
    for _ in 0..first.weekday().num_days_from_sunday() {
        week.push(None);
    }

    let mut day = first;
    while day.month() == first.month() {
        let enabled = RangeSelection::day_enabled(day, today, &day_blocked);
        let next_state = selection.click(day, today, &day_blocked);

        let mut classes = Vec::new();
        if day == today {
            classes.push("today");
        }
        if !enabled {
            classes.push(if day < today { "past" } else { "blocked" });
        }
        if selection.from == Some(day) {
            classes.push("sel-start");
        }
        if selection.to == Some(day) {
            classes.push("sel-end");
        }
        if let (Some(from), Some(to)) = (selection.from, selection.to) {
            if from < day && day < to {
                classes.push("in-range");
            }
        }

        week.push(Some(DayCell {
            day: day.day(),
            classes: classes.join(" "),
            href: enabled.then(|| month_href(base_path, first.year(), first.month(), next_state)),
        }));

        if week.len() == 7 {
            weeks.push(std::mem::take(&mut week));
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    if !week.is_empty() {
        while week.len() < 7 {
            week.push(None);
        }
        weeks.push(week);
    }

    CalendarMonth {
        title,
        prev_href,
        next_href,
        weeks,
    }
}
