//! The Monday-anchored week window that bounds a forecast import.

use time::{Date, Duration, Weekday};

use crate::Error;

/// The five business days of a forecast week.
///
/// Header dates outside this window are discarded and the per-line value
/// arrays are sized to the dates that survive the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    start: Date,
    end: Date,
}

impl WeekWindow {
    /// Creates the window for the week starting on `start`.
    ///
    /// # Errors
    /// Returns [Error::NotMonday] if `start` is not a Monday.
    pub fn new(start: Date) -> Result<WeekWindow, Error> {
        if start.weekday() != Weekday::Monday {
            return Err(Error::NotMonday(start));
        }

        Ok(WeekWindow {
            start,
            end: start + Duration::days(4),
        })
    }

    /// The Monday the window starts on.
    pub fn start(&self) -> Date {
        self.start
    }

    /// The Friday the window ends on (inclusive).
    pub fn end(&self) -> Date {
        self.end
    }

    /// Whether `date` falls on one of the window's five business days.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// The five dates of the window, Monday through Friday.
    pub fn dates(&self) -> Vec<Date> {
        (0..5).map(|offset| self.start + Duration::days(offset)).collect()
    }
}

#[cfg(test)]
mod week_window_tests {
    use time::macros::date;

    use crate::Error;

    use super::WeekWindow;

    #[test]
    fn rejects_non_monday() {
        assert_eq!(
            WeekWindow::new(date!(2025 - 03 - 18)),
            Err(Error::NotMonday(date!(2025 - 03 - 18)))
        );
    }

    #[test]
    fn spans_monday_to_friday() {
        let window = WeekWindow::new(date!(2025 - 03 - 17)).expect("Monday should be accepted");

        assert_eq!(window.start(), date!(2025 - 03 - 17));
        assert_eq!(window.end(), date!(2025 - 03 - 21));
        assert!(window.contains(date!(2025 - 03 - 19)));
        assert!(!window.contains(date!(2025 - 03 - 22)));
    }

    #[test]
    fn dates_are_the_five_business_days() {
        let window = WeekWindow::new(date!(2025 - 03 - 17)).expect("Monday should be accepted");

        assert_eq!(
            window.dates(),
            vec![
                date!(2025 - 03 - 17),
                date!(2025 - 03 - 18),
                date!(2025 - 03 - 19),
                date!(2025 - 03 - 20),
                date!(2025 - 03 - 21),
            ]
        );
    }
}
