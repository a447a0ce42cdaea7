//! Time Provider Abstraction
//!
//! Age computation needs "the current year" for living people. Reading it
//! through a trait keeps ages deterministic under test.
//!
//! # Examples
//!
//! ```rust
//! use familytree_core::models::time::{TimeProvider, SystemTimeProvider};
//! use chrono::{Datelike, Utc};
//!
//! let provider = SystemTimeProvider;
//! assert_eq!(provider.current_year(), Utc::now().year());
//! ```

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Trait for providing current time
pub trait TimeProvider: Send + Sync {
    /// Get the current UTC time
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date of `now()`
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Calendar year of `now()`
    fn current_year(&self) -> i32 {
        self.now().year()
    }
}

/// System time provider using actual system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Time provider pinned to a fixed instant.
///
/// Useful for reproducible ages and export file names.
///
/// ```rust
/// use familytree_core::models::time::{FixedTimeProvider, TimeProvider};
///
/// let provider = FixedTimeProvider::from_ymd(2024, 3, 1).unwrap();
/// assert_eq!(provider.current_year(), 2024);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeProvider {
    current_time: DateTime<Utc>,
}

impl FixedTimeProvider {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self { current_time: time }
    }

    /// Midnight UTC of the given date, or `None` if the date does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self::new(date.and_hms_opt(0, 0, 0)?.and_utc()))
    }

    pub fn set_time(&mut self, time: DateTime<Utc>) {
        self.current_time = time;
    }

    pub fn advance(&mut self, duration: chrono::Duration) {
        self.current_time += duration;
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        self.current_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_system_time_provider() {
        let provider = SystemTimeProvider;
        let now1 = provider.now();
        let now2 = Utc::now();

        // Should be very close (within 1 second)
        assert!((now2 - now1).num_milliseconds().abs() < 1000);
    }

    #[test]
    fn test_fixed_time_provider_from_ymd() {
        let provider = FixedTimeProvider::from_ymd(2024, 2, 29).unwrap();
        assert_eq!(provider.current_year(), 2024);
        assert_eq!(provider.today(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        assert!(FixedTimeProvider::from_ymd(2023, 2, 29).is_none());
    }

    #[test]
    fn test_fixed_time_provider_advance_crosses_year() {
        let mut provider = FixedTimeProvider::from_ymd(2024, 12, 31).unwrap();
        provider.advance(Duration::days(1));
        assert_eq!(provider.current_year(), 2025);
    }

    #[test]
    fn test_fixed_time_provider_set_time() {
        let mut provider = FixedTimeProvider::from_ymd(2000, 1, 1).unwrap();
        let new_time = Utc::now() + Duration::hours(3);

        provider.set_time(new_time);

        assert_eq!(provider.now(), new_time);
    }
}
