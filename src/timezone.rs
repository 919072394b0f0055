//! Resolving canonical timezone names to UTC offsets.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// The current UTC offset for `canonical_timezone`, e.g. "Asia/Dhaka".
///
/// Returns `None` if the name is not a canonical timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

#[cfg(test)]
mod timezone_tests {
    use super::get_local_offset;

    #[test]
    fn canonical_timezone_resolves() {
        assert!(get_local_offset("Asia/Dhaka").is_some());
    }

    #[test]
    fn unknown_timezone_is_none() {
        assert_eq!(get_local_offset("Not/A_Timezone"), None);
    }
}
