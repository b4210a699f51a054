//! Wall-clock resolution for a single tick.
//!
//! A [`TimeContext`] is computed once per invocation from the current time in
//! the configured timezone and then treated as immutable. The quarter-hour
//! [`HourPhase`] is the native decision granularity of the whole system.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};

/// Quarter-hour bucket within the current hour.
///
/// Minute 15, 30, and 45 belong to the phase they begin, so the four phases
/// partition `[0, 60)` into contiguous half-open intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum HourPhase {
    /// Minutes [00, 15).
    PhaseOne,
    /// Minutes [15, 30).
    PhaseTwo,
    /// Minutes [30, 45).
    PhaseThree,
    /// Minutes [45, 60).
    PhaseFour,
}

impl HourPhase {
    /// Classify a minute-of-hour into its phase.
    pub fn from_minute(minute: u32) -> Self {
        match minute {
            0..=14 => HourPhase::PhaseOne,
            15..=29 => HourPhase::PhaseTwo,
            30..=44 => HourPhase::PhaseThree,
            _ => HourPhase::PhaseFour,
        }
    }

    /// The zero-padded minute boundary this phase begins at.
    ///
    /// Tag minutes are snapped to these boundaries before comparison.
    pub fn boundary(&self) -> &'static str {
        match self {
            HourPhase::PhaseOne => "00",
            HourPhase::PhaseTwo => "15",
            HourPhase::PhaseThree => "30",
            HourPhase::PhaseFour => "45",
        }
    }
}

/// Immutable view of the current tick's wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TimeContext {
    /// Zero-padded 24-hour clock hour, "00".."23".
    pub hour: String,
    /// Zero-padded minute, "00".."59".
    pub minute: String,
    /// True iff the local day is Saturday or Sunday.
    pub is_weekend: bool,
    /// Quarter-hour bucket derived from `minute`.
    pub phase: HourPhase,
}

impl TimeContext {
    /// Derive the tick context from a timezone-aware timestamp.
    ///
    /// The timestamp must already be in the configured timezone; timezone
    /// resolution happens at configuration load, never here.
    pub fn resolve<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let minute = now.minute();
        Self {
            hour: format!("{:02}", now.hour()),
            minute: format!("{:02}", minute),
            is_weekend: matches!(now.weekday(), Weekday::Sat | Weekday::Sun),
            phase: HourPhase::from_minute(minute),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use chrono_tz::Tz;

    #[test]
    fn phases_partition_the_hour() {
        for minute in 0..60 {
            let expected = match minute {
                0..=14 => HourPhase::PhaseOne,
                15..=29 => HourPhase::PhaseTwo,
                30..=44 => HourPhase::PhaseThree,
                _ => HourPhase::PhaseFour,
            };
            assert_eq!(HourPhase::from_minute(minute), expected, "minute {minute}");
        }
    }

    #[test]
    fn boundary_minutes_start_their_own_phase() {
        assert_eq!(HourPhase::from_minute(15), HourPhase::PhaseTwo);
        assert_eq!(HourPhase::from_minute(30), HourPhase::PhaseThree);
        assert_eq!(HourPhase::from_minute(45), HourPhase::PhaseFour);
    }

    #[test]
    fn phase_boundaries_are_zero_padded() {
        assert_eq!(HourPhase::PhaseOne.boundary(), "00");
        assert_eq!(HourPhase::PhaseTwo.boundary(), "15");
        assert_eq!(HourPhase::PhaseThree.boundary(), "30");
        assert_eq!(HourPhase::PhaseFour.boundary(), "45");
    }

    #[test]
    fn resolve_extracts_padded_fields() {
        let now = Utc.with_ymd_and_hms(2020, 6, 26, 18, 30, 39).unwrap();
        let ctx = TimeContext::resolve(&now);
        assert_eq!(ctx.hour, "18");
        assert_eq!(ctx.minute, "30");
        assert_eq!(ctx.phase, HourPhase::PhaseThree);
        assert!(!ctx.is_weekend);
    }

    #[test]
    fn resolve_pads_single_digit_hour() {
        let now = Utc.with_ymd_and_hms(2020, 6, 26, 7, 1, 0).unwrap();
        let ctx = TimeContext::resolve(&now);
        assert_eq!(ctx.hour, "07");
        assert_eq!(ctx.minute, "01");
        assert_eq!(ctx.phase, HourPhase::PhaseOne);
    }

    #[test]
    fn saturday_and_sunday_are_weekend() {
        // 2020-06-27 is a Saturday, 2020-06-28 a Sunday.
        let sat = Utc.with_ymd_and_hms(2020, 6, 27, 12, 0, 0).unwrap();
        let sun = Utc.with_ymd_and_hms(2020, 6, 28, 12, 0, 0).unwrap();
        let mon = Utc.with_ymd_and_hms(2020, 6, 29, 12, 0, 0).unwrap();
        assert!(TimeContext::resolve(&sat).is_weekend);
        assert!(TimeContext::resolve(&sun).is_weekend);
        assert!(!TimeContext::resolve(&mon).is_weekend);
    }

    #[test]
    fn resolve_respects_local_timezone() {
        // 23:30 UTC on a Friday is already Saturday 08:30 in Tokyo.
        let tz: Tz = "Asia/Tokyo".parse().unwrap();
        let now = Utc
            .with_ymd_and_hms(2020, 6, 26, 23, 30, 0)
            .unwrap()
            .with_timezone(&tz);
        let ctx = TimeContext::resolve(&now);
        assert_eq!(ctx.hour, "08");
        assert!(ctx.is_weekend);
    }
}
