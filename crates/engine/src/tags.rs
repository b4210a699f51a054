//! Tag vocabulary, parsing, and minute normalization.
//!
//! Tags are the wire contract with operators. Construction of a [`TagMap`]
//! never fails; malformed values surface later as diagnostics when the
//! engine tries to interpret them.

use std::collections::HashMap;

/// Modern start tag, value `HH:MM`.
pub const TAG_START: &str = "ec2_start";
/// Modern stop tag, value `HH:MM`.
pub const TAG_STOP: &str = "ec2_stop";
/// Opt-in flag allowing starts on Saturday/Sunday, value `"true"`.
pub const TAG_START_ON_WEEKENDS: &str = "ec2_start_on_weekends";

/// Legacy tag: start at the hardcoded start hour, stop at the hardcoded
/// stop hour, value `"true"`.
pub const TAG_SCHEDULED: &str = "scheduled";
/// Legacy tag: start at the hardcoded start hour, value `"true"`.
pub const TAG_SCHEDULED_ON: &str = "scheduled_on";
/// Legacy tag: stop at the hardcoded stop hour, value `"true"`.
pub const TAG_SCHEDULED_OFF: &str = "scheduled_off";
/// Legacy tag: start at an explicit two-digit hour.
pub const TAG_AUTO_ON: &str = "auto_on";
/// Legacy tag: stop at an explicit two-digit hour.
pub const TAG_AUTO_OFF: &str = "auto_off";

/// Case-sensitive key/value lookup built from an instance's raw tag list.
///
/// Duplicate keys collapse with last-value-wins. Unknown tags are kept but
/// never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap(HashMap<String, String>);

impl TagMap {
    /// Collapse an ordered list of key/value pairs into a map.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// True iff the tag is present with the value `"true"`, case-insensitive.
    /// Any other value, or absence, is falsy.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parse a strict `HH:MM` tag value into `(hour, minute)`.
///
/// Both components must be exactly two ASCII digits, colon-separated, with
/// HH in 00-23 and MM in 00-59. Anything else yields `None` and the tag is
/// treated as absent by the caller.
pub fn parse_time_tag(value: &str) -> Option<(&str, u32)> {
    let (h, m) = value.split_once(':')?;
    let hour = parse_two_digits(h)?;
    let minute = parse_two_digits(m)?;
    if hour <= 23 && minute <= 59 {
        Some((h, minute))
    } else {
        None
    }
}

/// Parse a strict two-digit hour value ("00".."23") as used by the legacy
/// `auto_on` / `auto_off` tags. Returns the value unchanged on success so it
/// can be compared against [`TimeContext::hour`](crate::TimeContext).
pub fn parse_hour_tag(value: &str) -> Option<&str> {
    let hour = parse_two_digits(value)?;
    (hour <= 23).then_some(value)
}

/// Snap a validated minute down to the quarter boundary at or below it.
///
/// Returns the boundary string together with whether snapping changed the
/// value (callers warn on non-boundary input). Exact boundaries pass through
/// unchanged, which makes the operation idempotent.
pub fn snap_minute(minute: u32) -> (&'static str, bool) {
    let boundary = match minute {
        0..=14 => "00",
        15..=29 => "15",
        30..=44 => "30",
        _ => "45",
    };
    (boundary, minute % 15 != 0)
}

fn parse_two_digits(s: &str) -> Option<u32> {
    let b = s.as_bytes();
    if b.len() == 2 && b[0].is_ascii_digit() && b[1].is_ascii_digit() {
        s.parse().ok()
    } else {
        None
    }
}
