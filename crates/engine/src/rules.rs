//! Ordered rule tables and advisory diagnostics.
//!
//! Precedence is an explicit list of named matchers evaluated first-match-
//! wins, not an if/else chain. A matcher returns `Some(verdict)` when its
//! tag claims the instance (even if the hour check then fails, the match
//! short-circuits the rest of the table) and `None` when its tag is absent
//! or unusable.

use std::fmt;

use crate::clock::{HourPhase, TimeContext};
use crate::tags::{self, TagMap};

/// Hour at which the legacy `scheduled` / `scheduled_on` tags fire a start.
/// Deliberately not configurable.
pub const LEGACY_START_HOUR: &str = "06";
/// Hour at which the legacy `scheduled` / `scheduled_off` tags fire a stop.
pub const LEGACY_STOP_HOUR: &str = "18";

/// Advisory produced while evaluating an instance.
///
/// The engine never logs; callers decide how to surface these.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum Diagnostic {
    /// A time tag did not match the strict `HH:MM` format and was ignored.
    MalformedTimeTag { key: &'static str, value: String },
    /// A non-boundary minute was snapped down to its quarter boundary.
    MinuteNormalized {
        key: &'static str,
        value: String,
        snapped_to: &'static str,
    },
    /// A legacy hour tag did not hold a two-digit 00-23 value and was ignored.
    MalformedHourTag { key: &'static str, value: String },
    /// A legacy and a modern scheduling tag are both present; the legacy tag
    /// wins by evaluation order.
    PrecedenceConflict {
        legacy_key: &'static str,
        modern_key: &'static str,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedTimeTag { key, value } => {
                write!(f, "invalid time format for tag {key} (specified {value:?}, ignoring)")
            }
            Diagnostic::MinuteNormalized {
                key,
                value,
                snapped_to,
            } => {
                write!(f, "invalid minute specifier for tag {key} (specified {value:?}, assuming :{snapped_to})")
            }
            Diagnostic::MalformedHourTag { key, value } => {
                write!(f, "invalid hour for tag {key} (specified {value:?}, ignoring)")
            }
            Diagnostic::PrecedenceConflict {
                legacy_key,
                modern_key,
            } => {
                write!(f, "both {legacy_key} and {modern_key} are present; {legacy_key} takes precedence")
            }
        }
    }
}

/// Evaluation context threaded through the rule table for one instance.
pub(crate) struct RuleCtx<'a> {
    pub tags: &'a TagMap,
    pub time: &'a TimeContext,
    pub diagnostics: &'a mut Vec<Diagnostic>,
}

/// One named matcher in a precedence table.
pub(crate) struct Rule {
    pub name: &'static str,
    /// The tag key this rule interprets, used for conflict detection.
    pub key: &'static str,
    /// Legacy rules are skipped when the legacy toggle is off.
    pub legacy: bool,
    pub eval: fn(&mut RuleCtx<'_>) -> Option<bool>,
}

/// Start-direction precedence: legacy tags strictly before the modern tag.
pub(crate) const START_RULES: &[Rule] = &[
    Rule {
        name: "scheduled",
        key: tags::TAG_SCHEDULED,
        legacy: true,
        eval: scheduled_start,
    },
    Rule {
        name: "scheduled_on",
        key: tags::TAG_SCHEDULED_ON,
        legacy: true,
        eval: scheduled_on,
    },
    Rule {
        name: "auto_on",
        key: tags::TAG_AUTO_ON,
        legacy: true,
        eval: auto_on,
    },
    Rule {
        name: "ec2_start",
        key: tags::TAG_START,
        legacy: false,
        eval: ec2_start,
    },
];

/// Stop-direction precedence, mirroring the start table.
pub(crate) const STOP_RULES: &[Rule] = &[
    Rule {
        name: "scheduled",
        key: tags::TAG_SCHEDULED,
        legacy: true,
        eval: scheduled_stop,
    },
    Rule {
        name: "scheduled_off",
        key: tags::TAG_SCHEDULED_OFF,
        legacy: true,
        eval: scheduled_off,
    },
    Rule {
        name: "auto_off",
        key: tags::TAG_AUTO_OFF,
        legacy: true,
        eval: auto_off,
    },
    Rule {
        name: "ec2_stop",
        key: tags::TAG_STOP,
        legacy: false,
        eval: ec2_stop,
    },
];

fn scheduled_start(ctx: &mut RuleCtx<'_>) -> Option<bool> {
    fixed_hour(ctx, tags::TAG_SCHEDULED, LEGACY_START_HOUR)
}

fn scheduled_on(ctx: &mut RuleCtx<'_>) -> Option<bool> {
    fixed_hour(ctx, tags::TAG_SCHEDULED_ON, LEGACY_START_HOUR)
}

fn auto_on(ctx: &mut RuleCtx<'_>) -> Option<bool> {
    explicit_hour(ctx, tags::TAG_AUTO_ON)
}

fn ec2_start(ctx: &mut RuleCtx<'_>) -> Option<bool> {
    timed(ctx, tags::TAG_START)
}

fn scheduled_stop(ctx: &mut RuleCtx<'_>) -> Option<bool> {
    fixed_hour(ctx, tags::TAG_SCHEDULED, LEGACY_STOP_HOUR)
}

fn scheduled_off(ctx: &mut RuleCtx<'_>) -> Option<bool> {
    fixed_hour(ctx, tags::TAG_SCHEDULED_OFF, LEGACY_STOP_HOUR)
}

fn auto_off(ctx: &mut RuleCtx<'_>) -> Option<bool> {
    explicit_hour(ctx, tags::TAG_AUTO_OFF)
}

fn ec2_stop(ctx: &mut RuleCtx<'_>) -> Option<bool> {
    timed(ctx, tags::TAG_STOP)
}

/// Truthy legacy tag firing at a hardcoded hour, top of the hour only.
fn fixed_hour(ctx: &mut RuleCtx<'_>, key: &'static str, fire_hour: &str) -> Option<bool> {
    if !ctx.tags.is_truthy(key) {
        return None;
    }
    Some(ctx.time.hour == fire_hour && ctx.time.phase == HourPhase::PhaseOne)
}

/// Legacy tag carrying an explicit two-digit hour, top of the hour only.
/// The value `"false"` disables the tag outright.
fn explicit_hour(ctx: &mut RuleCtx<'_>, key: &'static str) -> Option<bool> {
    let value = ctx.tags.get(key)?;
    if value.eq_ignore_ascii_case("false") {
        return None;
    }
    let Some(hour) = tags::parse_hour_tag(value) else {
        ctx.diagnostics.push(Diagnostic::MalformedHourTag {
            key,
            value: value.to_string(),
        });
        return None;
    };
    Some(hour == ctx.time.hour && ctx.time.phase == HourPhase::PhaseOne)
}

/// Modern `HH:MM` tag, snapped to the quarter boundary of the current phase.
fn timed(ctx: &mut RuleCtx<'_>, key: &'static str) -> Option<bool> {
    let value = ctx.tags.get(key)?;
    let Some((hour, minute)) = tags::parse_time_tag(value) else {
        ctx.diagnostics.push(Diagnostic::MalformedTimeTag {
            key,
            value: value.to_string(),
        });
        return None;
    };
    let (boundary, snapped) = tags::snap_minute(minute);
    if snapped {
        ctx.diagnostics.push(Diagnostic::MinuteNormalized {
            key,
            value: value.to_string(),
            snapped_to: boundary,
        });
    }
    Some(hour == ctx.time.hour && boundary == ctx.time.phase.boundary())
}
