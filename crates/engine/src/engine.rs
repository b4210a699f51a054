//! The decision engine: pure start/stop verdicts per instance per tick.

use crate::clock::TimeContext;
use crate::config::EngineConfig;
use crate::instance::{InstanceSpec, PowerState};
use crate::rules::{Diagnostic, RuleCtx, START_RULES, STOP_RULES};
use crate::tags::{TAG_START, TAG_START_ON_WEEKENDS, TAG_STOP};

/// Pseudo-rule name reported when weekend suppression decides the verdict.
pub const WEEKEND_SUPPRESSION: &str = "weekend_suppression";

/// Direction of a state transition under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Start,
    Stop,
}

/// Outcome of evaluating one instance in one direction.
///
/// `matched_rule` names the rule that claimed the instance (if any), and
/// `diagnostics` carries the advisories collected along the way. The engine
/// never logs; the caller surfaces both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub verdict: bool,
    pub matched_rule: Option<&'static str>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Decision {
    fn denied() -> Self {
        Self {
            verdict: false,
            matched_rule: None,
            diagnostics: Vec::new(),
        }
    }
}

/// Stateless verdict function over (instance, time context).
///
/// Safe to call concurrently; holds only configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Should this instance receive a start call this tick?
    ///
    /// Requires power state `stopped`. Weekend suppression applies unless the
    /// instance opts in via `ec2_start_on_weekends`.
    pub fn should_start(&self, instance: &InstanceSpec, time: &TimeContext) -> Decision {
        if instance.state != PowerState::Stopped {
            return Decision::denied();
        }

        // Weekend suppression takes precedence over every scheduling rule.
        if time.is_weekend && !instance.tags.is_truthy(TAG_START_ON_WEEKENDS) {
            return Decision {
                verdict: false,
                matched_rule: Some(WEEKEND_SUPPRESSION),
                diagnostics: Vec::new(),
            };
        }

        self.evaluate(Action::Start, instance, time)
    }

    /// Should this instance receive a stop call this tick?
    ///
    /// Requires power state `running`. There is no weekend analogue on the
    /// stop path: stopping is always allowed.
    pub fn should_stop(&self, instance: &InstanceSpec, time: &TimeContext) -> Decision {
        if instance.state != PowerState::Running {
            return Decision::denied();
        }
        self.evaluate(Action::Stop, instance, time)
    }

    fn evaluate(&self, action: Action, instance: &InstanceSpec, time: &TimeContext) -> Decision {
        let (rules, modern_key) = match action {
            Action::Start => (START_RULES, TAG_START),
            Action::Stop => (STOP_RULES, TAG_STOP),
        };

        let mut diagnostics = Vec::new();

        // A legacy tag alongside the modern one is a compatibility hazard:
        // the legacy tag wins by evaluation order. Surface it to operators.
        if self.config.legacy_tags && instance.tags.contains(modern_key) {
            if let Some(rule) = rules
                .iter()
                .find(|r| r.legacy && instance.tags.contains(r.key))
            {
                diagnostics.push(Diagnostic::PrecedenceConflict {
                    legacy_key: rule.key,
                    modern_key,
                });
            }
        }

        let mut matched: Option<(bool, &'static str)> = None;
        {
            let mut ctx = RuleCtx {
                tags: &instance.tags,
                time,
                diagnostics: &mut diagnostics,
            };
            for rule in rules {
                if rule.legacy && !self.config.legacy_tags {
                    continue;
                }
                if let Some(verdict) = (rule.eval)(&mut ctx) {
                    matched = Some((verdict, rule.name));
                    break;
                }
            }
        }

        match matched {
            Some((verdict, name)) => Decision {
                verdict,
                matched_rule: Some(name),
                diagnostics,
            },
            // Catchall: no rule claimed the instance, do nothing.
            None => Decision {
                verdict: false,
                matched_rule: None,
                diagnostics,
            },
        }
    }
}
