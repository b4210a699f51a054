//! One tick: resolve time once, list once, decide per instance, act.

use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use offhours_ec2::{Ec2Error, InstanceControl, InstanceLister};
use offhours_engine::{Decision, Engine, InstanceSpec, TimeContext};

use crate::error::TickError;

/// What one tick did, for the final log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    /// Instances retrieved from the lister.
    pub instances: usize,
    /// Successful start calls.
    pub started: usize,
    /// Successful stop calls.
    pub stopped: usize,
}

#[derive(Debug, Clone, Copy)]
enum StateChange {
    Start,
    Stop,
}

/// Drives one scheduler tick against injected collaborators.
///
/// The engine is pure, so the driver owns all side effects: listing,
/// state-change calls, and surfacing the engine's diagnostics as logs.
pub struct TickDriver {
    engine: Engine,
    lister: Arc<dyn InstanceLister>,
    control: Arc<dyn InstanceControl>,
    concurrency: usize,
}

impl TickDriver {
    pub fn new(
        engine: Engine,
        lister: Arc<dyn InstanceLister>,
        control: Arc<dyn InstanceControl>,
        concurrency: usize,
    ) -> Self {
        Self {
            engine,
            lister,
            control,
            concurrency: concurrency.max(1),
        }
    }

    /// Run one tick at the given (timezone-aware) time.
    ///
    /// Individual state-change failures are counted, not propagated; a
    /// nonzero count after the whole batch surfaces as
    /// [`TickError::ControlFailures`]. A listing failure aborts the tick
    /// before any call is made.
    pub async fn run_tick<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Result<TickSummary, TickError> {
        let time = TimeContext::resolve(&now);
        debug!(
            hour = %time.hour,
            minute = %time.minute,
            is_weekend = time.is_weekend,
            phase = ?time.phase,
            "resolved tick time context"
        );

        let instances = self
            .lister
            .list_instances()
            .await
            .map_err(TickError::List)?;
        debug!(count = instances.len(), "retrieved instances total");

        let mut start_ids = Vec::new();
        let mut stop_ids = Vec::new();
        for instance in &instances {
            // The power-state gate keeps the two directions mutually
            // exclusive, so evaluating both per instance is safe.
            let start = self.engine.should_start(instance, &time);
            let stop = self.engine.should_stop(instance, &time);
            self.surface(instance, "start", &start);
            self.surface(instance, "stop", &stop);
            if start.verdict {
                start_ids.push(instance.id.clone());
            }
            if stop.verdict {
                stop_ids.push(instance.id.clone());
            }
        }

        debug!(count = start_ids.len(), "filtered instances to start");
        debug!(count = stop_ids.len(), "filtered instances to stop");

        let mut failures = 0;

        let started = if start_ids.is_empty() {
            info!("no instances to start");
            0
        } else {
            let (ok, failed) = self.issue(start_ids, StateChange::Start).await;
            failures += failed;
            ok
        };

        let stopped = if stop_ids.is_empty() {
            info!("no instances to stop");
            0
        } else {
            let (ok, failed) = self.issue(stop_ids, StateChange::Stop).await;
            failures += failed;
            ok
        };

        let summary = TickSummary {
            instances: instances.len(),
            started,
            stopped,
        };

        if failures > 0 {
            info!(started, stopped, failures, "tick completed with failures");
            return Err(TickError::ControlFailures { count: failures });
        }

        Ok(summary)
    }

    /// Issue state-change calls with bounded concurrency. Each call's
    /// outcome is independent; one failure never blocks the rest.
    async fn issue(&self, ids: Vec<String>, action: StateChange) -> (usize, usize) {
        let results: Vec<Result<(), (String, Ec2Error)>> = stream::iter(ids)
            .map(|id| {
                let control = Arc::clone(&self.control);
                async move {
                    match action {
                        StateChange::Start => {
                            info!(instance = %id, "starting instance");
                            control.start_instance(&id).await.map_err(|e| (id, e))
                        }
                        StateChange::Stop => {
                            info!(instance = %id, "stopping instance");
                            control.stop_instance(&id).await.map_err(|e| (id, e))
                        }
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut ok = 0;
        let mut failed = 0;
        for result in results {
            match result {
                Ok(()) => ok += 1,
                Err((id, e)) => {
                    error!(instance = %id, error = %e, action = ?action, "state change failed");
                    failed += 1;
                }
            }
        }
        (ok, failed)
    }

    /// Turn one decision into log lines: diagnostics at warn, the verdict
    /// trail at debug.
    fn surface(&self, instance: &InstanceSpec, direction: &str, decision: &Decision) {
        for diag in &decision.diagnostics {
            warn!(instance = %instance.id, %diag, "tag diagnostic");
        }
        match decision.matched_rule {
            Some(rule) if decision.verdict => {
                debug!(instance = %instance.id, direction, rule, "instance qualifies")
            }
            Some(rule) => {
                debug!(instance = %instance.id, direction, rule, "rule claimed instance, no match")
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use chrono::{NaiveDateTime, Utc};

    use offhours_engine::{PowerState, TagMap};

    fn at(iso: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S")
            .unwrap()
            .and_utc()
    }

    struct FixedLister {
        instances: Vec<InstanceSpec>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl InstanceLister for FixedLister {
        async fn list_instances(&self) -> Result<Vec<InstanceSpec>, Ec2Error> {
            if self.fail {
                return Err(Ec2Error::AwsSdk("describe failed".into()));
            }
            Ok(self.instances.clone())
        }
    }

    #[derive(Default)]
    struct RecordingControl {
        started: Mutex<Vec<String>>,
        stopped: Mutex<Vec<String>>,
        fail_ids: HashSet<String>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl InstanceControl for RecordingControl {
        async fn start_instance(&self, id: &str) -> Result<(), Ec2Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_ids.contains(id) {
                return Err(Ec2Error::AwsSdk("start failed".into()));
            }
            self.started.lock().unwrap().push(id.to_string());
            Ok(())
        }

        async fn stop_instance(&self, id: &str) -> Result<(), Ec2Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_ids.contains(id) {
                return Err(Ec2Error::AwsSdk("stop failed".into()));
            }
            self.stopped.lock().unwrap().push(id.to_string());
            Ok(())
        }
    }

    fn instance(id: &str, state: PowerState, tags: &[(&str, &str)]) -> InstanceSpec {
        InstanceSpec::new(id, state, TagMap::from_pairs(tags.iter().copied()))
    }

    fn driver(
        instances: Vec<InstanceSpec>,
        control: Arc<RecordingControl>,
    ) -> TickDriver {
        TickDriver::new(
            Engine::default(),
            Arc::new(FixedLister {
                instances,
                fail: false,
            }),
            control,
            4,
        )
    }

    #[tokio::test]
    async fn partitions_and_acts_on_candidates() {
        let control = Arc::new(RecordingControl::default());
        let fleet = vec![
            instance("i-start", PowerState::Stopped, &[("ec2_start", "07:00")]),
            instance("i-stop", PowerState::Running, &[("ec2_stop", "07:00")]),
            instance("i-idle", PowerState::Running, &[("ec2_stop", "19:00")]),
            instance("i-untagged", PowerState::Stopped, &[]),
        ];

        let summary = driver(fleet, control.clone())
            .run_tick(at("2020-06-26T07:01:00"))
            .await
            .unwrap();

        assert_eq!(summary.instances, 4);
        assert_eq!(summary.started, 1);
        assert_eq!(summary.stopped, 1);
        assert_eq!(*control.started.lock().unwrap(), vec!["i-start"]);
        assert_eq!(*control.stopped.lock().unwrap(), vec!["i-stop"]);
    }

    #[tokio::test]
    async fn empty_fleet_is_a_clean_tick() {
        let control = Arc::new(RecordingControl::default());
        let summary = driver(Vec::new(), control.clone())
            .run_tick(at("2020-06-26T07:01:00"))
            .await
            .unwrap();

        assert_eq!(summary.instances, 0);
        assert_eq!(control.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn one_failure_does_not_block_the_rest() {
        let control = Arc::new(RecordingControl {
            fail_ids: HashSet::from(["i-bad".to_string()]),
            ..Default::default()
        });
        let fleet = vec![
            instance("i-bad", PowerState::Stopped, &[("ec2_start", "07:00")]),
            instance("i-good", PowerState::Stopped, &[("ec2_start", "07:00")]),
        ];

        let err = driver(fleet, control.clone())
            .run_tick(at("2020-06-26T07:01:00"))
            .await
            .unwrap_err();

        match err {
            TickError::ControlFailures { count } => assert_eq!(count, 1),
            other => panic!("expected ControlFailures, got: {other:?}"),
        }
        // The healthy instance was still started.
        assert_eq!(*control.started.lock().unwrap(), vec!["i-good"]);
    }

    #[tokio::test]
    async fn failures_in_both_directions_share_one_count() {
        let control = Arc::new(RecordingControl {
            fail_ids: HashSet::from(["i-s".to_string(), "i-t".to_string()]),
            ..Default::default()
        });
        let fleet = vec![
            instance("i-s", PowerState::Stopped, &[("ec2_start", "07:00")]),
            instance("i-t", PowerState::Running, &[("ec2_stop", "07:00")]),
        ];

        let err = driver(fleet, control)
            .run_tick(at("2020-06-26T07:01:00"))
            .await
            .unwrap_err();

        match err {
            TickError::ControlFailures { count } => assert_eq!(count, 2),
            other => panic!("expected ControlFailures, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn listing_failure_aborts_before_any_call() {
        let control = Arc::new(RecordingControl::default());
        let driver = TickDriver::new(
            Engine::default(),
            Arc::new(FixedLister {
                instances: vec![instance(
                    "i-start",
                    PowerState::Stopped,
                    &[("ec2_start", "07:00")],
                )],
                fail: true,
            }),
            control.clone(),
            4,
        );

        let err = driver.run_tick(at("2020-06-26T07:01:00")).await.unwrap_err();
        assert!(matches!(err, TickError::List(_)));
        assert_eq!(control.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn weekend_tick_starts_nothing_without_opt_in() {
        let control = Arc::new(RecordingControl::default());
        let fleet = vec![
            instance("i-plain", PowerState::Stopped, &[("ec2_start", "07:00")]),
            instance(
                "i-optin",
                PowerState::Stopped,
                &[("ec2_start", "07:00"), ("ec2_start_on_weekends", "true")],
            ),
        ];

        // 2020-06-27 is a Saturday.
        let summary = driver(fleet, control.clone())
            .run_tick(at("2020-06-27T07:01:00"))
            .await
            .unwrap();

        assert_eq!(summary.started, 1);
        assert_eq!(*control.started.lock().unwrap(), vec!["i-optin"]);
    }
}
