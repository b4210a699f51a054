//! Capability traits consumed by the orchestration driver.
//!
//! The driver receives these as injected collaborators so tests can
//! substitute fakes without touching AWS.

use async_trait::async_trait;

use offhours_engine::InstanceSpec;

/// Errors from the EC2 adapter.
#[derive(Debug, thiserror::Error)]
pub enum Ec2Error {
    /// An AWS SDK error (stringified).
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    /// Adapter configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Lists the full current instance fleet.
///
/// No provider-side filtering: the tag rules are richer than the provider
/// API can express, so over-fetching once is the deliberate trade-off.
#[async_trait]
pub trait InstanceLister: Send + Sync {
    async fn list_instances(&self) -> Result<Vec<InstanceSpec>, Ec2Error>;
}

/// Issues start/stop calls against individual instances.
///
/// Each call fails independently; callers count failures per instance and
/// never abort the batch.
#[async_trait]
pub trait InstanceControl: Send + Sync {
    async fn start_instance(&self, id: &str) -> Result<(), Ec2Error>;
    async fn stop_instance(&self, id: &str) -> Result<(), Ec2Error>;
}
