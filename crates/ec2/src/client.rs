//! AWS EC2 client implementing the lister and control capabilities.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use tracing::{debug, info, warn};

use offhours_engine::InstanceSpec;

use crate::config::Ec2Config;
use crate::model::instance_spec;
use crate::traits::{Ec2Error, InstanceControl, InstanceLister};

/// Thin wrapper over the SDK EC2 client.
///
/// Listing deliberately fetches the whole fleet: the tag rules the engine
/// applies are more complex than `DescribeInstances` filters can express.
#[derive(Debug, Clone)]
pub struct Ec2Client {
    client: aws_sdk_ec2::Client,
}

impl Ec2Client {
    /// Create a new [`Ec2Client`] from the given configuration.
    ///
    /// The AWS SDK config is loaded using the region specified in `config`.
    pub async fn new(config: Ec2Config) -> Self {
        let region = aws_sdk_ec2::config::Region::new(config.region.clone());
        let aws_cfg = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let client = aws_sdk_ec2::Client::new(&aws_cfg);

        info!(region = %config.region, "Ec2Client initialised");

        Self { client }
    }

    /// Wrap an already-built SDK client (used by integration tests with
    /// custom endpoints).
    pub fn from_sdk(client: aws_sdk_ec2::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InstanceLister for Ec2Client {
    async fn list_instances(&self) -> Result<Vec<InstanceSpec>, Ec2Error> {
        let mut specs = Vec::new();

        let mut pages = self.client.describe_instances().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| Ec2Error::AwsSdk(e.to_string()))?;
            for reservation in page.reservations() {
                for instance in reservation.instances() {
                    match instance_spec(instance) {
                        Some(spec) => specs.push(spec),
                        None => warn!("skipping instance without an instance id"),
                    }
                }
            }
        }

        debug!(count = specs.len(), "retrieved instance fleet");
        Ok(specs)
    }
}

#[async_trait]
impl InstanceControl for Ec2Client {
    async fn start_instance(&self, id: &str) -> Result<(), Ec2Error> {
        self.client
            .start_instances()
            .instance_ids(id)
            .send()
            .await
            .map_err(|e| Ec2Error::AwsSdk(e.to_string()))?;

        debug!(instance = %id, "start call issued");
        Ok(())
    }

    async fn stop_instance(&self, id: &str) -> Result<(), Ec2Error> {
        self.client
            .stop_instances()
            .instance_ids(id)
            .send()
            .await
            .map_err(|e| Ec2Error::AwsSdk(e.to_string()))?;

        debug!(instance = %id, "stop call issued");
        Ok(())
    }
}
