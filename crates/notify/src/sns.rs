//! SNS topic notifier, the channel the hosting environment pages from.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use tracing::{debug, info};

use crate::traits::{ErrorPayload, Notifier, NotifyError};

/// Publishes error payloads as JSON messages to an SNS topic.
pub struct SnsNotifier {
    client: aws_sdk_sns::Client,
    topic_arn: String,
}

impl SnsNotifier {
    /// Create a new [`SnsNotifier`] publishing to the given topic.
    ///
    /// The AWS SDK config is loaded using the given region.
    pub async fn new(region: String, topic_arn: String) -> Result<Self, NotifyError> {
        if topic_arn.is_empty() {
            return Err(NotifyError::Config("empty SNS topic ARN".to_string()));
        }

        let aws_cfg = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_sdk_sns::config::Region::new(region))
            .load()
            .await;

        let client = aws_sdk_sns::Client::new(&aws_cfg);

        info!(topic_arn = %topic_arn, "SnsNotifier initialised");

        Ok(Self { client, topic_arn })
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn send(&self, payload: &ErrorPayload) -> Result<(), NotifyError> {
        let message = serde_json::to_string(payload)
            .map_err(|e| NotifyError::Config(format!("failed to serialize payload: {e}")))?;

        self.client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(format!("{} {} notification", payload.source, payload.kind))
            .message(message)
            .send()
            .await
            .map_err(|e| NotifyError::Sns(e.to_string()))?;

        debug!(topic_arn = %self.topic_arn, "SNS notification published");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "sns"
    }
}
