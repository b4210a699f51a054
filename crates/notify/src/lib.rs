//! Failure notification for the scheduler.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable notification channels
//! - SNS and webhook notifier implementations
//! - Dispatcher that fans a payload out to every configured channel

pub mod dispatcher;
pub mod sns;
pub mod traits;
pub mod webhook;

pub use dispatcher::Dispatcher;
pub use sns::SnsNotifier;
pub use traits::{ErrorPayload, Notifier, NotifyError};
pub use webhook::WebhookNotifier;
