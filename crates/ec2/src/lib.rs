//! EC2 adapter: instance listing and start/stop control.
//!
//! This crate provides:
//! - `InstanceLister` / `InstanceControl` capability traits
//! - `Ec2Client` implementing both over the AWS SDK
//! - Conversion from SDK instance data into the engine's `InstanceSpec`

pub mod client;
pub mod config;
pub mod model;
pub mod traits;

pub use client::Ec2Client;
pub use config::Ec2Config;
pub use traits::{Ec2Error, InstanceControl, InstanceLister};
