//! Conversion from AWS SDK instance data into the engine's view.

use aws_sdk_ec2::types::Instance;

use offhours_engine::{InstanceSpec, PowerState, TagMap};

/// Build an [`InstanceSpec`] from an SDK instance.
///
/// Returns `None` when the instance carries no id (nothing actionable can be
/// done with it). A missing state is mapped to an unknown power state, which
/// the engine treats as not eligible in either direction.
pub fn instance_spec(instance: &Instance) -> Option<InstanceSpec> {
    let id = instance.instance_id()?.to_string();

    let state = instance
        .state()
        .and_then(|s| s.name())
        .map(|n| PowerState::from_name(n.as_str()))
        .unwrap_or_else(|| PowerState::Other("unknown".to_string()));

    let tags = TagMap::from_pairs(instance.tags().iter().filter_map(|tag| {
        Some((
            tag.key()?.to_string(),
            tag.value().unwrap_or_default().to_string(),
        ))
    }));

    Some(InstanceSpec::new(id, state, tags))
}
