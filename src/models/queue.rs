//! Message queue plan data model.

use super::Tags;
use serde::{Deserialize, Serialize};

/// Redrive policy attached to the main queue when a dead-letter queue exists.
///
/// Serialized with the provider's attribute names so it can be passed through verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RedrivePolicy {
    /// Reference to the DLQ ARN, resolved by the provisioning engine.
    pub dead_letter_target_arn: String,
    pub max_receive_count: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Queue {
    pub name: String,
    pub visibility_timeout_seconds: Option<u32>,
    pub message_retention_seconds: u32,
    pub redrive_policy: Option<RedrivePolicy>,
    pub tags: Tags,
}

/// Condition restricting a policy statement to requests from one account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PolicyCondition {
    pub test: String,
    pub variable: String,
    /// Placeholder for the deploying account id.
    pub value: String,
}

/// Resource policy attached to the main queue.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueueAccessPolicy {
    pub sid: String,
    pub principal: String,
    pub actions: Vec<String>,
    pub condition: PolicyCondition,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueuePlan {
    pub main: Queue,
    pub dead_letter: Option<Queue>,
    pub access_policy: QueueAccessPolicy,
}
