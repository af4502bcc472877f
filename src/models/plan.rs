//! Combined plan for one stage.

use super::{DistributionPlan, QueuePlan, VpcPlan};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    pub stage: String,
    pub region: String,
    pub vpc: VpcPlan,
    pub queues: QueuePlan,
    pub distribution: Option<DistributionPlan>,
}
