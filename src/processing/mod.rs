//! Plan derivation logic.
//!
//! This module turns stage settings into plans:
//! - [`partition`] - splitting a block into child subnets
//! - [`vpc`] - tiers, NAT gateways and route tables
//! - [`queue`] - main queue and dead-letter redrive
//! - [`cdn`] - CDN distribution and its edge allow-list

mod cdn;
mod partition;
mod queue;
mod vpc;

// Re-export public functions
pub use cdn::{edge_filter, plan_distribution};
pub use partition::{capacity, derive, derive_range};
pub use queue::plan_queues;
pub use vpc::{plan_vpc, stage_tags, MANAGED_BY};
