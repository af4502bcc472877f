//! Domain models for the stage network plan.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`NetworkBlock`] - IPv4 block in CIDR notation
//! - [`SubnetPlan`] and [`Tier`] - tiered subnet layout
//! - [`VpcPlan`] - subnets plus NAT gateways and route tables
//! - [`QueuePlan`] - main queue and optional dead-letter queue
//! - [`DistributionPlan`] - CDN origin and cache behaviour
//! - [`StagePlan`] - all of the above for one stage

mod cdn;
mod network_block;
mod plan;
mod queue;
mod subnet;
mod vpc;

// Re-export public types
pub use cdn::{CacheBehavior, DistributionPlan, Origin};
pub use network_block::{
    block_size, broadcast_addr, get_cidr_mask, network_addr, num_aws_hosts, offset_addr,
    NetworkBlock, MAX_LENGTH,
};
pub use plan::StagePlan;
pub use queue::{PolicyCondition, Queue, QueueAccessPolicy, QueuePlan, RedrivePolicy};
pub use subnet::{PlannedSubnet, SubnetAllocation, SubnetPlan, Tier};
pub use vpc::{NatGateway, NatGatewayMode, RouteTable, RouteTarget, Tags, VpcPlan};
