//! Subnet plan data model.

use super::NetworkBlock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Routing exposure of a subnet.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Public,
    PrivateWithEgress,
    Isolated,
}

impl Tier {
    /// Tier slots in partition order.
    pub const ALL: [Tier; 3] = [Tier::Public, Tier::PrivateWithEgress, Tier::Isolated];

    /// Slot of this tier in the partition; tier `k` owns child indices `[k*n, (k+1)*n)`.
    pub fn slot(&self) -> usize {
        match self {
            Tier::Public => 0,
            Tier::PrivateWithEgress => 1,
            Tier::Isolated => 2,
        }
    }

    /// Short name used in resource names and tags.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Public => "public",
            Tier::PrivateWithEgress => "private",
            Tier::Isolated => "isolated",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A child block produced by the partitioner, before any tier is applied.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnetAllocation {
    pub block: NetworkBlock,
    pub availability_zone_index: usize,
}

/// A tiered subnet in a [`SubnetPlan`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlannedSubnet {
    /// Resource name, e.g. `prd-private-subnet-2`.
    pub name: String,
    pub block: NetworkBlock,
    pub tier: Tier,
    pub availability_zone_index: usize,
    /// Instances launched here get a public address.
    pub map_public_ip_on_launch: bool,
}

/// Ordered list of tiered subnets.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetPlan {
    pub subnets: Vec<PlannedSubnet>,
}

impl SubnetPlan {
    pub fn new() -> SubnetPlan {
        SubnetPlan { subnets: vec![] }
    }

    /// Subnets of a single tier, in plan order.
    pub fn tier(&self, tier: Tier) -> impl Iterator<Item = &PlannedSubnet> {
        self.subnets.iter().filter(move |s| s.tier == tier)
    }

    pub fn len(&self) -> usize {
        self.subnets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subnets.is_empty()
    }
}
