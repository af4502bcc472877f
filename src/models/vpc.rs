//! VPC plan data model: subnets plus the NAT and routing layout around them.

use super::{NetworkBlock, SubnetPlan, Tier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Resource tags, kept sorted for stable output.
pub type Tags = BTreeMap<String, String>;

/// How private subnets reach the internet.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NatGatewayMode {
    /// No NAT gateway; no private-with-egress subnets are created.
    #[default]
    Disabled,
    /// One NAT gateway shared by every private subnet.
    Single,
    /// One NAT gateway per availability zone.
    PerAz,
}

impl NatGatewayMode {
    pub fn from_flags(enable_nat_gateway: bool, one_nat_gateway_per_az: bool) -> NatGatewayMode {
        match (enable_nat_gateway, one_nat_gateway_per_az) {
            (false, _) => NatGatewayMode::Disabled,
            (true, false) => NatGatewayMode::Single,
            (true, true) => NatGatewayMode::PerAz,
        }
    }

    /// Number of NAT gateways for `az_count` zones.
    pub fn gateway_count(&self, az_count: usize) -> usize {
        match self {
            NatGatewayMode::Disabled => 0,
            NatGatewayMode::Single => 1,
            NatGatewayMode::PerAz => az_count,
        }
    }
}

impl fmt::Display for NatGatewayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NatGatewayMode::Disabled => "disabled",
            NatGatewayMode::Single => "single",
            NatGatewayMode::PerAz => "per-az",
        };
        f.write_str(s)
    }
}

/// A NAT gateway placed in a public subnet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NatGateway {
    pub name: String,
    /// Name of the elastic IP allocated for it.
    pub eip_name: String,
    /// Index into the public tier of the subnet plan.
    pub public_subnet_index: usize,
    pub availability_zone_index: usize,
}

/// Target of a `0.0.0.0/0` route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum RouteTarget {
    InternetGateway(String),
    NatGateway(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    pub name: String,
    pub tier: Tier,
    /// Names of the subnets associated with this table.
    pub subnets: Vec<String>,
    pub default_route: Option<RouteTarget>,
}

/// Everything the provisioning engine needs to build one stage's VPC.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VpcPlan {
    pub name: String,
    pub cidr: NetworkBlock,
    pub internet_gateway: String,
    pub availability_zones: usize,
    pub nat_mode: NatGatewayMode,
    pub subnets: SubnetPlan,
    pub nat_gateways: Vec<NatGateway>,
    pub route_tables: Vec<RouteTable>,
    pub tags: Tags,
}

impl VpcPlan {
    pub fn route_table_for(&self, subnet_name: &str) -> Option<&RouteTable> {
        self.route_tables
            .iter()
            .find(|rt| rt.subnets.iter().any(|s| s == subnet_name))
    }
}
