//! VPC layout planning.
//!
//! Applies tier policy, NAT gateway placement and routing on top of the raw
//! partition produced by [`derive_range`].

use super::partition::derive_range;
use crate::config::VpcSettings;
use crate::error::NetError;
use crate::models::{
    NatGateway, NatGatewayMode, NetworkBlock, PlannedSubnet, RouteTable, RouteTarget, SubnetPlan,
    Tags, Tier, VpcPlan,
};

/// Smallest and largest prefix lengths the provider accepts for VPCs and subnets.
pub const MIN_PROVIDER_PREFIX: u8 = 16;
pub const MAX_PROVIDER_PREFIX: u8 = 28;

/// Tag value identifying resources described by this crate.
pub const MANAGED_BY: &str = "stage-net-plan";

/// Standard tag set for a resource of `stage`.
pub fn stage_tags(stage: &str, name: &str) -> Tags {
    let mut tags = Tags::new();
    tags.insert("Name".to_string(), name.to_string());
    tags.insert("Environment".to_string(), stage.to_string());
    tags.insert("ManagedBy".to_string(), MANAGED_BY.to_string());
    tags
}

/// Build the VPC plan for one stage.
///
/// Each tier owns a fixed slot of `availability_zones` child blocks
/// (public, private, isolated), so disabling NAT leaves the private slot
/// unused instead of shifting the isolated ranges.
pub fn plan_vpc(stage: &str, settings: &VpcSettings) -> Result<VpcPlan, NetError> {
    let cidr = settings.cidr.network();
    check_provider_prefix("VPC", cidr.prefix())?;
    let child_prefix = cidr
        .prefix()
        .checked_add(settings.subnet_prefix_delta)
        .filter(|p| *p > cidr.prefix())
        .ok_or_else(|| {
            NetError::invalid(format!(
                "subnet_prefix_delta {} is not usable with {cidr}",
                settings.subnet_prefix_delta
            ))
        })?;
    check_provider_prefix("subnet", child_prefix)?;

    let azs = settings.availability_zones;
    let nat_mode = NatGatewayMode::from_flags(
        settings.enable_nat_gateway,
        settings.one_nat_gateway_per_az,
    );
    log::info!(
        "plan_vpc stage={stage} cidr={cidr} subnets=/{child_prefix} azs={azs} nat={nat_mode}"
    );

    let subnets = plan_subnets(stage, cidr, child_prefix, azs, nat_mode)?;
    let nat_gateways = plan_nat_gateways(stage, &subnets, nat_mode, azs);
    let internet_gateway = format!("{stage}-igw");
    let route_tables = plan_route_tables(stage, &subnets, &nat_gateways, &internet_gateway);

    let name = format!("{stage}-vpc");
    Ok(VpcPlan {
        tags: stage_tags(stage, &name),
        name,
        cidr,
        internet_gateway,
        availability_zones: azs,
        nat_mode,
        subnets,
        nat_gateways,
        route_tables,
    })
}

fn check_provider_prefix(what: &str, prefix: u8) -> Result<(), NetError> {
    if (MIN_PROVIDER_PREFIX..=MAX_PROVIDER_PREFIX).contains(&prefix) {
        Ok(())
    } else {
        Err(NetError::invalid(format!(
            "{what} prefix /{prefix} outside /{MIN_PROVIDER_PREFIX}../{MAX_PROVIDER_PREFIX}"
        )))
    }
}

fn plan_subnets(
    stage: &str,
    cidr: NetworkBlock,
    child_prefix: u8,
    azs: usize,
    nat_mode: NatGatewayMode,
) -> Result<SubnetPlan, NetError> {
    let mut plan = SubnetPlan::new();
    for tier in Tier::ALL {
        let count = match (tier, nat_mode) {
            (Tier::PrivateWithEgress, NatGatewayMode::Disabled) => 0,
            _ => azs,
        };
        let allocations = derive_range(cidr, child_prefix, tier.slot() * azs, count, azs)?;
        plan.subnets
            .extend(allocations.into_iter().enumerate().map(|(i, a)| PlannedSubnet {
                name: format!("{stage}-{}-subnet-{}", tier.label(), i + 1),
                block: a.block,
                tier,
                availability_zone_index: a.availability_zone_index,
                map_public_ip_on_launch: tier == Tier::Public,
            }));
    }
    Ok(plan)
}

fn plan_nat_gateways(
    stage: &str,
    subnets: &SubnetPlan,
    nat_mode: NatGatewayMode,
    azs: usize,
) -> Vec<NatGateway> {
    subnets
        .tier(Tier::Public)
        .take(nat_mode.gateway_count(azs))
        .enumerate()
        .map(|(i, public)| NatGateway {
            name: format!("{stage}-nat-gateway-{}", i + 1),
            eip_name: format!("{stage}-nat-eip-{}", i + 1),
            public_subnet_index: i,
            availability_zone_index: public.availability_zone_index,
        })
        .collect()
}

fn plan_route_tables(
    stage: &str,
    subnets: &SubnetPlan,
    nat_gateways: &[NatGateway],
    internet_gateway: &str,
) -> Vec<RouteTable> {
    let mut tables = vec![RouteTable {
        name: format!("{stage}-public-rt"),
        tier: Tier::Public,
        subnets: subnets.tier(Tier::Public).map(|s| s.name.clone()).collect(),
        default_route: Some(RouteTarget::InternetGateway(internet_gateway.to_string())),
    }];

    // Private subnet i uses the NAT in its own zone, or NAT 0 when shared.
    for (i, private) in subnets.tier(Tier::PrivateWithEgress).enumerate() {
        let nat = nat_gateways
            .iter()
            .find(|n| n.availability_zone_index == private.availability_zone_index)
            .or_else(|| nat_gateways.first());
        tables.push(RouteTable {
            name: format!("{stage}-private-rt-{}", i + 1),
            tier: Tier::PrivateWithEgress,
            subnets: vec![private.name.clone()],
            default_route: nat.map(|n| RouteTarget::NatGateway(n.name.clone())),
        });
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(cidr: &str, nat: bool, per_az: bool) -> VpcSettings {
        VpcSettings {
            cidr: NetworkBlock::new(cidr).unwrap(),
            enable_nat_gateway: nat,
            one_nat_gateway_per_az: per_az,
            availability_zones: 2,
            subnet_prefix_delta: 4,
        }
    }

    fn cidrs(plan: &VpcPlan, tier: Tier) -> Vec<String> {
        plan.subnets.tier(tier).map(|s| s.block.to_string()).collect()
    }

    #[test]
    fn test_plan_without_nat_keeps_isolated_slot() {
        let plan = plan_vpc("dev", &settings("10.21.0.0/16", false, false)).unwrap();
        assert_eq!(cidrs(&plan, Tier::Public), vec!["10.21.0.0/20", "10.21.16.0/20"]);
        assert!(cidrs(&plan, Tier::PrivateWithEgress).is_empty());
        assert_eq!(cidrs(&plan, Tier::Isolated), vec!["10.21.64.0/20", "10.21.80.0/20"]);
        assert!(plan.nat_gateways.is_empty());
        assert_eq!(plan.route_tables.len(), 1);
    }

    #[test]
    fn test_plan_single_nat_shared() {
        let plan = plan_vpc("stg", &settings("10.22.0.0/16", true, false)).unwrap();
        assert_eq!(cidrs(&plan, Tier::PrivateWithEgress), vec!["10.22.32.0/20", "10.22.48.0/20"]);
        assert_eq!(plan.nat_gateways.len(), 1);
        let shared = RouteTarget::NatGateway("stg-nat-gateway-1".to_string());
        for private in plan.subnets.tier(Tier::PrivateWithEgress) {
            let rt = plan.route_table_for(&private.name).unwrap();
            assert_eq!(rt.default_route.as_ref(), Some(&shared));
        }
    }

    #[test]
    fn test_plan_nat_per_az_stays_in_zone() {
        let plan = plan_vpc("prd", &settings("10.23.0.0/16", true, true)).unwrap();
        assert_eq!(plan.nat_gateways.len(), 2);
        for private in plan.subnets.tier(Tier::PrivateWithEgress) {
            let rt = plan.route_table_for(&private.name).unwrap();
            let Some(RouteTarget::NatGateway(nat_name)) = &rt.default_route else {
                panic!("private route table {} has no NAT route", rt.name);
            };
            let nat = plan.nat_gateways.iter().find(|n| &n.name == nat_name).unwrap();
            assert_eq!(nat.availability_zone_index, private.availability_zone_index);
        }
    }

    #[test]
    fn test_isolated_has_no_route_table() {
        let plan = plan_vpc("prd", &settings("10.23.0.0/16", true, true)).unwrap();
        for isolated in plan.subnets.tier(Tier::Isolated) {
            assert!(plan.route_table_for(&isolated.name).is_none());
            assert!(!isolated.map_public_ip_on_launch);
        }
    }

    #[test]
    fn test_plan_names_and_tags() {
        let plan = plan_vpc("prd", &settings("10.23.0.0/16", true, true)).unwrap();
        assert_eq!(plan.subnets.subnets[0].name, "prd-public-subnet-1");
        assert_eq!(plan.subnets.subnets[3].name, "prd-private-subnet-2");
        assert_eq!(plan.tags.get("Environment").map(String::as_str), Some("prd"));
        assert_eq!(plan.tags.get("ManagedBy").map(String::as_str), Some(MANAGED_BY));
    }

    #[test]
    fn test_plan_rejects_provider_limits() {
        assert!(plan_vpc("dev", &settings("10.0.0.0/8", false, false)).is_err());
        let mut s = settings("10.0.0.0/16", false, false);
        s.subnet_prefix_delta = 13;
        assert!(plan_vpc("dev", &s).is_err());
        s.subnet_prefix_delta = 0;
        assert!(plan_vpc("dev", &s).is_err());
    }

    #[test]
    fn test_plan_rejects_too_many_zones() {
        let mut s = settings("10.0.0.0/16", true, true);
        s.availability_zones = 6;
        assert!(matches!(plan_vpc("dev", &s), Err(NetError::InvalidArgument(_))));
    }
}
