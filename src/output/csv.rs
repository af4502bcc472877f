//! CSV output of the subnet plan.

use crate::models::{num_aws_hosts, RouteTarget, VpcPlan};

use super::terminal::format_field;

/// One printable subnet line.
#[derive(Debug, PartialEq, Eq)]
pub struct SubnetPrintRow {
    /// 1-based position in the plan.
    pub j: usize,
    pub tier: String,
    pub subnet_cidr: String,
    pub broadcast: String,
    /// Usable hosts after the provider's five reserved addresses.
    pub aws_hosts: u64,
    pub subnet_name: String,
    pub az: String,
    pub route_table: String,
    pub default_route: String,
}

/// Build the printable rows for a VPC plan.
pub fn subnet_rows(plan: &VpcPlan) -> Vec<SubnetPrintRow> {
    plan.subnets
        .subnets
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let route_table = plan.route_table_for(&s.name);
            SubnetPrintRow {
                j: i + 1,
                tier: s.tier.to_string(),
                subnet_cidr: s.block.to_string(),
                broadcast: s.block.hi().to_string(),
                aws_hosts: num_aws_hosts(s.block.prefix()).unwrap_or(0),
                subnet_name: s.name.clone(),
                az: format!("az{}", s.availability_zone_index),
                route_table: route_table
                    .map(|rt| rt.name.clone())
                    .unwrap_or_else(|| "None".to_string()),
                default_route: match route_table.and_then(|rt| rt.default_route.as_ref()) {
                    Some(RouteTarget::InternetGateway(name)) => name.clone(),
                    Some(RouteTarget::NatGateway(name)) => name.clone(),
                    None => "local-only".to_string(),
                },
            }
        })
        .collect()
}

/// Print the subnet plan as CSV to stdout.
pub fn subnet_print(plan: &VpcPlan) {
    log::info!(
        "#Start subnet_print() {} subnets in {}",
        plan.subnets.len(),
        plan.cidr
    );
    println!(
        r#" "cnt",     "tier",     "subnet_cidr",   "broadcast", "hosts",        "subnet_name",  "az",        "route_table",     "default_route""#
    );
    for row in subnet_rows(plan) {
        print_csv_row(&row);
    }
}

fn print_csv_row(row: &SubnetPrintRow) {
    println!(
        "{j},{tier},{subnet_cidr},{broadcast},{hosts},{subnet_name},{az},{route_table},{default_route}",
        j = format_field(row.j, 6),
        tier = format_field(&row.tier, 10),
        subnet_cidr = format_field(&row.subnet_cidr, 17),
        broadcast = format_field(format!("{}_br", row.broadcast), 16),
        hosts = format_field(row.aws_hosts, 8),
        subnet_name = format_field(&row.subnet_name, 24),
        az = format_field(&row.az, 6),
        route_table = format_field(&row.route_table, 20),
        default_route = format_field(&row.default_route, 18),
    );
}
