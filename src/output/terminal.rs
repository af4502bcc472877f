//! Terminal output utilities.

use crate::edge::RequestDecision;
use crate::models::StagePlan;
use colored::Colorize;
use itertools::Itertools;

/// Format a value as a quoted, right-aligned field.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string());
    format!("{quoted:>width$}")
}

/// Print NAT, queue and distribution details below the subnet table.
pub fn print_summary(plan: &StagePlan) {
    println!(
        "STAGE: '{stage}' region={region} vpc={vpc} nat={nat}",
        stage = plan.stage.bold(),
        region = plan.region,
        vpc = plan.vpc.cidr.to_string().on_blue(),
        nat = plan.vpc.nat_mode,
    );
    for nat in &plan.vpc.nat_gateways {
        println!(
            "NAT: '{}' eip='{}' in public subnet #{} (az{})",
            nat.name,
            nat.eip_name,
            nat.public_subnet_index + 1,
            nat.availability_zone_index
        );
    }

    let q = &plan.queues;
    println!(
        "QUEUE: '{}' visibility={}s retention={}s",
        q.main.name,
        q.main.visibility_timeout_seconds.unwrap_or(0),
        q.main.message_retention_seconds
    );
    match (&q.dead_letter, &q.main.redrive_policy) {
        (Some(dlq), Some(redrive)) => println!(
            "QUEUE: '{}' receives after {} attempts",
            dlq.name, redrive.max_receive_count
        ),
        _ => println!("QUEUE: {}", "no dead-letter queue".yellow()),
    }

    match &plan.distribution {
        Some(cdn) => println!(
            "CDN: origin={} allow_list=[{}]",
            cdn.origin.domain_name,
            cdn.viewer_allow_list.iter().join(", ")
        ),
        None => println!("CDN: {}", "not configured".yellow()),
    }
}

/// One-line, colored description of an edge decision.
pub fn describe_decision(decision: &RequestDecision) -> String {
    match decision {
        RequestDecision::Allow { uri } => format!("{} {uri}", "ALLOW".green()),
        RequestDecision::Deny { status, .. } => format!("{} {status}", "DENY".on_red()),
        RequestDecision::Redirect { status, location } => {
            format!("{} {status} -> {location}", "REDIRECT".yellow())
        }
    }
}
