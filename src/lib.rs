// cargo watch -x 'fmt' -x 'test'

pub mod config;
pub mod edge;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

use config::{Environment, Stage};
use error::NetError;
use models::StagePlan;
use std::collections::HashSet;

/// Derive the full plan (VPC, queues, CDN) for `stage`.
pub fn build_stage_plan(stage: Stage, env: &Environment) -> Result<StagePlan, NetError> {
    let name = stage.as_str();
    let vpc = processing::plan_vpc(name, &env.vpc)?;
    let queues = processing::plan_queues(name, &env.sqs)?;
    let distribution = env
        .cdn
        .as_ref()
        .filter(|cdn| !cdn.domain_name.is_empty())
        .map(|cdn| processing::plan_distribution(name, cdn))
        .transpose()?;
    let plan = StagePlan {
        stage: name.to_string(),
        region: env.region.clone(),
        vpc,
        queues,
        distribution,
    };
    check_for_overlapping_subnets(&plan)?;
    Ok(plan)
}

// return error if two planned subnets overlap or leave the VPC
pub fn check_for_overlapping_subnets(plan: &StagePlan) -> Result<(), NetError> {
    let subnets = &plan.vpc.subnets.subnets;
    let mut seen = HashSet::new();

    for (i, sub) in subnets.iter().enumerate() {
        if !plan.vpc.cidr.contains_block(&sub.block) {
            return Err(NetError::invalid(format!(
                "{} ({}) outside {}",
                sub.name, sub.block, plan.vpc.cidr
            )));
        }
        if !seen.insert(sub.block) {
            return Err(NetError::invalid(format!("Duplicate found: {:?}", sub)));
        }
        if let Some(other) = subnets[i + 1..].iter().find(|o| o.block.overlaps(&sub.block)) {
            return Err(NetError::invalid(format!(
                "{} ({}) overlaps {} ({})",
                sub.name, sub.block, other.name, other.block
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NetworkBlock;

    #[test]
    fn test_build_all_builtin_stages() {
        for stage in Stage::ALL {
            let plan = build_stage_plan(stage, &stage.environment()).unwrap();
            assert_eq!(plan.stage, stage.as_str());
            assert!(plan.distribution.is_none());
        }
    }

    #[test]
    fn test_overlap_detected() {
        let mut plan = build_stage_plan(Stage::Dev, &Stage::Dev.environment()).unwrap();
        assert!(check_for_overlapping_subnets(&plan).is_ok());
        plan.vpc.subnets.subnets[1].block = NetworkBlock::new("10.21.8.0/22").unwrap();
        assert!(check_for_overlapping_subnets(&plan).is_err());
    }

    #[test]
    fn test_outside_vpc_detected() {
        let mut plan = build_stage_plan(Stage::Dev, &Stage::Dev.environment()).unwrap();
        plan.vpc.subnets.subnets[0].block = NetworkBlock::new("10.99.0.0/20").unwrap();
        assert!(check_for_overlapping_subnets(&plan).is_err());
    }
}
