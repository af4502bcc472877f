//! Per-stage environment settings and their built-in values.

use crate::edge::EmptyAllowListPolicy;
use crate::error::NetError;
use crate::models::NetworkBlock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of availability zones per tier.
pub const DEFAULT_AVAILABILITY_ZONES: usize = 2;
/// Default child prefix delta: a /16 VPC is cut into sixteen /20s.
pub const DEFAULT_SUBNET_PREFIX_DELTA: u8 = 4;
pub const DEFAULT_REGION: &str = "ap-northeast-1";
/// 14 days, the provider maximum.
pub const DEFAULT_MESSAGE_RETENTION_SECONDS: u32 = 1_209_600;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Dev,
    Stg,
    Prd,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Dev, Stage::Stg, Stage::Prd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Dev => "dev",
            Stage::Stg => "stg",
            Stage::Prd => "prd",
        }
    }

    /// Built-in settings for this stage.
    pub fn environment(&self) -> Environment {
        match self {
            Stage::Dev => builtin(21, false, false, false, 30, 3),
            Stage::Stg => builtin(22, true, false, true, 60, 3),
            Stage::Prd => builtin(23, true, true, true, 120, 5),
        }
    }
}

impl FromStr for Stage {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(Stage::Dev),
            "stg" => Ok(Stage::Stg),
            "prd" => Ok(Stage::Prd),
            other => Err(NetError::Config(format!(
                "environment configuration for stage '{other}' not found"
            ))),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn builtin(
    second_octet: u8,
    enable_nat_gateway: bool,
    one_nat_gateway_per_az: bool,
    enable_dlq: bool,
    visibility_timeout_seconds: u32,
    max_receive_count: u32,
) -> Environment {
    Environment {
        region: DEFAULT_REGION.to_string(),
        vpc: VpcSettings {
            cidr: NetworkBlock::slash16(10, second_octet),
            enable_nat_gateway,
            one_nat_gateway_per_az,
            availability_zones: DEFAULT_AVAILABILITY_ZONES,
            subnet_prefix_delta: DEFAULT_SUBNET_PREFIX_DELTA,
        },
        sqs: QueueSettings {
            enable_dlq,
            visibility_timeout_seconds,
            message_retention_seconds: DEFAULT_MESSAGE_RETENTION_SECONDS,
            max_receive_count,
        },
        cdn: None,
    }
}

fn default_availability_zones() -> usize {
    DEFAULT_AVAILABILITY_ZONES
}

fn default_subnet_prefix_delta() -> u8 {
    DEFAULT_SUBNET_PREFIX_DELTA
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VpcSettings {
    pub cidr: NetworkBlock,
    pub enable_nat_gateway: bool,
    pub one_nat_gateway_per_az: bool,
    #[serde(default = "default_availability_zones")]
    pub availability_zones: usize,
    #[serde(default = "default_subnet_prefix_delta")]
    pub subnet_prefix_delta: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueueSettings {
    pub enable_dlq: bool,
    pub visibility_timeout_seconds: u32,
    pub message_retention_seconds: u32,
    pub max_receive_count: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CdnSettings {
    pub domain_name: String,
    /// Addresses and CIDR blocks allowed through the edge function.
    #[serde(default)]
    pub allow_list: Vec<String>,
    #[serde(default)]
    pub empty_allow_list: EmptyAllowListPolicy,
}

/// Everything that varies between stages.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    #[serde(default = "default_region")]
    pub region: String,
    pub vpc: VpcSettings,
    pub sqs: QueueSettings,
    #[serde(default)]
    pub cdn: Option<CdnSettings>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_from_str() {
        assert_eq!("dev".parse::<Stage>().unwrap(), Stage::Dev);
        assert_eq!(" PRD ".parse::<Stage>().unwrap(), Stage::Prd);
        assert!(matches!("qa".parse::<Stage>(), Err(NetError::Config(_))));
    }

    #[test]
    fn test_builtin_stages() {
        let dev = Stage::Dev.environment();
        assert_eq!(dev.vpc.cidr.to_string(), "10.21.0.0/16");
        assert!(!dev.vpc.enable_nat_gateway);
        assert!(!dev.sqs.enable_dlq);

        let stg = Stage::Stg.environment();
        assert_eq!(stg.vpc.cidr.to_string(), "10.22.0.0/16");
        assert!(stg.vpc.enable_nat_gateway && !stg.vpc.one_nat_gateway_per_az);
        assert_eq!(stg.sqs.visibility_timeout_seconds, 60);

        let prd = Stage::Prd.environment();
        assert_eq!(prd.vpc.cidr.to_string(), "10.23.0.0/16");
        assert!(prd.vpc.one_nat_gateway_per_az);
        assert_eq!(prd.sqs.max_receive_count, 5);
    }

    #[test]
    fn test_defaults_applied_on_deserialize() {
        let json = r#"{
            "vpc": {"cidr": "10.30.0.0/16", "enable_nat_gateway": false, "one_nat_gateway_per_az": false},
            "sqs": {"enable_dlq": false, "visibility_timeout_seconds": 30,
                    "message_retention_seconds": 345600, "max_receive_count": 3}
        }"#;
        let env: Environment = serde_json::from_str(json).unwrap();
        assert_eq!(env.region, DEFAULT_REGION);
        assert_eq!(env.vpc.availability_zones, 2);
        assert_eq!(env.vpc.subnet_prefix_delta, 4);
        assert!(env.cdn.is_none());
    }
}
