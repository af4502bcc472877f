//! Stage configuration.
//!
//! - [`environment`] - settings types and the built-in dev / stg / prd values
//! - [`loader`] - `STAGE` selection and JSON override files

mod environment;
mod loader;

pub use environment::{
    CdnSettings, Environment, QueueSettings, Stage, VpcSettings, DEFAULT_AVAILABILITY_ZONES,
    DEFAULT_REGION, DEFAULT_SUBNET_PREFIX_DELTA,
};
pub use loader::{
    apply_allow_list_override, load_environment, parse_environment, stage_from_env,
    EDGE_ALLOW_LIST_VAR, STAGE_CONFIG_VAR, STAGE_VAR,
};
