//! Stage selection and configuration file loading.

use super::environment::{CdnSettings, Environment, Stage};
use std::error::Error;
use std::path::Path;

/// Environment variable selecting the stage.
pub const STAGE_VAR: &str = "STAGE";
/// Environment variable pointing at a JSON override for the stage settings.
pub const STAGE_CONFIG_VAR: &str = "STAGE_CONFIG";
/// Comma separated allow-list that replaces the configured one.
pub const EDGE_ALLOW_LIST_VAR: &str = "EDGE_ALLOW_LIST";

/// Read the stage from `STAGE`, defaulting to dev.
pub fn stage_from_env() -> Result<Stage, Box<dyn Error>> {
    match std::env::var(STAGE_VAR) {
        Ok(stage) if !stage.trim().is_empty() => Ok(stage.parse()?),
        _ => {
            log::info!("{STAGE_VAR} not set, using dev");
            Ok(Stage::Dev)
        }
    }
}

/// Load the settings for `stage`.
///
/// # Arguments
/// * `stage` - The stage whose built-in settings are the fallback
/// * `config_file` - Optional JSON file replacing the built-in settings
///
/// # Returns
/// * `Ok(Environment)` - The settings to plan with
/// * `Err` - If the file is missing or does not parse
pub fn load_environment(
    stage: Stage,
    config_file: Option<&str>,
) -> Result<Environment, Box<dyn Error>> {
    let Some(file) = config_file else {
        log::info!("Using built-in settings for stage {stage}");
        return Ok(stage.environment());
    };
    if !Path::new(file).exists() {
        return Err(format!("Config file does not exist: {file}").into());
    }
    log::info!("Reading stage {stage} settings from {file}");
    let json = std::fs::read_to_string(file)
        .map_err(|e| format!("Error reading config file {file}: {e}"))?;
    parse_environment(&json).map_err(|e| format!("{file}: {e}").into())
}

/// Parse an [`Environment`] from JSON, reporting the path of the failing field.
pub fn parse_environment(json: &str) -> Result<Environment, Box<dyn Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let env: Environment = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        format!(
            "Error parsing stage settings: path={} error={}",
            e.path(),
            e.inner()
        )
    })?;
    Ok(env)
}

/// Replace the CDN allow-list with `value` (comma separated), if given.
///
/// Returns the number of entries applied, or `None` when no override is set.
/// An override with no entries leaves the stage to its empty allow-list
/// policy, which is logged as a warning.
pub fn apply_allow_list_override(env: &mut Environment, value: Option<&str>) -> Option<usize> {
    let value = value?;
    let entries: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    log::info!("{EDGE_ALLOW_LIST_VAR} override: {} entries", entries.len());
    let count = entries.len();
    let cdn = env.cdn.get_or_insert_with(|| {
        log::warn!("{EDGE_ALLOW_LIST_VAR} set but stage has no CDN settings");
        CdnSettings {
            domain_name: String::new(),
            allow_list: vec![],
            empty_allow_list: Default::default(),
        }
    });
    cdn.allow_list = entries;
    if count == 0 {
        log::warn!(
            "{EDGE_ALLOW_LIST_VAR} is set but empty, the allow-list is cleared (empty list policy: {:?})",
            cdn.empty_allow_list
        );
    }
    Some(count)
}
