//! JSON plan file handed to the provisioning engine.

use crate::models::StagePlan;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Default plan file name, dated in the stage region's time zone.
pub fn plan_file_name(stage: &str) -> String {
    let now = chrono::Utc::now().with_timezone(&chrono_tz::Asia::Tokyo);
    format!("plan_{stage}_{}.json", now.format("%Y-%m-%d"))
}

/// Write `plan` as pretty JSON into `dir`, returning the written path.
pub fn write_plan(plan: &StagePlan, dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(plan_file_name(&plan.stage));
    let json =
        serde_json::to_string_pretty(plan).map_err(|e| format!("Error serializing plan: {e}"))?;
    log::warn!("Writing plan to file: {}", path.display());
    std::fs::write(&path, json)
        .map_err(|e| format!("Error writing plan file {}: {e}", path.display()))?;
    Ok(path)
}

/// Read a previously written plan.
pub fn read_plan(path: &Path) -> Result<StagePlan, Box<dyn Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading plan file {}: {e}", path.display()))?;
    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let plan = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| format!("Error parsing plan: path={} error={}", e.path(), e.inner()))?;
    Ok(plan)
}
