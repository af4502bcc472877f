//! CDN distribution planning.

use crate::config::CdnSettings;
use crate::edge::{AllowList, EdgeFilter};
use crate::error::NetError;
use crate::models::{CacheBehavior, DistributionPlan, Origin};

const DEFAULT_ORIGIN_ID: &str = "default-origin";

const ALLOWED_METHODS: [&str; 7] = ["DELETE", "GET", "HEAD", "OPTIONS", "PATCH", "POST", "PUT"];
const CACHED_METHODS: [&str; 2] = ["GET", "HEAD"];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Build the distribution plan for one stage.
///
/// The allow-list is parsed here so a bad entry fails the plan instead of
/// surfacing at request time.
pub fn plan_distribution(stage: &str, settings: &CdnSettings) -> Result<DistributionPlan, NetError> {
    let domain_name = settings.domain_name.trim();
    if domain_name.is_empty() || domain_name.contains(char::is_whitespace) {
        return Err(NetError::invalid(format!(
            "invalid origin domain name '{}'",
            settings.domain_name
        )));
    }
    let allow_list = edge_filter(settings)?.allow_list().clone();
    log::info!(
        "plan_distribution stage={stage} origin={domain_name} allow_list={} entries",
        allow_list.entries().len()
    );

    Ok(DistributionPlan {
        comment: format!("{stage} CDN Distribution"),
        enabled: true,
        origin: Origin {
            id: DEFAULT_ORIGIN_ID.to_string(),
            domain_name: domain_name.to_string(),
            http_port: 80,
            https_port: 443,
            protocol_policy: "https-only".to_string(),
            ssl_protocols: to_strings(&["TLSv1.2"]),
        },
        default_cache_behavior: CacheBehavior {
            target_origin_id: DEFAULT_ORIGIN_ID.to_string(),
            viewer_protocol_policy: "redirect-to-https".to_string(),
            allowed_methods: to_strings(&ALLOWED_METHODS),
            cached_methods: to_strings(&CACHED_METHODS),
            compress: true,
            forward_query_string: false,
            forward_cookies: "none".to_string(),
        },
        viewer_allow_list: allow_list.entries().iter().map(|e| e.to_string()).collect(),
    })
}

/// Build the edge filter configured for a distribution.
pub fn edge_filter(settings: &CdnSettings) -> Result<EdgeFilter, NetError> {
    let allow_list = AllowList::parse(settings.allow_list.as_slice(), settings.empty_allow_list)?;
    Ok(EdgeFilter::new(allow_list))
}
