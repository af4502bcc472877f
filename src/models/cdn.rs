//! CDN distribution plan data model.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub id: String,
    pub domain_name: String,
    pub http_port: u16,
    pub https_port: u16,
    pub protocol_policy: String,
    pub ssl_protocols: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CacheBehavior {
    pub target_origin_id: String,
    pub viewer_protocol_policy: String,
    pub allowed_methods: Vec<String>,
    pub cached_methods: Vec<String>,
    pub compress: bool,
    pub forward_query_string: bool,
    /// Cookie forwarding mode ("none", "whitelist" or "all").
    pub forward_cookies: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DistributionPlan {
    pub comment: String,
    pub enabled: bool,
    pub origin: Origin,
    pub default_cache_behavior: CacheBehavior,
    /// Allow-list entries handed to the viewer-request edge function.
    pub viewer_allow_list: Vec<String>,
}
