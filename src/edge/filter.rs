//! Viewer-request decision: IP restriction first, then URI normalization.

use super::allow_list::AllowList;
use super::page::render_access_denied_page;
use serde::{Deserialize, Serialize};

pub const STATUS_FORBIDDEN: u16 = 403;
pub const STATUS_MOVED_PERMANENTLY: u16 = 301;

const DIRECTORY_INDEX: &str = "index.html";

/// Outcome for one inbound request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RequestDecision {
    /// Forward to the origin with this (possibly rewritten) URI.
    Allow { uri: String },
    Deny { status: u16, body: String },
    Redirect { status: u16, location: String },
}

impl RequestDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RequestDecision::Allow { .. })
    }
}

/// Evaluate one request against `allow_list`.
///
/// Access control always runs before the URI is touched, and the rewritten
/// URI is never checked again.
pub fn evaluate(client_address: &str, request_uri: &str, allow_list: &AllowList) -> RequestDecision {
    if !allow_list.is_allowed(client_address) {
        log::info!("deny client={client_address} uri={request_uri}");
        return RequestDecision::Deny {
            status: STATUS_FORBIDDEN,
            body: render_access_denied_page(client_address),
        };
    }
    normalize_uri(request_uri)
}

/// Resolve directory indexes and add missing trailing slashes.
pub fn normalize_uri(request_uri: &str) -> RequestDecision {
    if request_uri.ends_with('/') {
        let mut uri = format!("{request_uri}{DIRECTORY_INDEX}");
        if uri == "//index.html" {
            uri = format!("/{DIRECTORY_INDEX}");
        }
        return RequestDecision::Allow { uri };
    }

    let last_segment = request_uri.rsplit('/').next().unwrap_or(request_uri);
    if !last_segment.contains('.') && request_uri != "/" {
        return RequestDecision::Redirect {
            status: STATUS_MOVED_PERMANENTLY,
            location: format!("{request_uri}/"),
        };
    }

    RequestDecision::Allow {
        uri: request_uri.to_string(),
    }
}

/// Edge filter with its allow-list fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct EdgeFilter {
    allow_list: AllowList,
}

impl EdgeFilter {
    pub fn new(allow_list: AllowList) -> EdgeFilter {
        log::debug!(
            "EdgeFilter with {} allow-list entries, empty policy {:?}",
            allow_list.entries().len(),
            allow_list.empty_policy()
        );
        EdgeFilter { allow_list }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn evaluate(&self, client_address: &str, request_uri: &str) -> RequestDecision {
        evaluate(client_address, request_uri, &self.allow_list)
    }
}
