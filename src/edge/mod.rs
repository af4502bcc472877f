//! Viewer-request edge function logic.
//!
//! - [`allow_list`] - client address allow-list
//! - [`filter`] - allow / deny / redirect decision
//! - [`page`] - the 403 page body

mod allow_list;
mod filter;
mod page;

pub use allow_list::{AllowList, AllowListEntry, EmptyAllowListPolicy};
pub use filter::{
    evaluate, normalize_uri, EdgeFilter, RequestDecision, STATUS_FORBIDDEN,
    STATUS_MOVED_PERMANENTLY,
};
pub use page::{escape_html, render_access_denied_page};
