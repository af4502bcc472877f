//! Client address allow-list for the viewer-request edge function.

use crate::error::NetError;
use crate::models::NetworkBlock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// A single permitted address or address range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowListEntry {
    Address(Ipv4Addr),
    Block(NetworkBlock),
}

impl AllowListEntry {
    pub fn matches(&self, ip: Ipv4Addr) -> bool {
        match self {
            AllowListEntry::Address(addr) => *addr == ip,
            AllowListEntry::Block(block) => block.contains(ip),
        }
    }
}

impl FromStr for AllowListEntry {
    type Err = NetError;

    /// Entries containing `/` are blocks, everything else a single address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains('/') {
            Ok(AllowListEntry::Block(NetworkBlock::new(s)?))
        } else {
            s.parse()
                .map(AllowListEntry::Address)
                .map_err(|_| NetError::invalid(format!("invalid allow-list address '{s}'")))
        }
    }
}

impl fmt::Display for AllowListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllowListEntry::Address(addr) => write!(f, "{addr}"),
            AllowListEntry::Block(block) => write!(f, "{block}"),
        }
    }
}

/// What an allow-list with no entries means.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyAllowListPolicy {
    /// No entries: every client is let through.
    #[default]
    AllowAll,
    /// No entries: every client is refused.
    DenyAll,
}

/// Ordered, read-only set of permitted client addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    entries: Vec<AllowListEntry>,
    empty_policy: EmptyAllowListPolicy,
}

impl AllowList {
    pub fn new(entries: Vec<AllowListEntry>, empty_policy: EmptyAllowListPolicy) -> AllowList {
        AllowList {
            entries,
            empty_policy,
        }
    }

    /// Parse configured address / CIDR strings.
    pub fn parse<S: AsRef<str>>(
        entries: &[S],
        empty_policy: EmptyAllowListPolicy,
    ) -> Result<AllowList, NetError> {
        let entries = entries
            .iter()
            .map(|e| e.as_ref().parse())
            .collect::<Result<Vec<AllowListEntry>, NetError>>()?;
        Ok(AllowList::new(entries, empty_policy))
    }

    pub fn entries(&self) -> &[AllowListEntry] {
        &self.entries
    }

    pub fn empty_policy(&self) -> EmptyAllowListPolicy {
        self.empty_policy
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decide whether `client_address` may pass.
    ///
    /// Addresses that do not parse as IPv4 are refused unless the list is
    /// empty under [`EmptyAllowListPolicy::AllowAll`].
    pub fn is_allowed(&self, client_address: &str) -> bool {
        if self.entries.is_empty() {
            return self.empty_policy == EmptyAllowListPolicy::AllowAll;
        }
        match client_address.trim().parse::<Ipv4Addr>() {
            Ok(ip) => self.entries.iter().any(|e| e.matches(ip)),
            Err(_) => {
                log::debug!("unparseable client address '{client_address}', denying");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries() {
        let list = AllowList::parse(&["127.0.0.1", "10.0.0.0/24"], Default::default()).unwrap();
        assert_eq!(
            list.entries(),
            &[
                AllowListEntry::Address(Ipv4Addr::new(127, 0, 0, 1)),
                AllowListEntry::Block(NetworkBlock::new("10.0.0.0/24").unwrap()),
            ]
        );
        assert!(AllowList::parse(&["10.0.0.300"], Default::default()).is_err());
        assert!(AllowList::parse(&["10.0.0.0/40"], Default::default()).is_err());
    }

    #[test]
    fn test_address_entry_is_exact() {
        let list = AllowList::parse(&["203.0.113.7"], Default::default()).unwrap();
        assert!(list.is_allowed("203.0.113.7"));
        assert!(!list.is_allowed("203.0.113.8"));
    }

    #[test]
    fn test_block_entry_masks_host_bits() {
        let list = AllowList::parse(&["198.51.100.77/26"], Default::default()).unwrap();
        assert!(list.is_allowed("198.51.100.64"));
        assert!(list.is_allowed("198.51.100.127"));
        assert!(!list.is_allowed("198.51.100.128"));
    }

    #[test]
    fn test_empty_list_policy() {
        let open = AllowList::new(vec![], EmptyAllowListPolicy::AllowAll);
        assert!(open.is_allowed("192.0.2.1"));
        assert!(open.is_allowed("not-an-ip"));
        let closed = AllowList::new(vec![], EmptyAllowListPolicy::DenyAll);
        assert!(!closed.is_allowed("192.0.2.1"));
    }

    #[test]
    fn test_unparseable_address_fails_closed() {
        let list = AllowList::parse(&["0.0.0.0/0"], Default::default()).unwrap();
        assert!(list.is_allowed("8.8.8.8"));
        assert!(!list.is_allowed("2001:db8::1"));
        assert!(!list.is_allowed(""));
        assert!(!list.is_allowed("<script>"));
    }
}
