//! IPv4 network blocks in CIDR notation.
//!
//! Provides [`NetworkBlock`] plus the bit helpers the partitioner and the
//! edge allow-list are built on. Every helper works on the address as a
//! single `u32`, so carries propagate through all four octets.

use crate::error::NetError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum prefix length for an IPv4 block (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use stage_net_plan::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, NetError> {
    if len > MAX_LENGTH {
        Err(NetError::invalid(format!("prefix length /{len} is too long")))
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Number of addresses covered by a block of the given prefix length.
pub fn block_size(len: u8) -> Result<u64, NetError> {
    if len > MAX_LENGTH {
        Err(NetError::invalid(format!("prefix length /{len} is too long")))
    } else {
        Ok(1u64 << (MAX_LENGTH - len))
    }
}

/// Get the network address for a given IP and prefix length.
pub fn network_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, NetError> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv4Addr::from(u32::from(addr) & mask))
}

/// Calculate the broadcast (highest) address for a given IP and prefix length.
pub fn broadcast_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, NetError> {
    let mask = get_cidr_mask(len)?;
    let network_bits = u32::from(addr) & mask;
    Ok(Ipv4Addr::from(network_bits | !mask))
}

/// Add `offset` addresses to `addr`, failing if the result leaves the IPv4 space.
pub fn offset_addr(addr: Ipv4Addr, offset: u64) -> Result<Ipv4Addr, NetError> {
    let bits = u64::from(u32::from(addr))
        .checked_add(offset)
        .filter(|bits| *bits <= u64::from(u32::MAX))
        .ok_or_else(|| NetError::invalid(format!("{addr} + {offset} overflows the address space")))?;
    Ok(Ipv4Addr::from(bits as u32))
}

/// Calculate the number of usable host addresses in an AWS subnet.
///
/// AWS reserves 5 addresses per subnet (network, VPC router, DNS, future use, broadcast).
pub fn num_aws_hosts(len: u8) -> Result<u64, NetError> {
    if len >= MAX_LENGTH - 2 {
        Err(NetError::invalid(format!(
            "prefix length /{len} leaves no usable hosts"
        )))
    } else {
        Ok(block_size(len)? - 5)
    }
}

/// IPv4 address block (address + prefix length).
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct NetworkBlock {
    addr: Ipv4Addr,
    prefix: u8,
}

impl NetworkBlock {
    /// Create a new [`NetworkBlock`] from a CIDR string (e.g. "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<NetworkBlock, NetError> {
        let addr_cidr = addr_cidr.trim();
        let (addr, prefix) = addr_cidr
            .split_once('/')
            .ok_or_else(|| NetError::invalid(format!("'{addr_cidr}' is not in a.b.c.d/n form")))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| NetError::invalid(format!("invalid address '{addr}'")))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| NetError::invalid(format!("invalid prefix length '{prefix}'")))?;
        NetworkBlock::from_parts(addr, prefix)
    }

    pub fn from_parts(addr: Ipv4Addr, prefix: u8) -> Result<NetworkBlock, NetError> {
        if prefix > MAX_LENGTH {
            return Err(NetError::invalid(format!("prefix length /{prefix} is too long")));
        }
        Ok(NetworkBlock { addr, prefix })
    }

    /// The `a.b.0.0/16` block.
    pub(crate) fn slash16(a: u8, b: u8) -> NetworkBlock {
        NetworkBlock {
            addr: Ipv4Addr::new(a, b, 0, 0),
            prefix: 16,
        }
    }

    /// The address as written; may carry host bits.
    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    /// The prefix length, always within 0..=32.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// The network-aligned form of this block (host bits cleared).
    pub fn network(&self) -> NetworkBlock {
        NetworkBlock {
            addr: self.lo(),
            prefix: self.prefix,
        }
    }

    pub fn mask(&self) -> u32 {
        // prefix is bounded by construction
        get_cidr_mask(self.prefix).unwrap_or(u32::MAX)
    }

    /// Lowest (network) address in the block.
    pub fn lo(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) & self.mask())
    }

    /// Highest (broadcast) address in the block.
    pub fn hi(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) | !self.mask())
    }

    /// Number of addresses in the block.
    pub fn size(&self) -> u64 {
        1u64 << (MAX_LENGTH - self.prefix)
    }

    /// Check if an IP address is contained within this block.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        let mask = self.mask();
        (u32::from(ip) & mask) == (u32::from(self.addr) & mask)
    }

    /// Check if `other` lies entirely inside this block.
    pub fn contains_block(&self, other: &NetworkBlock) -> bool {
        other.prefix >= self.prefix && self.contains(other.lo())
    }

    pub fn overlaps(&self, other: &NetworkBlock) -> bool {
        self.lo() <= other.hi() && other.lo() <= self.hi()
    }
}

impl FromStr for NetworkBlock {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetworkBlock::new(s)
    }
}

impl Serialize for NetworkBlock {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NetworkBlock {
    fn deserialize<D>(deserializer: D) -> Result<NetworkBlock, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NetworkBlock::new(&s).map_err(de::Error::custom)
    }
}

impl std::fmt::Display for NetworkBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}
