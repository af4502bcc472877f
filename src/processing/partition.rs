//! Deterministic subnet partitioning.
//!
//! Splits a base block into equally sized child blocks and spreads them
//! round-robin over availability zones. Tier labelling happens one level up.

use crate::error::NetError;
use crate::models::{block_size, offset_addr, NetworkBlock, SubnetAllocation, MAX_LENGTH};

/// Derive `count` child blocks of `/child_prefix` from the start of `base`.
///
/// Child `i` sits at `base + i * 2^(32 - child_prefix)` and is assigned to
/// availability zone `i % az_count`.
///
/// # Examples
/// ```
/// use stage_net_plan::models::NetworkBlock;
/// use stage_net_plan::processing::derive;
///
/// let base = NetworkBlock::new("10.0.0.0/16").unwrap();
/// let plan = derive(base, 20, 3, 2).unwrap();
/// assert_eq!(plan[2].block.to_string(), "10.0.32.0/20");
/// assert_eq!(plan[2].availability_zone_index, 0);
/// ```
pub fn derive(
    base: NetworkBlock,
    child_prefix: u8,
    count: usize,
    az_count: usize,
) -> Result<Vec<SubnetAllocation>, NetError> {
    derive_range(base, child_prefix, 0, count, az_count)
}

/// Derive `count` child blocks starting at child index `first_index`.
///
/// Availability zones restart at 0 for `first_index`, so the n-th block of
/// every range lands in the same zone.
pub fn derive_range(
    base: NetworkBlock,
    child_prefix: u8,
    first_index: usize,
    count: usize,
    az_count: usize,
) -> Result<Vec<SubnetAllocation>, NetError> {
    check_arguments(base, child_prefix, first_index, count, az_count)?;

    let base = base.network();
    let size = block_size(child_prefix)?;
    log::debug!(
        "derive_range({base}, /{child_prefix}, first={first_index}, count={count}, azs={az_count})"
    );

    (0..count)
        .map(|i| {
            let offset = (first_index + i) as u64 * size;
            let addr = offset_addr(base.addr(), offset)?;
            Ok(SubnetAllocation {
                block: NetworkBlock::from_parts(addr, child_prefix)?,
                availability_zone_index: i % az_count,
            })
        })
        .collect()
}

/// Number of non-overlapping `/child_prefix` blocks that fit in `base`.
pub fn capacity(base: NetworkBlock, child_prefix: u8) -> Result<u64, NetError> {
    if child_prefix > MAX_LENGTH {
        return Err(NetError::invalid(format!(
            "child prefix /{child_prefix} exceeds /{MAX_LENGTH}"
        )));
    }
    if child_prefix <= base.prefix() {
        return Err(NetError::invalid(format!(
            "child prefix /{child_prefix} must be longer than base prefix /{}",
            base.prefix()
        )));
    }
    Ok(1u64 << (child_prefix - base.prefix()))
}

fn check_arguments(
    base: NetworkBlock,
    child_prefix: u8,
    first_index: usize,
    count: usize,
    az_count: usize,
) -> Result<(), NetError> {
    if az_count == 0 {
        return Err(NetError::invalid("az_count must be at least 1"));
    }
    let available = capacity(base, child_prefix)?;
    let needed = first_index as u64 + count as u64;
    if needed > available {
        return Err(NetError::invalid(format!(
            "{base} holds {available} /{child_prefix} blocks, {needed} requested"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn block(s: &str) -> NetworkBlock {
        NetworkBlock::new(s).unwrap()
    }

    #[test]
    fn test_derive_sixteenths_of_vpc() {
        let plan = derive(block("10.23.0.0/16"), 20, 6, 2).unwrap();
        let cidrs: Vec<String> = plan.iter().map(|a| a.block.to_string()).collect();
        assert_eq!(
            cidrs,
            vec![
                "10.23.0.0/20",
                "10.23.16.0/20",
                "10.23.32.0/20",
                "10.23.48.0/20",
                "10.23.64.0/20",
                "10.23.80.0/20",
            ]
        );
        let azs: Vec<usize> = plan.iter().map(|a| a.availability_zone_index).collect();
        assert_eq!(azs, vec![0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_derive_zero_count_is_empty() {
        for azs in 1..4 {
            assert!(derive(block("10.0.0.0/16"), 20, 0, azs).unwrap().is_empty());
        }
    }

    #[test]
    fn test_derive_carries_past_third_octet() {
        // 300 /24s inside a /15 walk from 10.0.x.0 into 10.1.x.0
        let plan = derive(block("10.0.0.0/15"), 24, 300, 3).unwrap();
        assert_eq!(plan[255].block.to_string(), "10.0.255.0/24");
        assert_eq!(plan[256].block.to_string(), "10.1.0.0/24");
        assert_eq!(plan[299].block.to_string(), "10.1.43.0/24");
        assert_eq!(plan[299].availability_zone_index, 299 % 3);
    }

    #[test]
    fn test_derive_blocks_disjoint_and_contained() {
        let base = block("172.16.0.0/12");
        let plan = derive(base, 18, 64, 3).unwrap();
        for (i, a) in plan.iter().enumerate() {
            assert!(base.contains_block(&a.block), "{} outside {base}", a.block);
            for b in plan.iter().skip(i + 1) {
                assert!(!a.block.overlaps(&b.block), "{} overlaps {}", a.block, b.block);
            }
        }
    }

    #[test]
    fn test_derive_is_deterministic() {
        let base = block("10.21.0.0/16");
        assert_eq!(derive(base, 20, 16, 3).unwrap(), derive(base, 20, 16, 3).unwrap());
    }

    #[test]
    fn test_derive_full_capacity() {
        let plan = derive(block("10.0.0.0/16"), 20, 16, 2).unwrap();
        assert_eq!(plan.last().unwrap().block.hi(), Ipv4Addr::new(10, 0, 255, 255));
    }

    #[test]
    fn test_derive_rejects_invalid_arguments() {
        let base = block("10.0.0.0/16");
        assert!(derive(base, 16, 1, 2).is_err(), "child prefix not longer");
        assert!(derive(base, 12, 1, 2).is_err(), "child prefix shorter");
        assert!(derive(base, 33, 1, 2).is_err(), "child prefix past 32");
        assert!(derive(base, 20, 17, 2).is_err(), "more blocks than fit");
        assert!(derive(base, 20, 1, 0).is_err(), "zero zones");
        assert!(matches!(
            derive(base, 20, 17, 2),
            Err(NetError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_derive_normalizes_unaligned_base() {
        let plan = derive(block("10.0.3.7/16"), 20, 2, 1).unwrap();
        assert_eq!(plan[0].block.to_string(), "10.0.0.0/20");
        assert_eq!(plan[1].block.to_string(), "10.0.16.0/20");
    }

    #[test]
    fn test_derive_range_restarts_zones() {
        let base = block("10.22.0.0/16");
        let private = derive_range(base, 20, 2, 2, 2).unwrap();
        assert_eq!(private[0].block.to_string(), "10.22.32.0/20");
        assert_eq!(private[0].availability_zone_index, 0);
        assert_eq!(private[1].availability_zone_index, 1);
        assert!(derive_range(base, 20, 15, 2, 2).is_err());
    }

    #[test]
    fn test_capacity() {
        assert_eq!(capacity(block("10.0.0.0/16"), 20).unwrap(), 16);
        assert_eq!(capacity(block("0.0.0.0/0"), 32).unwrap(), 1u64 << 32);
    }
}
