//! Bus interconnect unit tests.
//!
//! Verifies region registration, address routing, typed accessors, unmapped
//! access faults and valid address checks.

use cyclebench_core::common::{ConfigError, HarnessError};
use cyclebench_core::soc::{Bus, MemoryRegion};
use proptest::prelude::*;

const RAM_BASE: u64 = 0x8000_0000;

fn make_bus_with_ram(base: u64, size: u64) -> Bus {
    let mut bus = Bus::new();
    bus.register(base, MemoryRegion::new(size).unwrap()).unwrap();
    bus
}

fn two_region_bus() -> Bus {
    let mut bus = make_bus_with_ram(RAM_BASE, 0x1000);
    bus.register(0x8100_0000, MemoryRegion::new(0x2000).unwrap())
        .unwrap();
    bus
}

// ══════════════════════════════════════════════════════════
// 1. Registration
// ══════════════════════════════════════════════════════════

#[test]
fn empty_bus_has_no_regions() {
    let bus = Bus::new();
    assert_eq!(bus.region_count(), 0);
    assert!(!bus.is_valid_address(RAM_BASE));
}

#[test]
fn regions_are_listed_in_address_order() {
    let mut bus = make_bus_with_ram(0x8100_0000, 0x2000);
    bus.register(RAM_BASE, MemoryRegion::new(0x1000).unwrap())
        .unwrap();
    let regions: Vec<_> = bus.regions().collect();
    assert_eq!(regions, vec![(RAM_BASE, 0x1000), (0x8100_0000, 0x2000)]);
}

#[test]
fn adjacent_regions_are_accepted() {
    let mut bus = make_bus_with_ram(RAM_BASE, 0x1000);
    bus.register(RAM_BASE + 0x1000, MemoryRegion::new(0x1000).unwrap())
        .unwrap();
    assert_eq!(bus.region_count(), 2);
}

#[test]
fn overlapping_region_is_rejected() {
    let mut bus = make_bus_with_ram(RAM_BASE, 0x2000);
    let err = bus
        .register(RAM_BASE + 0x1000, MemoryRegion::new(0x2000).unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Configuration(ConfigError::Overlap {
            existing: RAM_BASE,
            ..
        })
    ));
    assert_eq!(bus.region_count(), 1);
}

#[test]
fn region_enclosing_existing_is_rejected() {
    let mut bus = make_bus_with_ram(RAM_BASE + 0x1000, 0x1000);
    let err = bus
        .register(RAM_BASE, MemoryRegion::new(0x4000).unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Configuration(ConfigError::Overlap { .. })
    ));
}

#[test]
fn misaligned_base_is_rejected() {
    let mut bus = Bus::new();
    let err = bus
        .register(0x1001, MemoryRegion::new(0x1000).unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Configuration(ConfigError::Misaligned {
            base: 0x1001,
            size: 0x1000
        })
    ));
}

#[test]
fn misaligned_size_is_rejected() {
    let mut bus = Bus::new();
    let err = bus
        .register(RAM_BASE, MemoryRegion::new(100).unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Configuration(ConfigError::Misaligned { .. })
    ));
    assert_eq!(bus.region_count(), 0);
}

// ══════════════════════════════════════════════════════════
// 2. Routing
// ══════════════════════════════════════════════════════════

#[test]
fn store_then_load_round_trips() {
    let mut bus = make_bus_with_ram(RAM_BASE, 0x1000);
    bus.store(RAM_BASE + 0x10, &[0xDE, 0xAD, 0xBE, 0xEF])
        .unwrap();
    let mut buf = [0u8; 4];
    bus.load(RAM_BASE + 0x10, &mut buf).unwrap();
    assert_eq!(buf, [0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn accesses_route_to_the_right_region() {
    let mut bus = two_region_bus();
    bus.write_u32(RAM_BASE, 0x1111_1111).unwrap();
    bus.write_u32(0x8100_0000, 0x2222_2222).unwrap();
    assert_eq!(bus.read_u32(RAM_BASE).unwrap(), 0x1111_1111);
    assert_eq!(bus.read_u32(0x8100_0000).unwrap(), 0x2222_2222);
}

#[test]
fn last_byte_of_region_is_accessible() {
    let mut bus = make_bus_with_ram(RAM_BASE, 0x1000);
    bus.write_u8(RAM_BASE + 0xFFF, 0x5A).unwrap();
    assert_eq!(bus.read_u8(RAM_BASE + 0xFFF).unwrap(), 0x5A);
}

#[test]
fn typed_accessors_are_little_endian() {
    let mut bus = make_bus_with_ram(RAM_BASE, 0x1000);
    bus.write_u64(RAM_BASE, 0x0807_0605_0403_0201).unwrap();
    assert_eq!(bus.read_u8(RAM_BASE).unwrap(), 0x01);
    assert_eq!(bus.read_u32(RAM_BASE + 4).unwrap(), 0x0807_0605);
    assert_eq!(bus.read_u64(RAM_BASE).unwrap(), 0x0807_0605_0403_0201);
}

#[test]
fn load_binary_at_places_bytes() {
    let mut bus = make_bus_with_ram(RAM_BASE, 0x1000);
    bus.load_binary_at(&[0x13, 0x00, 0x00, 0x00], RAM_BASE + 0x100)
        .unwrap();
    assert_eq!(bus.read_u32(RAM_BASE + 0x100).unwrap(), 0x13);
}

#[test]
fn fresh_region_reads_zero() {
    let bus = make_bus_with_ram(RAM_BASE, 0x1000);
    assert_eq!(bus.read_u64(RAM_BASE + 0x800).unwrap(), 0);
}

// ══════════════════════════════════════════════════════════
// 3. Unmapped accesses
// ══════════════════════════════════════════════════════════

#[test]
fn load_below_first_region_faults() {
    let bus = make_bus_with_ram(RAM_BASE, 0x1000);
    let mut buf = [0u8; 4];
    let err = bus.load(0x10, &mut buf).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::UnmappedAccess { addr: 0x10, len: 4 }
    ));
}

#[test]
fn load_past_end_faults() {
    let bus = make_bus_with_ram(RAM_BASE, 0x1000);
    assert!(matches!(
        bus.read_u8(RAM_BASE + 0x1000),
        Err(HarnessError::UnmappedAccess { .. })
    ));
}

#[test]
fn access_crossing_region_end_faults_without_side_effects() {
    let mut bus = make_bus_with_ram(RAM_BASE, 0x1000);
    let err = bus.write_u64(RAM_BASE + 0xFFC, u64::MAX).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::UnmappedAccess {
            addr: 0x8000_0FFC,
            len: 8
        }
    ));
    assert_eq!(bus.read_u32(RAM_BASE + 0xFFC).unwrap(), 0);
}

#[test]
fn access_spanning_adjacent_regions_faults() {
    let mut bus = make_bus_with_ram(RAM_BASE, 0x1000);
    bus.register(RAM_BASE + 0x1000, MemoryRegion::new(0x1000).unwrap())
        .unwrap();
    let err = bus.write_u32(RAM_BASE + 0xFFE, 0xFFFF_FFFF).unwrap_err();
    assert!(matches!(err, HarnessError::UnmappedAccess { len: 4, .. }));
    assert_eq!(bus.read_u8(RAM_BASE + 0xFFE).unwrap(), 0);
    assert_eq!(bus.read_u8(RAM_BASE + 0x1000).unwrap(), 0);
}

#[test]
fn failed_load_leaves_destination_untouched() {
    let bus = make_bus_with_ram(RAM_BASE, 0x1000);
    let mut buf = [0xAAu8; 8];
    assert!(bus.load(RAM_BASE + 0xFFC, &mut buf).is_err());
    assert_eq!(buf, [0xAA; 8]);
}

#[test]
fn gap_between_regions_faults() {
    let bus = two_region_bus();
    assert!(bus.read_u8(RAM_BASE + 0x1000).is_err());
    assert!(bus.read_u8(0x80FF_FFFF).is_err());
}

#[test]
fn is_valid_address_checks_every_region() {
    let bus = two_region_bus();
    assert!(bus.is_valid_address(RAM_BASE));
    assert!(bus.is_valid_address(RAM_BASE + 0xFFF));
    assert!(!bus.is_valid_address(RAM_BASE + 0x1000));
    assert!(bus.is_valid_address(0x8100_1FFF));
    assert!(!bus.is_valid_address(0x8100_2000));
}

#[test]
fn zero_length_access_needs_a_mapped_address() {
    let mut bus = make_bus_with_ram(RAM_BASE, 0x1000);
    assert!(bus.store(RAM_BASE, &[]).is_ok());
    assert!(bus.store(RAM_BASE + 0x1000, &[]).is_err());
}

// ══════════════════════════════════════════════════════════
// 4. Properties
// ══════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn in_range_accesses_round_trip(offset in 0u64..0x2000 - 8, value: u64) {
        let mut bus = two_region_bus();
        let addr = 0x8100_0000 + offset;
        bus.write_u64(addr, value).unwrap();
        prop_assert_eq!(bus.read_u64(addr).unwrap(), value);
    }

    #[test]
    fn routing_matches_region_bounds(addr in 0x7FFF_F000u64..0x8100_3000, len in 1usize..16) {
        let bus = two_region_bus();
        let end = addr + len as u64;
        let inside = (addr >= RAM_BASE && end <= RAM_BASE + 0x1000)
            || (addr >= 0x8100_0000 && end <= 0x8100_2000);
        let mut buf = vec![0u8; len];
        prop_assert_eq!(bus.load(addr, &mut buf).is_ok(), inside);
    }
}
