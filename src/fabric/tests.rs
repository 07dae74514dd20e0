use std::collections::HashSet;
use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use proptest::prelude::*;

use super::*;
use crate::models::{IpConfig, TierConfig};

fn config(spines: usize, leaves: usize) -> FabricConfig {
    FabricConfig {
        dc_name: "DC1".to_string(),
        spines: TierConfig {
            number: spines,
            fabric_interfaces: "1-4".to_string(),
        },
        leaves: TierConfig {
            number: leaves,
            fabric_interfaces: "1-4".to_string(),
        },
        ip: IpConfig {
            loopbacks: "10.0.0.0/24".parse().unwrap(),
            fabric_ptp: "10.1.0.0/16".parse().unwrap(),
            asn_range: "65000-65010".to_string(),
        },
    }
}

fn ip(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

fn net(s: &str) -> Ipv4Net {
    s.parse().unwrap()
}

#[test]
fn test_two_by_two_fabric() {
    let fabric = FabricBuilder::from_config(&config(2, 2)).unwrap().build().unwrap();

    assert_eq!(fabric.name(), "DC1");
    assert_eq!(fabric.devices().count(), 4);
    assert_eq!(fabric.links().len(), 4);

    let asns: Vec<(&str, u32)> = fabric.devices().map(|d| (d.name(), d.asn())).collect();
    assert_eq!(
        asns,
        vec![("spine1", 65000), ("spine2", 65001), ("leaf1", 65002), ("leaf2", 65003)]
    );

    let loopbacks: Vec<Ipv4Net> = fabric.devices().map(|d| d.loopback()).collect();
    assert_eq!(
        loopbacks,
        vec![net("10.0.0.0/32"), net("10.0.0.1/32"), net("10.0.0.2/32"), net("10.0.0.3/32")]
    );

    let first = &fabric.links()[0];
    assert_eq!(first.subnet, net("10.1.0.0/31"));
    assert_eq!(first.spine.device, "spine1");
    assert_eq!(first.spine.address, ip("10.1.0.0"));
    assert_eq!(first.leaf.device, "leaf1");
    assert_eq!(first.leaf.address, ip("10.1.0.1"));

    let order: Vec<(&str, &str, Ipv4Net)> = fabric
        .links()
        .iter()
        .map(|l| (l.leaf.device.as_str(), l.spine.device.as_str(), l.subnet))
        .collect();
    assert_eq!(
        order,
        vec![
            ("leaf1", "spine1", net("10.1.0.0/31")),
            ("leaf1", "spine2", net("10.1.0.2/31")),
            ("leaf2", "spine1", net("10.1.0.4/31")),
            ("leaf2", "spine2", net("10.1.0.6/31")),
        ]
    );
}

#[test]
fn test_device_tables_after_wiring() {
    let fabric = FabricBuilder::from_config(&config(2, 2)).unwrap().build().unwrap();

    let spine1 = fabric.device("spine1").unwrap();
    assert_eq!(spine1.interface_addresses()[&1], net("10.1.0.0/31"));
    assert_eq!(spine1.interface_addresses()[&2], net("10.1.0.4/31"));
    assert_eq!(spine1.bgp_neighbors()[&ip("10.1.0.1")], 65002);
    assert_eq!(spine1.bgp_neighbors()[&ip("10.1.0.5")], 65003);
    assert_eq!(spine1.available_interfaces().iter().copied().collect::<Vec<_>>(), vec![3, 4]);

    let leaf2 = fabric.device("leaf2").unwrap();
    assert_eq!(leaf2.interface_addresses()[&1], net("10.1.0.5/31"));
    assert_eq!(leaf2.interface_addresses()[&2], net("10.1.0.7/31"));
    assert_eq!(leaf2.bgp_neighbors()[&ip("10.1.0.4")], 65000);
    assert_eq!(leaf2.bgp_neighbors()[&ip("10.1.0.6")], 65001);

    assert_eq!(fabric.links_for("leaf2").count(), 2);
    assert!(fabric.device("leaf3").is_none());
}

#[test]
fn test_link_labels_use_last_octet() {
    let fabric = FabricBuilder::from_config(&config(2, 2)).unwrap().build().unwrap();
    let last = fabric.links().last().unwrap();
    assert_eq!(last.spine.label(), "e2 ip: .6");
    assert_eq!(last.leaf.label(), "e2 ip: .7");
}

#[test]
fn test_leaf_interfaces_smaller_than_spine_count() {
    let mut cfg = config(2, 2);
    cfg.leaves.fabric_interfaces = "1-1".to_string();

    let err = FabricBuilder::from_config(&cfg).unwrap().build().unwrap_err();
    assert_eq!(err, FabricError::InterfaceExhausted { device: "leaf1".to_string() });
}

#[test]
fn test_spine_interfaces_smaller_than_leaf_count() {
    let mut cfg = config(2, 3);
    cfg.spines.fabric_interfaces = "1-2".to_string();

    let err = FabricBuilder::from_config(&cfg).unwrap().build().unwrap_err();
    assert_eq!(err, FabricError::InterfaceExhausted { device: "spine1".to_string() });
}

#[test]
fn test_loopback_exhaustion_before_links() {
    let mut cfg = config(2, 1);
    cfg.ip.loopbacks = net("10.0.0.0/31");

    let builder = FabricBuilder::from_config(&cfg).unwrap();
    assert_eq!(
        builder.create_devices().unwrap_err(),
        FabricError::PoolExhausted { pool: PoolKind::Loopback }
    );
}

#[test]
fn test_oversized_tier_count_exhausts_loopbacks() {
    let mut cfg = config(2, 2);
    cfg.spines.number = 1usize << 60;
    let err = FabricBuilder::from_config(&cfg).unwrap().build().unwrap_err();
    assert_eq!(err, FabricError::PoolExhausted { pool: PoolKind::Loopback });

    let mut cfg = config(2, 2);
    cfg.leaves.number = usize::MAX;
    let err = FabricBuilder::from_config(&cfg).unwrap().create_devices().unwrap_err();
    assert_eq!(err, FabricError::PoolExhausted { pool: PoolKind::Loopback });
}

#[test]
fn test_wide_asn_range_builds() {
    let mut cfg = config(2, 2);
    cfg.ip.asn_range = "4200000000-4294967294".to_string();
    let fabric = FabricBuilder::from_config(&cfg).unwrap().build().unwrap();
    let asns: Vec<u32> = fabric.devices().map(|d| d.asn()).collect();
    assert_eq!(asns, vec![4_200_000_000, 4_200_000_001, 4_200_000_002, 4_200_000_003]);
}

#[test]
fn test_asn_exhaustion() {
    let mut cfg = config(2, 2);
    cfg.ip.asn_range = "65000-65002".to_string();

    let err = FabricBuilder::from_config(&cfg).unwrap().build().unwrap_err();
    assert_eq!(err, FabricError::PoolExhausted { pool: PoolKind::Asn });
}

#[test]
fn test_ptp_exhaustion() {
    let mut cfg = config(2, 2);
    cfg.ip.fabric_ptp = net("10.1.0.0/30");

    let err = FabricBuilder::from_config(&cfg).unwrap().build().unwrap_err();
    assert_eq!(err, FabricError::PoolExhausted { pool: PoolKind::PointToPoint });
}

#[test]
fn test_malformed_ranges_fail_before_build() {
    let mut cfg = config(2, 2);
    cfg.ip.asn_range = "65010-65000".to_string();
    assert!(matches!(
        FabricBuilder::from_config(&cfg),
        Err(FabricError::MalformedRange { .. })
    ));

    let mut cfg = config(2, 2);
    cfg.spines.fabric_interfaces = "eth1-eth4".to_string();
    assert!(matches!(
        FabricBuilder::from_config(&cfg),
        Err(FabricError::MalformedRange { .. })
    ));
}

#[test]
fn test_stages_run_once_in_order() {
    let builder = FabricBuilder::from_config(&config(1, 1)).unwrap();
    assert_eq!(builder.state(), BuildState::Unbuilt);

    let builder = builder.create_devices().unwrap();
    assert_eq!(builder.state(), BuildState::DevicesCreated);

    let again = FabricBuilder::from_config(&config(1, 1))
        .unwrap()
        .create_devices()
        .unwrap()
        .create_devices()
        .unwrap_err();
    assert_eq!(
        again,
        FabricError::InvalidState {
            expected: BuildState::Unbuilt,
            actual: BuildState::DevicesCreated,
        }
    );

    let early = FabricBuilder::from_config(&config(1, 1)).unwrap().finish().unwrap_err();
    assert_eq!(
        early,
        FabricError::InvalidState {
            expected: BuildState::LinksCreated,
            actual: BuildState::Unbuilt,
        }
    );

    let builder = builder.create_links().unwrap();
    assert_eq!(builder.state(), BuildState::LinksCreated);
    let fabric = builder.finish().unwrap();
    assert_eq!(fabric.links().len(), 1);
}

#[test]
fn test_empty_tier_builds_no_links() {
    let fabric = FabricBuilder::from_config(&config(2, 0)).unwrap().build().unwrap();
    assert_eq!(fabric.spines().len(), 2);
    assert!(fabric.leaves().is_empty());
    assert!(fabric.links().is_empty());
}

#[test]
fn test_wider_ptp_blocks_skip_network_and_broadcast() {
    let pool = AddressPool::with_prefix_lengths(net("10.0.0.0/24"), 32, net("10.1.0.0/24"), 30).unwrap();
    let fabric = FabricBuilder::new("lab", pool, 1..=2, (1, vec![1]), (1, vec![1]))
        .build()
        .unwrap();

    let link = &fabric.links()[0];
    assert_eq!(link.subnet, net("10.1.0.0/30"));
    assert_eq!(link.spine.address, ip("10.1.0.1"));
    assert_eq!(link.leaf.address, ip("10.1.0.2"));
    assert_eq!(
        fabric.device("leaf1").unwrap().interface_addresses()[&1],
        net("10.1.0.2/30")
    );
}

fn sized_config(spines: usize, leaves: usize, slack: u32) -> FabricConfig {
    FabricConfig {
        dc_name: "prop".to_string(),
        spines: TierConfig {
            number: spines,
            fabric_interfaces: format!("1-{}", leaves as u32 + slack + 1),
        },
        leaves: TierConfig {
            number: leaves,
            fabric_interfaces: format!("49-{}", 49 + spines as u32 + slack),
        },
        ip: IpConfig {
            loopbacks: "192.168.0.0/26".parse().unwrap(),
            fabric_ptp: "172.16.0.0/22".parse().unwrap(),
            asn_range: "4200000000-4200000063".to_string(),
        },
    }
}

proptest! {
    #[test]
    fn prop_full_mesh(spines in 0usize..6, leaves in 0usize..12, slack in 0u32..3) {
        let fabric = FabricBuilder::from_config(&sized_config(spines, leaves, slack))
            .unwrap()
            .build()
            .unwrap();

        prop_assert_eq!(fabric.devices().count(), spines + leaves);
        let names: HashSet<&str> = fabric.devices().map(|d| d.name()).collect();
        prop_assert_eq!(names.len(), spines + leaves);

        prop_assert_eq!(fabric.links().len(), spines * leaves);
        let pairs: HashSet<(&str, &str)> = fabric
            .links()
            .iter()
            .map(|l| (l.spine.device.as_str(), l.leaf.device.as_str()))
            .collect();
        prop_assert_eq!(pairs.len(), spines * leaves);
    }

    #[test]
    fn prop_subnets_disjoint_and_endpoints_inside(spines in 1usize..6, leaves in 1usize..12) {
        let fabric = FabricBuilder::from_config(&sized_config(spines, leaves, 0))
            .unwrap()
            .build()
            .unwrap();

        let mut subnets: Vec<Ipv4Net> = fabric.links().iter().map(|l| l.subnet).collect();
        for link in fabric.links() {
            prop_assert!(link.subnet.contains(&link.spine.address));
            prop_assert!(link.subnet.contains(&link.leaf.address));
            prop_assert!(link.spine.address < link.leaf.address);
        }
        subnets.sort();
        for pair in subnets.windows(2) {
            prop_assert!(pair[0].broadcast() < pair[1].network());
        }
    }

    #[test]
    fn prop_device_tables_match_links(spines in 1usize..6, leaves in 1usize..12, slack in 0u32..3) {
        let fabric = FabricBuilder::from_config(&sized_config(spines, leaves, slack))
            .unwrap()
            .build()
            .unwrap();

        for device in fabric.devices() {
            let touching = fabric.links_for(device.name()).count();
            prop_assert_eq!(device.interface_addresses().len(), touching);
            prop_assert_eq!(device.bgp_neighbors().len(), touching);
            prop_assert_eq!(device.interfaces_consumed(), touching);
            for iface in device.interface_addresses().keys() {
                prop_assert!(!device.available_interfaces().contains(iface));
            }
        }
    }

    #[test]
    fn prop_asns_distinct_in_creation_order(spines in 0usize..6, leaves in 0usize..12) {
        let fabric = FabricBuilder::from_config(&sized_config(spines, leaves, 0))
            .unwrap()
            .build()
            .unwrap();

        let asns: Vec<u32> = fabric.devices().map(|d| d.asn()).collect();
        let expected: Vec<u32> = (4_200_000_000u32..).take(spines + leaves).collect();
        prop_assert_eq!(asns, expected);
    }

    #[test]
    fn prop_builds_are_deterministic(spines in 0usize..6, leaves in 0usize..12) {
        let cfg = sized_config(spines, leaves, 1);
        let first = FabricBuilder::from_config(&cfg).unwrap().build().unwrap();
        let second = FabricBuilder::from_config(&cfg).unwrap().build().unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
