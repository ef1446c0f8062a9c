// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::{ExtensionError, ExtensionRegistry, ReconcileReport};
use crate::records::{AircraftExtension, BuildingExtension, InfantryExtension, UnitExtension};
use std::collections::HashMap;
use vinifera_core::{CrcEngine, HostDirectory, HostHandle, HostId, HostKind, SaveHeader};

// --- HELPERS ---

fn handle(raw: u64, kind: HostKind) -> HostHandle {
    HostHandle::new(HostId::new(raw), kind)
}

/// A fixed set of live hosts.
#[derive(Default)]
struct FakeDirectory {
    live: HashMap<HostKind, Vec<HostId>>,
}

impl FakeDirectory {
    fn with(mut self, kind: HostKind, raws: &[u64]) -> Self {
        self.live
            .insert(kind, raws.iter().copied().map(HostId::new).collect());
        self
    }
}

impl HostDirectory for FakeDirectory {
    fn live_hosts(&self, kind: HostKind) -> Vec<HostId> {
        self.live.get(&kind).cloned().unwrap_or_default()
    }
}

// --- TESTS ---

#[test]
fn test_every_kind_routes_to_its_own_map() {
    let registry = ExtensionRegistry::new();

    for kind in HostKind::ALL {
        match registry.map_for(kind) {
            Some(map) => {
                assert!(kind.is_extended(), "{kind} should not have a map");
                assert_eq!(map.kind(), kind);
            }
            None => assert!(!kind.is_extended(), "{kind} is missing its map"),
        }
    }
}

#[test]
fn test_make_twice_returns_the_same_record() {
    // --- 1. SETUP ---
    let mut registry = ExtensionRegistry::new();
    let building = handle(0x100, HostKind::Building);

    // --- 2. ACTION ---
    registry
        .make::<BuildingExtension>(building)
        .unwrap()
        .produce_cash_amount = 25;
    let again = registry.make::<BuildingExtension>(building).unwrap();

    // --- 3. ASSERTIONS ---
    assert_eq!(again.produce_cash_amount, 25, "make must not reset the record");
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_destroy_mirrors_the_host_lifecycle() {
    // --- 1. SETUP ---
    let mut registry = ExtensionRegistry::new();
    let unit = handle(0x200, HostKind::Unit);
    registry.make::<UnitExtension>(unit).unwrap();

    // --- 2. ACTION ---
    let first = registry.destroy(unit);
    let second = registry.destroy(unit);

    // --- 3. ASSERTIONS ---
    assert_eq!(first, Ok(true));
    assert_eq!(second, Ok(false), "destroying twice is a no-op");
    assert!(registry.map::<UnitExtension>().find(unit.id).is_none());
    assert!(registry.get::<UnitExtension>(unit).is_none());
}

#[test]
fn test_unsupported_kinds_are_benign() {
    let mut registry = ExtensionRegistry::new();
    let bullet = handle(0x300, HostKind::Bullet);

    assert_eq!(
        registry.make::<UnitExtension>(bullet).unwrap_err(),
        ExtensionError::UnsupportedHostType(HostKind::Bullet)
    );
    assert_eq!(
        registry.destroy(bullet),
        Err(ExtensionError::UnsupportedHostType(HostKind::Bullet))
    );
    assert!(registry.is_empty());
}

#[test]
fn test_kind_mismatch_is_rejected() {
    let mut registry = ExtensionRegistry::new();
    let infantry = handle(0x400, HostKind::Infantry);

    let err = registry.make::<UnitExtension>(infantry).unwrap_err();

    assert_eq!(
        err,
        ExtensionError::KindMismatch {
            expected: HostKind::Unit,
            found: HostKind::Infantry,
        }
    );
    assert!(registry.get::<UnitExtension>(infantry).is_none());
}

#[test]
fn test_fetch_missing_record() {
    let mut registry = ExtensionRegistry::new();
    let aircraft = handle(0x500, HostKind::Aircraft);

    let err = registry.fetch::<AircraftExtension>(aircraft).unwrap_err();
    assert_eq!(
        err,
        ExtensionError::ExtensionNotFound {
            kind: HostKind::Aircraft,
            host: aircraft.id,
        }
    );

    registry.make::<AircraftExtension>(aircraft).unwrap();
    registry.fetch::<AircraftExtension>(aircraft).unwrap().is_spawned = true;
    assert!(registry.get::<AircraftExtension>(aircraft).unwrap().is_spawned);
}

#[test]
fn test_detach_all_reaches_every_map_and_singleton() {
    // --- 1. SETUP ---
    let mut registry = ExtensionRegistry::new();
    let doomed = HostId::new(0x900);
    registry
        .make::<InfantryExtension>(handle(1, HostKind::Infantry))
        .unwrap()
        .garrisoned_in = Some(doomed);
    registry
        .make::<AircraftExtension>(handle(2, HostKind::Aircraft))
        .unwrap()
        .kamikaze_target = Some(doomed);
    registry.globals_mut().tactical.focused_object = Some(doomed);

    // --- 2. ACTION ---
    registry.detach_all(doomed, true);

    // --- 3. ASSERTIONS ---
    let infantry = registry.get::<InfantryExtension>(handle(1, HostKind::Infantry));
    let aircraft = registry.get::<AircraftExtension>(handle(2, HostKind::Aircraft));
    assert_eq!(infantry.unwrap().garrisoned_in, None);
    assert_eq!(aircraft.unwrap().kamikaze_target, None);
    assert_eq!(registry.globals().tactical.focused_object, None);
}

#[test]
fn test_clear_empties_maps_and_resets_singletons() {
    let mut registry = ExtensionRegistry::new();
    for raw in 0..5 {
        registry
            .make::<BuildingExtension>(handle(raw, HostKind::Building))
            .unwrap();
    }
    registry.globals_mut().session.is_fog_of_war = true;

    registry.clear();

    assert!(registry.is_empty());
    assert!(!registry.globals().session.is_fog_of_war);
}

#[test]
fn test_record_counts_follow_persisted_order() {
    let mut registry = ExtensionRegistry::new();
    registry.make::<UnitExtension>(handle(1, HostKind::Unit)).unwrap();
    registry.make::<UnitExtension>(handle(2, HostKind::Unit)).unwrap();
    registry
        .make::<BuildingExtension>(handle(3, HostKind::Building))
        .unwrap();

    let counts = registry.record_counts();

    assert_eq!(counts.len(), HostKind::PERSISTED_ORDER.len());
    assert_eq!(counts[0], (HostKind::Unit, 2));
    assert!(counts.contains(&(HostKind::Building, 1)));
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_crc_is_deterministic_and_tracks_changes() {
    let build = |cash: i32| {
        let mut registry = ExtensionRegistry::new();
        registry
            .make::<BuildingExtension>(handle(1, HostKind::Building))
            .unwrap()
            .produce_cash_amount = cash;
        let mut crc = CrcEngine::new();
        registry.compute_crc(&mut crc);
        crc.value()
    };

    assert_eq!(build(10), build(10));
    assert_ne!(build(10), build(11));
}

#[test]
fn test_reconcile_creates_missing_and_prunes_dead_records() {
    // --- 1. SETUP ---
    let mut registry = ExtensionRegistry::new();
    registry.make::<UnitExtension>(handle(1, HostKind::Unit)).unwrap();
    registry.make::<UnitExtension>(handle(2, HostKind::Unit)).unwrap();
    let directory = FakeDirectory::default()
        .with(HostKind::Unit, &[2, 3])
        .with(HostKind::Building, &[10]);

    // --- 2. ACTION ---
    let report = registry.reconcile(&directory, true, true).unwrap();

    // --- 3. ASSERTIONS ---
    assert_eq!(
        report,
        ReconcileReport {
            created: 2,
            pruned: 1,
        }
    );
    let units: Vec<u64> = registry
        .map::<UnitExtension>()
        .hosts()
        .map(HostId::raw)
        .collect();
    assert_eq!(units, vec![2, 3]);
    assert!(registry
        .get::<BuildingExtension>(handle(10, HostKind::Building))
        .is_some());
}

#[test]
fn test_reconcile_can_be_limited() {
    let mut registry = ExtensionRegistry::new();
    registry.make::<UnitExtension>(handle(1, HostKind::Unit)).unwrap();
    let directory = FakeDirectory::default().with(HostKind::Unit, &[5]);

    let report = registry.reconcile(&directory, false, false).unwrap();

    assert_eq!(report, ReconcileReport::default());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_layout_size_covers_every_record() {
    assert!(ExtensionRegistry::layout_size() > SaveHeader::SIZE);
}

#[test]
fn test_debug_dump_names_every_kind() {
    let mut registry = ExtensionRegistry::new();
    registry
        .make::<BuildingExtension>(handle(0x42, HostKind::Building))
        .unwrap()
        .produce_cash_amount = 7;

    let dump = registry.debug_dump().unwrap();

    for kind in HostKind::PERSISTED_ORDER {
        assert!(dump.contains(kind.name()), "dump is missing {kind}");
    }
    assert!(dump.contains("produce_cash_amount"));
    assert!(dump.contains("Globals"));
}
