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

use super::{ErasedExtensionMap, ExtensionError, ExtensionMap, GlobalExtensions};
use crate::records::{
    AircraftExtension, AircraftTypeExtension, AnimExtension, BuildingExtension,
    BuildingTypeExtension, HouseExtension, InfantryExtension, InfantryTypeExtension,
    SideExtension, SuperExtension, TerrainExtension, UnitExtension, UnitTypeExtension,
    WarheadExtension, WaveExtension, WeaponTypeExtension,
};
use std::collections::HashSet;
use vinifera_core::{
    CrcEngine, Extension, HostDirectory, HostHandle, HostId, HostKind, Relinker, SaveHeader,
};

/// A record type that has a map in the [`ExtensionRegistry`].
pub trait Registered: Extension {
    /// The map holding every record of this type.
    fn map(registry: &ExtensionRegistry) -> &ExtensionMap<Self>;

    /// The map holding every record of this type, for mutation.
    fn map_mut(registry: &mut ExtensionRegistry) -> &mut ExtensionMap<Self>;
}

/// Outcome of [`ExtensionRegistry::reconcile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Records created for live hosts that had none.
    pub created: usize,
    /// Records dropped because their host is gone.
    pub pruned: usize,
}

// Generates the registry, one map per extended kind. Kinds listed as
// unsupported get no map. Every `HostKind` must appear in exactly one of the
// two lists or the routing match below stops compiling.
macro_rules! extension_registry {
    (
        extended { $($field:ident: $record:ty => $kind:ident),* $(,)? }
        unsupported { $($unsupported:ident),* $(,)? }
    ) => {
        /// Every extension record of the running game.
        ///
        /// The host program owns one registry and calls into it from its
        /// constructors and destructors through a [`HostHandle`]. The typed
        /// API (`make`, `fetch`, `get`) goes straight to the record's map.
        /// Kind-only operations (`destroy`, persistence, reconciliation) are
        /// routed by [`ExtensionRegistry::map_for`].
        #[derive(Debug, Default)]
        pub struct ExtensionRegistry {
            $($field: ExtensionMap<$record>,)*
            globals: GlobalExtensions,
        }

        $(
            impl Registered for $record {
                fn map(registry: &ExtensionRegistry) -> &ExtensionMap<Self> {
                    &registry.$field
                }

                fn map_mut(registry: &mut ExtensionRegistry) -> &mut ExtensionMap<Self> {
                    &mut registry.$field
                }
            }
        )*

        impl ExtensionRegistry {
            /// Routes a kind to its map. Returns `None` for kinds that are not
            /// extended.
            pub fn map_for(&self, kind: HostKind) -> Option<&dyn ErasedExtensionMap> {
                match kind {
                    $(HostKind::$kind => Some(&self.$field),)*
                    $(HostKind::$unsupported)|* => None,
                }
            }

            /// Mutable counterpart of [`ExtensionRegistry::map_for`].
            pub fn map_for_mut(&mut self, kind: HostKind) -> Option<&mut dyn ErasedExtensionMap> {
                match kind {
                    $(HostKind::$kind => Some(&mut self.$field),)*
                    $(HostKind::$unsupported)|* => None,
                }
            }

            /// Summed size of every record type plus the save header.
            ///
            /// This is the `layout` half of the build fingerprint.
            pub fn layout_size() -> usize {
                SaveHeader::SIZE
                    $(+ <$record as Extension>::size_of())*
                    + GlobalExtensions::layout_size()
            }
        }
    };
}

extension_registry! {
    extended {
        aircraft: AircraftExtension => Aircraft,
        aircraft_types: AircraftTypeExtension => AircraftType,
        anims: AnimExtension => Anim,
        buildings: BuildingExtension => Building,
        building_types: BuildingTypeExtension => BuildingType,
        houses: HouseExtension => House,
        infantry: InfantryExtension => Infantry,
        infantry_types: InfantryTypeExtension => InfantryType,
        sides: SideExtension => Side,
        supers: SuperExtension => Super,
        terrain: TerrainExtension => Terrain,
        units: UnitExtension => Unit,
        unit_types: UnitTypeExtension => UnitType,
        warheads: WarheadExtension => Warhead,
        waves: WaveExtension => Wave,
        weapon_types: WeaponTypeExtension => WeaponType,
    }
    unsupported { Bullet, Cell, Factory, Overlay, Smudge, Team, Trigger }
}

impl ExtensionRegistry {
    /// Creates a registry with empty maps and default singletons.
    pub fn new() -> Self {
        Self::default()
    }

    /// The map of record type `E`.
    pub fn map<E: Registered>(&self) -> &ExtensionMap<E> {
        E::map(self)
    }

    /// The map of record type `E`, for mutation.
    pub fn map_mut<E: Registered>(&mut self) -> &mut ExtensionMap<E> {
        E::map_mut(self)
    }

    /// The singleton records.
    pub fn globals(&self) -> &GlobalExtensions {
        &self.globals
    }

    /// The singleton records, for mutation.
    pub fn globals_mut(&mut self) -> &mut GlobalExtensions {
        &mut self.globals
    }

    /// The extended maps in persisted order.
    pub fn maps(&self) -> impl Iterator<Item = &dyn ErasedExtensionMap> + '_ {
        HostKind::PERSISTED_ORDER
            .into_iter()
            .filter_map(move |kind| self.map_for(kind))
    }

    /// Called from a host's constructor. Returns the host's record, creating
    /// it if needed.
    pub fn make<E: Registered>(&mut self, handle: HostHandle) -> Result<&mut E, ExtensionError> {
        Self::check_kind::<E>(handle)?;
        E::map_mut(self).find_or_create(handle.id)
    }

    /// Looks up the record of a live host.
    pub fn fetch<E: Registered>(&mut self, handle: HostHandle) -> Result<&mut E, ExtensionError> {
        Self::check_kind::<E>(handle)?;
        E::map_mut(self).find_mut(handle.id).ok_or_else(|| {
            log::error!("No {} extension found for {handle}.", E::KIND);
            ExtensionError::ExtensionNotFound {
                kind: E::KIND,
                host: handle.id,
            }
        })
    }

    /// Looks up the record of a host without logging a miss.
    pub fn get<E: Registered>(&self, handle: HostHandle) -> Option<&E> {
        if handle.kind != E::KIND {
            return None;
        }
        E::map(self).find(handle.id)
    }

    /// Called from a host's destructor. Erases its record.
    ///
    /// Destroying a host twice is harmless and the second call returns
    /// `Ok(false)`.
    pub fn destroy(&mut self, handle: HostHandle) -> Result<bool, ExtensionError> {
        let Some(map) = self.map_for_mut(handle.kind) else {
            log::debug!("{} has no extension to destroy.", handle.kind);
            return Err(ExtensionError::UnsupportedHostType(handle.kind));
        };
        Ok(map.remove(handle.id))
    }

    /// Tells every record that `target` is being removed from the game.
    pub fn detach_all(&mut self, target: HostId, all: bool) {
        for kind in HostKind::PERSISTED_ORDER {
            if let Some(map) = self.map_for_mut(kind) {
                map.detach_all(target, all);
            }
        }
        self.globals.detach_all(target, all);
    }

    /// Drops every record and resets the singletons.
    pub fn clear(&mut self) {
        for kind in HostKind::PERSISTED_ORDER {
            if let Some(map) = self.map_for_mut(kind) {
                map.clear();
            }
        }
        self.globals.reset();
        log::debug!("Extension registry cleared.");
    }

    /// Number of records across every map.
    pub fn len(&self) -> usize {
        self.maps().map(|map| map.len()).sum()
    }

    /// Returns `true` if no map holds a record.
    pub fn is_empty(&self) -> bool {
        self.maps().all(|map| map.is_empty())
    }

    /// Number of records per extended kind, in persisted order.
    pub fn record_counts(&self) -> Vec<(HostKind, usize)> {
        self.maps().map(|map| (map.kind(), map.len())).collect()
    }

    /// Feeds every record, then the singletons, into `crc`.
    pub fn compute_crc(&self, crc: &mut CrcEngine) {
        for map in self.maps() {
            map.compute_crc(crc);
        }
        self.globals.compute_crc(crc);
    }

    /// Rewrites every saved identity of a freshly loaded registry.
    ///
    /// Returns the number of records dropped because their host did not come
    /// back. Unresolved references inside records are counted by `relinker`.
    pub fn relink(&mut self, relinker: &mut Relinker<'_>) -> usize {
        let mut orphans = 0;
        for kind in HostKind::PERSISTED_ORDER {
            if let Some(map) = self.map_for_mut(kind) {
                orphans += map.relink(relinker);
            }
        }
        self.globals.relink(relinker);
        orphans
    }

    /// Brings the registry in line with the hosts that are actually alive.
    ///
    /// With `prune_orphans`, records whose host is no longer live are
    /// dropped. With `create_missing`, every live host without a record gets
    /// a default one.
    pub fn reconcile(
        &mut self,
        directory: &dyn HostDirectory,
        create_missing: bool,
        prune_orphans: bool,
    ) -> Result<ReconcileReport, ExtensionError> {
        let mut report = ReconcileReport::default();
        for kind in HostKind::PERSISTED_ORDER {
            let Some(map) = self.map_for_mut(kind) else {
                continue;
            };
            let live = directory.live_hosts(kind);

            if prune_orphans {
                let alive: HashSet<HostId> = live.iter().copied().collect();
                for host in map.hosts() {
                    if !alive.contains(&host) {
                        log::debug!("Pruning {kind} extension of dead host {host}.");
                        map.remove(host);
                        report.pruned += 1;
                    }
                }
            }

            if create_missing {
                for host in live {
                    if map.ensure(host)? {
                        log::debug!("Created missing {kind} extension for {host}.");
                        report.created += 1;
                    }
                }
            }
        }
        Ok(report)
    }

    /// Renders every record and singleton as RON, for diagnostics.
    pub fn debug_dump(&self) -> Result<String, ron::Error> {
        let mut out = String::new();
        for map in self.maps() {
            out.push_str(&format!("{}: {}\n", map.kind(), map.debug_dump()?));
        }
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        out.push_str(&format!(
            "Globals: {}\n",
            ron::ser::to_string_pretty(&self.globals, pretty)?
        ));
        Ok(out)
    }

    fn check_kind<E: Registered>(handle: HostHandle) -> Result<(), ExtensionError> {
        if !handle.kind.is_extended() {
            log::debug!("{} is not an extended host type.", handle.kind);
            return Err(ExtensionError::UnsupportedHostType(handle.kind));
        }
        if handle.kind != E::KIND {
            return Err(ExtensionError::KindMismatch {
                expected: E::KIND,
                found: handle.kind,
            });
        }
        Ok(())
    }
}
