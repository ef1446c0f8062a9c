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

//! Deferred pointer resolution ("swizzling") for loaded saves.
//!
//! A save stores host identities as they were when the game was saved. When
//! that save is loaded, the game rebuilds its objects at new identities. The
//! resolution therefore happens in two phases:
//!
//! 1. While the game deserializes its own objects, it reports every
//!    `old -> new` identity pair to a [`SwizzleManager`].
//! 2. Once every object of every type has been rebuilt, the manager is sealed
//!    into a [`RemapTable`] and each loaded record is walked with a
//!    [`Relinker`] that rewrites its stored identities in place.
//!
//! Phase 2 can only start from a sealed table, which keeps resolution from
//! being interleaved with loading.

use crate::host::HostId;
use std::collections::HashMap;

/// Errors raised while registering identities with the [`SwizzleManager`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwizzleError {
    /// The same saved identity was reported twice with two different targets.
    #[error("saved id {old} ({name}) is already mapped to {existing}, cannot remap it to {new}")]
    Conflict {
        /// The saved identity.
        old: HostId,
        /// The target it was first registered with.
        existing: HostId,
        /// The conflicting target.
        new: HostId,
        /// Debug name given at the first registration.
        name: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    live: HostId,
    name: &'static str,
}

/// Collects `saved id -> live id` pairs while the host program loads.
#[derive(Debug, Default)]
pub struct SwizzleManager {
    registrations: HashMap<HostId, Registration>,
}

impl SwizzleManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Announces that the object saved as `old` now lives at `live`.
    ///
    /// Registering the same pair twice is accepted. Registering `old` again
    /// with a different target is a [`SwizzleError::Conflict`].
    pub fn here_i_am(
        &mut self,
        old: HostId,
        live: HostId,
        name: &'static str,
    ) -> Result<(), SwizzleError> {
        match self.registrations.get(&old) {
            Some(existing) if existing.live != live => Err(SwizzleError::Conflict {
                old,
                existing: existing.live,
                new: live,
                name: existing.name,
            }),
            Some(_) => Ok(()),
            None => {
                log::trace!("Swizzle: {name} {old} -> {live}");
                self.registrations.insert(old, Registration { live, name });
                Ok(())
            }
        }
    }

    /// Number of registered identities.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Seals the registrations. No further identity can be added after this.
    pub fn finish(self) -> RemapTable {
        log::debug!(
            "Swizzle table sealed with {} registered identities.",
            self.registrations.len()
        );
        RemapTable {
            map: self
                .registrations
                .into_iter()
                .map(|(old, reg)| (old, reg.live))
                .collect(),
        }
    }
}

/// An immutable `saved id -> live id` table.
#[derive(Debug, Clone, Default)]
pub struct RemapTable {
    map: HashMap<HostId, HostId>,
}

impl RemapTable {
    /// A table that maps every given id to itself.
    ///
    /// Used when the host objects kept their identities, for example when
    /// extension state is restored in place without reloading the game.
    pub fn identity(hosts: impl IntoIterator<Item = HostId>) -> Self {
        Self {
            map: hosts.into_iter().map(|id| (id, id)).collect(),
        }
    }

    /// Returns the live identity of a saved one, if it was registered.
    pub fn resolve(&self, old: HostId) -> Option<HostId> {
        self.map.get(&old).copied()
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Rewrites saved identities in place against a [`RemapTable`].
///
/// An identity with no entry in the table is an unresolved reference. This
/// is normal: saves routinely point at transient objects that were never
/// written. The slot is cleared and the miss is counted.
#[derive(Debug)]
pub struct Relinker<'a> {
    table: &'a RemapTable,
    unresolved: usize,
    log_unresolved: bool,
}

impl<'a> Relinker<'a> {
    /// Creates a relinker over a sealed table.
    pub fn new(table: &'a RemapTable) -> Self {
        Self {
            table,
            unresolved: 0,
            log_unresolved: true,
        }
    }

    /// Enables or disables the warning logged for each unresolved reference.
    pub fn with_logging(mut self, log_unresolved: bool) -> Self {
        self.log_unresolved = log_unresolved;
        self
    }

    /// Resolves a single identity without touching the unresolved count.
    pub fn resolve(&self, old: HostId) -> Option<HostId> {
        self.table.resolve(old)
    }

    /// Rewrites an optional reference. An unresolved one becomes `None`.
    pub fn remap(&mut self, slot: &mut Option<HostId>, name: &str) {
        let Some(old) = *slot else {
            return;
        };
        *slot = self.table.resolve(old);
        if slot.is_none() {
            self.miss(old, name);
        }
    }

    /// Rewrites a list of references, dropping the unresolved ones.
    pub fn remap_all(&mut self, slots: &mut Vec<HostId>, name: &str) {
        let mut misses = Vec::new();
        slots.retain_mut(|id| match self.table.resolve(*id) {
            Some(live) => {
                *id = live;
                true
            }
            None => {
                misses.push(*id);
                false
            }
        });
        for old in misses {
            self.miss(old, name);
        }
    }

    /// Number of references cleared so far.
    pub fn unresolved(&self) -> usize {
        self.unresolved
    }

    fn miss(&mut self, old: HostId, name: &str) {
        self.unresolved += 1;
        if self.log_unresolved {
            log::warn!("Unresolved reference '{name}' to {old}, cleared.");
        }
    }
}

/// Implemented by every persisted record that stores host identities.
///
/// Records without references keep the default, which does nothing.
pub trait Relink {
    /// Rewrites every stored identity through `relinker`.
    fn relink(&mut self, _relinker: &mut Relinker<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> HostId {
        HostId::new(raw)
    }

    #[test]
    fn test_registration_and_resolution() {
        let mut swizzle = SwizzleManager::new();
        swizzle.here_i_am(id(1), id(100), "BuildingClass").unwrap();
        swizzle.here_i_am(id(2), id(200), "UnitClass").unwrap();
        // Repeating an identical registration is harmless.
        swizzle.here_i_am(id(1), id(100), "BuildingClass").unwrap();
        assert_eq!(swizzle.len(), 2);

        let table = swizzle.finish();
        assert_eq!(table.resolve(id(1)), Some(id(100)));
        assert_eq!(table.resolve(id(2)), Some(id(200)));
        assert_eq!(table.resolve(id(3)), None);
    }

    #[test]
    fn test_conflicting_registration_is_rejected() {
        let mut swizzle = SwizzleManager::new();
        swizzle.here_i_am(id(1), id(100), "BuildingClass").unwrap();
        let err = swizzle.here_i_am(id(1), id(101), "BuildingClass").unwrap_err();
        assert_eq!(
            err,
            SwizzleError::Conflict {
                old: id(1),
                existing: id(100),
                new: id(101),
                name: "BuildingClass",
            }
        );
    }

    #[test]
    fn test_relinker_clears_unresolved_references() {
        let table = RemapTable::identity([id(5)]);
        let mut relinker = Relinker::new(&table).with_logging(false);

        let mut kept = Some(id(5));
        let mut lost = Some(id(6));
        let mut empty = None;
        relinker.remap(&mut kept, "kept");
        relinker.remap(&mut lost, "lost");
        relinker.remap(&mut empty, "empty");

        assert_eq!(kept, Some(id(5)));
        assert_eq!(lost, None);
        assert_eq!(empty, None);
        assert_eq!(relinker.unresolved(), 1);
    }

    #[test]
    fn test_relinker_filters_lists() {
        let mut swizzle = SwizzleManager::new();
        swizzle.here_i_am(id(1), id(10), "AircraftClass").unwrap();
        swizzle.here_i_am(id(3), id(30), "AircraftClass").unwrap();
        let table = swizzle.finish();

        let mut relinker = Relinker::new(&table).with_logging(false);
        let mut spawns = vec![id(1), id(2), id(3)];
        relinker.remap_all(&mut spawns, "spawns");

        assert_eq!(spawns, vec![id(10), id(30)]);
        assert_eq!(relinker.unresolved(), 1);
    }
}
