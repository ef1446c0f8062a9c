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

use super::ExtensionError;
use ahash::RandomState;
use indexmap::IndexMap;
use std::fmt;
use vinifera_core::{CrcEngine, Extension, HostId, HostKind};

/// The records of every live host of one kind.
///
/// The map is the only place records are created and destroyed, so it holds
/// at most one record per host at any time. Iteration follows insertion
/// order, which keeps checksums and debug dumps deterministic between runs.
pub struct ExtensionMap<E: Extension> {
    pub(crate) records: IndexMap<HostId, E, RandomState>,
}

impl<E: Extension> ExtensionMap<E> {
    pub(crate) const CLASS_ID: u32 = match E::KIND.class_id() {
        Some(id) => id,
        None => panic!("extension records must attach to an extended host kind"),
    };

    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            records: IndexMap::with_hasher(RandomState::new()),
        }
    }

    /// The host kind of this map.
    pub fn kind(&self) -> HostKind {
        E::KIND
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the map holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` if `host` has a record.
    pub fn contains(&self, host: HostId) -> bool {
        self.records.contains_key(&host)
    }

    /// Looks up the record of `host`.
    pub fn find(&self, host: HostId) -> Option<&E> {
        self.records.get(&host)
    }

    /// Looks up the record of `host` for mutation.
    pub fn find_mut(&mut self, host: HostId) -> Option<&mut E> {
        self.records.get_mut(&host)
    }

    /// Creates the record of a freshly constructed host.
    ///
    /// Fails with [`ExtensionError::AlreadyExists`] if the host already has
    /// one.
    pub fn create(&mut self, host: HostId) -> Result<&mut E, ExtensionError> {
        if self.records.contains_key(&host) {
            return Err(ExtensionError::AlreadyExists {
                kind: E::KIND,
                host,
            });
        }
        self.reserve_one(host)?;
        log::trace!("Creating {} extension for {host}.", E::KIND);
        Ok(self.records.entry(host).or_insert_with(|| E::new(host)))
    }

    /// Returns the record of `host`, creating it first if needed.
    pub fn find_or_create(&mut self, host: HostId) -> Result<&mut E, ExtensionError> {
        if !self.records.contains_key(&host) {
            self.reserve_one(host)?;
            log::trace!("Creating {} extension for {host} on first use.", E::KIND);
        }
        Ok(self.records.entry(host).or_insert_with(|| E::new(host)))
    }

    /// Inserts a record built elsewhere, keyed by its own host.
    pub(crate) fn add(&mut self, record: E) -> Result<&mut E, ExtensionError> {
        let host = record.host();
        if self.records.contains_key(&host) {
            return Err(ExtensionError::AlreadyExists {
                kind: E::KIND,
                host,
            });
        }
        self.reserve_one(host)?;
        Ok(self.records.entry(host).or_insert(record))
    }

    /// Erases the record of `host` and hands it back.
    pub fn take(&mut self, host: HostId) -> Option<E> {
        self.records.shift_remove(&host)
    }

    /// Erases and drops the record of `host`. Returns `false` if there was none.
    pub fn remove(&mut self, host: HostId) -> bool {
        let removed = self.take(host).is_some();
        if removed {
            log::trace!("Destroyed {} extension for {host}.", E::KIND);
        }
        removed
    }

    /// Drops every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Iterates over the records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.records.values()
    }

    /// Iterates mutably over the records in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.records.values_mut()
    }

    /// The hosts that currently have a record, in insertion order.
    pub fn hosts(&self) -> impl Iterator<Item = HostId> + '_ {
        self.records.keys().copied()
    }

    /// Tells every record that `target` is leaving the game.
    pub fn detach_all(&mut self, target: HostId, all: bool) {
        for record in self.records.values_mut() {
            record.detach(target, all);
        }
    }

    /// Feeds every record into `crc`, in insertion order.
    pub fn compute_crc(&self, crc: &mut CrcEngine) {
        for record in self.records.values() {
            record.compute_crc(crc);
        }
    }

    fn reserve_one(&mut self, host: HostId) -> Result<(), ExtensionError> {
        self.records.try_reserve(1).map_err(|_| {
            log::error!("Out of memory creating the {} extension for {host}.", E::KIND);
            ExtensionError::CreationFailed {
                kind: E::KIND,
                host,
            }
        })
    }
}

impl<E: Extension> Default for ExtensionMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Extension> fmt::Debug for ExtensionMap<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionMap")
            .field("kind", &E::KIND)
            .field("len", &self.records.len())
            .finish()
    }
}
