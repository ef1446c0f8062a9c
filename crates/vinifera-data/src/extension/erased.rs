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

use super::{BlockError, ExtensionError, ExtensionMap};
use std::{
    fmt,
    io::{Read, Write},
};
use vinifera_core::{stream, CrcEngine, Extension, HostId, HostKind, Relinker, StreamError};

/// The kind-agnostic view of an [`ExtensionMap`].
///
/// The registry routes everything that only knows a [`HostKind`] (destroy,
/// detach broadcasts, persistence, reconciliation) through this trait.
pub trait ErasedExtensionMap: fmt::Debug {
    /// The host kind of the map.
    fn kind(&self) -> HostKind;

    /// Number of live records.
    fn len(&self) -> usize;

    /// Returns `true` if the map holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `host` has a record.
    fn contains(&self, host: HostId) -> bool;

    /// The hosts that have a record, in insertion order.
    fn hosts(&self) -> Vec<HostId>;

    /// Makes sure `host` has a record. Returns `true` if one was created.
    fn ensure(&mut self, host: HostId) -> Result<bool, ExtensionError>;

    /// Erases the record of `host`. Returns `false` if there was none.
    fn remove(&mut self, host: HostId) -> bool;

    /// Drops every record.
    fn clear(&mut self);

    /// Tells every record that `target` is leaving the game.
    fn detach_all(&mut self, target: HostId, all: bool);

    /// Feeds every record into `crc`.
    fn compute_crc(&self, crc: &mut CrcEngine);

    /// Writes the count prefix followed by every record.
    fn save(&self, writer: &mut dyn Write) -> Result<(), StreamError>;

    /// Reads one block into the map. Returns the number of records read.
    fn load(&mut self, reader: &mut dyn Read) -> Result<usize, BlockError>;

    /// Resolves every record's host and references against the live game.
    ///
    /// Records whose host did not come back are dropped. Returns how many.
    fn relink(&mut self, relinker: &mut Relinker<'_>) -> usize;

    /// Renders every record as RON, in insertion order.
    fn debug_dump(&self) -> Result<String, ron::Error>;
}

impl<E: Extension> ErasedExtensionMap for ExtensionMap<E> {
    fn kind(&self) -> HostKind {
        E::KIND
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn contains(&self, host: HostId) -> bool {
        self.records.contains_key(&host)
    }

    fn hosts(&self) -> Vec<HostId> {
        self.records.keys().copied().collect()
    }

    fn ensure(&mut self, host: HostId) -> Result<bool, ExtensionError> {
        if self.records.contains_key(&host) {
            return Ok(false);
        }
        self.create(host)?;
        Ok(true)
    }

    fn remove(&mut self, host: HostId) -> bool {
        ExtensionMap::remove(self, host)
    }

    fn clear(&mut self) {
        ExtensionMap::clear(self);
    }

    fn detach_all(&mut self, target: HostId, all: bool) {
        ExtensionMap::detach_all(self, target, all);
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        ExtensionMap::compute_crc(self, crc);
    }

    fn save(&self, writer: &mut dyn Write) -> Result<(), StreamError> {
        stream::write_count(writer, self.records.len())?;
        for record in self.records.values() {
            stream::write_record(writer, Self::CLASS_ID, record, E::KIND.name())?;
        }
        log::debug!("Saved {} {} extensions.", self.records.len(), E::KIND);
        Ok(())
    }

    fn load(&mut self, reader: &mut dyn Read) -> Result<usize, BlockError> {
        let count = stream::read_count(reader)?;
        for _ in 0..count {
            let record: E = stream::read_record(reader, Self::CLASS_ID, E::KIND.name())?;
            let host = record.host();
            if self.records.contains_key(&host) {
                return Err(BlockError::DuplicateRecord {
                    kind: E::KIND,
                    host,
                });
            }
            self.records.insert(host, record);
        }
        log::debug!("Loaded {count} {} extensions.", E::KIND);
        Ok(count)
    }

    fn relink(&mut self, relinker: &mut Relinker<'_>) -> usize {
        let saved = std::mem::take(&mut self.records);
        self.records.reserve(saved.len());

        let mut orphans = 0;
        for (old, mut record) in saved {
            let Some(live) = relinker.resolve(old) else {
                log::warn!("{} extension of saved host {old} has no live host, dropped.", E::KIND);
                orphans += 1;
                continue;
            };
            if self.records.contains_key(&live) {
                log::warn!(
                    "Saved host {old} resolved to {live}, which already has a {} extension; dropped.",
                    E::KIND
                );
                orphans += 1;
                continue;
            }
            record.rebind(live);
            record.relink(relinker);
            self.records.insert(live, record);
        }
        orphans
    }

    fn debug_dump(&self) -> Result<String, ron::Error> {
        let records: Vec<&E> = self.records.values().collect();
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(&records, pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{InfantryExtension, WarheadExtension};
    use std::io::Cursor;
    use vinifera_core::{RemapTable, SwizzleManager};

    fn host(raw: u64) -> HostId {
        HostId::new(raw)
    }

    #[test]
    fn test_empty_block_is_four_zero_bytes() {
        let map = ExtensionMap::<WarheadExtension>::new();
        let mut bytes = Vec::new();
        ErasedExtensionMap::save(&map, &mut bytes).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0]);

        let mut loaded = ExtensionMap::<WarheadExtension>::new();
        let count = ErasedExtensionMap::load(&mut loaded, &mut Cursor::new(bytes)).unwrap();
        assert_eq!(count, 0);
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_block_round_trip() {
        let mut map = ExtensionMap::<WarheadExtension>::new();
        map.create(host(1)).unwrap().wall_absorption = 0.25;
        map.create(host(2)).unwrap().is_volumetric = true;

        let mut bytes = Vec::new();
        ErasedExtensionMap::save(&map, &mut bytes).unwrap();

        let mut loaded = ExtensionMap::<WarheadExtension>::new();
        let count = ErasedExtensionMap::load(&mut loaded, &mut Cursor::new(bytes)).unwrap();
        assert_eq!(count, 2);
        assert_eq!(loaded.find(host(1)), map.find(host(1)));
        assert_eq!(loaded.find(host(2)), map.find(host(2)));
    }

    #[test]
    fn test_duplicate_host_in_block_is_rejected() {
        let record = WarheadExtension::new(host(3));
        let mut bytes = Vec::new();
        stream::write_count(&mut bytes, 2).unwrap();
        for _ in 0..2 {
            stream::write_record(
                &mut bytes,
                ExtensionMap::<WarheadExtension>::CLASS_ID,
                &record,
                "WarheadTypeClass",
            )
            .unwrap();
        }

        let mut loaded = ExtensionMap::<WarheadExtension>::new();
        let err = ErasedExtensionMap::load(&mut loaded, &mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            BlockError::DuplicateRecord {
                kind: HostKind::Warhead,
                ..
            }
        ));
    }

    #[test]
    fn test_relink_moves_records_and_drops_orphans() {
        let mut map = ExtensionMap::<InfantryExtension>::new();
        map.create(host(1)).unwrap().garrisoned_in = Some(host(90));
        map.create(host(2)).unwrap().garrisoned_in = Some(host(91));
        map.create(host(3)).unwrap();

        let mut swizzle = SwizzleManager::new();
        swizzle.here_i_am(host(1), host(101), "InfantryClass").unwrap();
        swizzle.here_i_am(host(2), host(102), "InfantryClass").unwrap();
        swizzle.here_i_am(host(90), host(190), "BuildingClass").unwrap();
        let table = swizzle.finish();
        let mut relinker = Relinker::new(&table).with_logging(false);

        let orphans = ErasedExtensionMap::relink(&mut map, &mut relinker);

        assert_eq!(orphans, 1);
        assert_eq!(map.len(), 2);
        let first = map.find(host(101)).unwrap();
        assert_eq!(first.host, host(101));
        assert_eq!(first.garrisoned_in, Some(host(190)));
        assert_eq!(map.find(host(102)).unwrap().garrisoned_in, None);
        assert_eq!(relinker.unresolved(), 1);
    }

    #[test]
    fn test_relink_drops_records_colliding_on_one_live_host() {
        let mut map = ExtensionMap::<InfantryExtension>::new();
        map.create(host(1)).unwrap();
        map.create(host(2)).unwrap();

        let mut swizzle = SwizzleManager::new();
        swizzle.here_i_am(host(1), host(100), "InfantryClass").unwrap();
        swizzle.here_i_am(host(2), host(100), "InfantryClass").unwrap();
        let table: RemapTable = swizzle.finish();
        let mut relinker = Relinker::new(&table).with_logging(false);

        assert_eq!(ErasedExtensionMap::relink(&mut map, &mut relinker), 1);
        assert_eq!(map.hosts().collect::<Vec<_>>(), vec![host(100)]);
    }

    #[test]
    fn test_ensure_reports_creation() {
        let mut map = ExtensionMap::<InfantryExtension>::new();
        assert!(map.ensure(host(5)).unwrap());
        assert!(!map.ensure(host(5)).unwrap());
        assert_eq!(ExtensionMap::len(&map), 1);
    }

    #[test]
    fn test_debug_dump_lists_records() {
        let mut map = ExtensionMap::<InfantryExtension>::new();
        map.create(host(7)).unwrap().garrisoned_in = Some(host(8));
        let dump = map.debug_dump().unwrap();
        assert!(dump.contains("garrisoned_in"));
    }
}
