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

//! Writes the extension registry to a save stream and brings it back.
//!
//! Loading is split in two phases. [`PersistenceDriver::deserialize`] reads
//! every record into a scratch registry while the saved host identities are
//! still opaque. Once the host program has rebuilt all of its own objects
//! and sealed its [`RemapTable`], [`PendingLoad::relink`] resolves those
//! identities and hands back the finished registry. The live registry is
//! only replaced when both phases succeed.

use crate::config::PersistenceConfig;
use std::io::{Read, Write};
use vinifera_core::{
    BuildFingerprint, HeaderError, HostDirectory, HostId, HostKind, Relinker, RemapTable,
    SaveHeader, StreamError,
};
use vinifera_data::{BlockError, ExtensionError, ExtensionRegistry, GlobalExtensions};

/// Version of the persisted record fields. Bump it whenever a record gains,
/// loses or reorders a persisted field.
pub const SCHEMA_VERSION: u32 = 1;

/// The fingerprint this build writes into its saves.
pub fn build_fingerprint() -> BuildFingerprint {
    BuildFingerprint {
        schema_version: SCHEMA_VERSION,
        layout: ExtensionRegistry::layout_size() as u32,
    }
}

/// Errors raised while saving or loading the extension registry.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The stream does not start with a valid extension header.
    #[error("corrupt save file: {0}")]
    CorruptSaveFile(#[from] HeaderError),
    /// The save was written by another build and strict loading is enabled.
    #[error("save was written by build '{found}', this build is '{expected}'")]
    VersionMismatch {
        /// This build's fingerprint.
        expected: String,
        /// The fingerprint stored in the save.
        found: String,
    },
    /// Reading or writing a block failed.
    #[error(transparent)]
    Stream(#[from] StreamError),
    /// A block holds two records for the same host.
    #[error("duplicate {kind} extension for saved host {host}")]
    DuplicateRecord {
        /// Kind of the block.
        kind: HostKind,
        /// The saved host identity that appears twice.
        host: HostId,
    },
    /// Reconciling the loaded registry with the live hosts failed.
    #[error("failed to reconcile the loaded extensions: {0}")]
    Reconcile(#[from] ExtensionError),
}

impl From<BlockError> for PersistError {
    fn from(err: BlockError) -> Self {
        match err {
            BlockError::Stream(source) => PersistError::Stream(source),
            BlockError::DuplicateRecord { kind, host } => {
                PersistError::DuplicateRecord { kind, host }
            }
        }
    }
}

/// What a save wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    /// Fingerprint written into the header.
    pub fingerprint: BuildFingerprint,
    /// Number of per-host records written.
    pub records_written: usize,
}

/// What a load found and fixed up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Fingerprint of the build that wrote the save.
    pub saved_fingerprint: String,
    /// The save was written by a different build.
    pub version_mismatch: bool,
    /// Per-host records read from the stream.
    pub records_loaded: usize,
    /// References that pointed at hosts which did not come back.
    pub unresolved_references: usize,
    /// Records dropped because their own host did not come back.
    pub orphaned_records: usize,
    /// Records created for live hosts the save had no record for.
    pub created_records: usize,
    /// Records dropped because their host is not alive.
    pub pruned_records: usize,
}

/// Saves and loads an [`ExtensionRegistry`].
#[derive(Debug, Clone, Default)]
pub struct PersistenceDriver {
    config: PersistenceConfig,
}

impl PersistenceDriver {
    /// Creates a driver with the given configuration.
    pub fn new(config: PersistenceConfig) -> Self {
        Self { config }
    }

    /// The driver's configuration.
    pub fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    /// Writes the header, every map in persisted order, then the singletons.
    pub fn save(
        &self,
        registry: &ExtensionRegistry,
        writer: &mut dyn Write,
    ) -> Result<SaveReport, PersistError> {
        let fingerprint = build_fingerprint();
        writer
            .write_all(SaveHeader::new(&fingerprint).as_bytes())
            .map_err(StreamError::from)?;

        let mut records_written = 0;
        for map in registry.maps() {
            map.save(writer)?;
            records_written += map.len();
        }
        registry.globals().save(writer)?;
        writer.flush().map_err(StreamError::from)?;

        log::info!("Saved {records_written} extension records ({fingerprint}).");
        Ok(SaveReport {
            fingerprint,
            records_written,
        })
    }

    /// First load phase: reads every record into a scratch registry.
    ///
    /// Host identities inside the records are left exactly as saved. Nothing
    /// in the live game is touched.
    pub fn deserialize(&self, reader: &mut dyn Read) -> Result<PendingLoad, PersistError> {
        let header = read_header(reader)?;
        let expected = build_fingerprint();
        let saved_fingerprint = header.fingerprint_text();
        let version_mismatch = !header.matches(&expected);
        if version_mismatch {
            if self.config.reject_version_mismatch {
                log::error!(
                    "Refusing save from build '{saved_fingerprint}', this build is '{expected}'."
                );
                return Err(PersistError::VersionMismatch {
                    expected: expected.to_string(),
                    found: saved_fingerprint,
                });
            }
            log::warn!(
                "Save was written by build '{saved_fingerprint}', this build is '{expected}'. Loading anyway."
            );
        }

        let mut registry = ExtensionRegistry::new();
        let mut records_loaded = 0;
        for kind in HostKind::PERSISTED_ORDER {
            let Some(map) = registry.map_for_mut(kind) else {
                continue;
            };
            records_loaded += map.load(reader)?;
        }
        *registry.globals_mut() = GlobalExtensions::load(reader)?;

        log::debug!("Deserialized {records_loaded} extension records.");
        Ok(PendingLoad {
            registry,
            config: self.config.clone(),
            report: LoadReport {
                saved_fingerprint,
                version_mismatch,
                records_loaded,
                ..Default::default()
            },
        })
    }

    /// Runs both load phases and replaces `registry` with the result.
    ///
    /// On error `registry` is left exactly as it was.
    pub fn load(
        &self,
        reader: &mut dyn Read,
        registry: &mut ExtensionRegistry,
        table: &RemapTable,
        directory: Option<&dyn HostDirectory>,
    ) -> Result<LoadReport, PersistError> {
        let pending = self.deserialize(reader)?;
        let (loaded, report) = pending.relink(table, directory)?;
        *registry = loaded;
        log::info!(
            "Loaded {} extension records ({} unresolved references, {} orphans).",
            report.records_loaded,
            report.unresolved_references,
            report.orphaned_records
        );
        Ok(report)
    }
}

/// A registry that has been read from a save but not yet relinked.
#[derive(Debug)]
pub struct PendingLoad {
    registry: ExtensionRegistry,
    config: PersistenceConfig,
    report: LoadReport,
}

impl PendingLoad {
    /// The records as they were saved, keyed by their saved host identities.
    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// What the first phase read.
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Second load phase: resolves every saved identity against `table`.
    ///
    /// With a `directory`, the result is then reconciled with the live hosts
    /// as the configuration asks.
    pub fn relink(
        self,
        table: &RemapTable,
        directory: Option<&dyn HostDirectory>,
    ) -> Result<(ExtensionRegistry, LoadReport), PersistError> {
        let Self {
            mut registry,
            config,
            mut report,
        } = self;

        let mut relinker = Relinker::new(table).with_logging(config.log_unresolved_references);
        report.orphaned_records = registry.relink(&mut relinker);
        report.unresolved_references = relinker.unresolved();

        if let Some(directory) = directory {
            let reconciled = registry.reconcile(
                directory,
                config.create_missing_extensions,
                config.prune_orphaned_extensions,
            )?;
            report.created_records = reconciled.created;
            report.pruned_records = reconciled.pruned;
        }

        Ok((registry, report))
    }
}

fn read_header(reader: &mut dyn Read) -> Result<SaveHeader, PersistError> {
    let mut bytes = Vec::with_capacity(SaveHeader::SIZE);
    reader
        .take(SaveHeader::SIZE as u64)
        .read_to_end(&mut bytes)
        .map_err(StreamError::from)?;
    Ok(SaveHeader::from_bytes(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use vinifera_core::SAVE_MARKER;

    #[test]
    fn test_empty_registry_layout() {
        let driver = PersistenceDriver::default();
        let mut bytes = Vec::new();

        let report = driver.save(&ExtensionRegistry::new(), &mut bytes).unwrap();

        assert_eq!(report.records_written, 0);
        assert_eq!(&bytes[..SAVE_MARKER.len()], &SAVE_MARKER);
        let blocks = &bytes[SaveHeader::SIZE..SaveHeader::SIZE + 4 * 16];
        assert!(blocks.iter().all(|&b| b == 0), "every empty block is a zero count");
    }

    #[test]
    fn test_short_stream_is_corrupt() {
        let driver = PersistenceDriver::default();
        let err = driver
            .deserialize(&mut Cursor::new(b"VINIFERA".to_vec()))
            .unwrap_err();
        assert!(matches!(
            err,
            PersistError::CorruptSaveFile(HeaderError::Truncated { found: 8, .. })
        ));
    }

    #[test]
    fn test_fingerprint_tracks_schema_version() {
        let fingerprint = build_fingerprint();
        assert_eq!(fingerprint.schema_version, SCHEMA_VERSION);
        assert_eq!(fingerprint.layout as usize, ExtensionRegistry::layout_size());
    }
}
