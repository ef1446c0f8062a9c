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

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunes how saves are loaded back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Fail the load when the save was written by a different build, instead
    /// of warning and loading it anyway.
    pub reject_version_mismatch: bool,
    /// After a load, give a default record to every live host that has none.
    pub create_missing_extensions: bool,
    /// After a load, drop records whose host is not alive.
    pub prune_orphaned_extensions: bool,
    /// Log a warning for each reference cleared while relinking.
    pub log_unresolved_references: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            reject_version_mismatch: false,
            create_missing_extensions: true,
            prune_orphaned_extensions: true,
            log_unresolved_references: true,
        }
    }
}

impl PersistenceConfig {
    /// Load the configuration from a JSON string. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read persistence config {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("invalid persistence config {}", path.display()))
    }

    /// Save the configuration to a JSON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write persistence config {}", path.display()))?;
        Ok(())
    }
}
