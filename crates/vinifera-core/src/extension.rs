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

//! Contracts every extension record fulfils.

use crate::{
    checksum::CrcEngine,
    host::{class_id, HostId, HostKind},
    swizzle::Relink,
};
use bincode::{Decode, Encode};
use serde::Serialize;
use std::fmt;

/// An out-of-line record attached to exactly one host object.
///
/// The host's memory layout is fixed, so its extra state lives here instead
/// and is found through the host's identity. Records are only ever built by
/// their map (see `ExtensionMap` in `vinifera-data`), which calls
/// [`Extension::new`] with the host they belong to.
///
/// Persistence is field by field through the `bincode` derives. A record must
/// not rely on its in-memory layout being written out.
pub trait Extension: Encode + Decode<()> + Relink + Serialize + fmt::Debug + Send + 'static {
    /// The host kind this record attaches to.
    const KIND: HostKind;

    /// Builds a default record for `host`.
    fn new(host: HostId) -> Self;

    /// The host this record belongs to.
    fn host(&self) -> HostId;

    /// Moves the record to another host identity. Only used while relinking a
    /// loaded save, where the host came back at a new identity.
    fn rebind(&mut self, host: HostId);

    /// Size of the record, summed into the build fingerprint.
    fn size_of() -> usize {
        std::mem::size_of::<Self>()
    }

    /// Feeds the record's state into a checksum.
    fn compute_crc(&self, crc: &mut CrcEngine);

    /// Called when `target` is being removed from the game.
    ///
    /// The record must drop every reference it holds to `target`. `all` is
    /// set when the target is leaving the game entirely rather than, for
    /// example, just going out of sight.
    fn detach(&mut self, _target: HostId, _all: bool) {}
}

/// The singleton records, in the order they are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GlobalKind {
    /// Extension of the rules database.
    Rules,
    /// Extension of the running scenario.
    Scenario,
    /// Extension of the session (game mode, multiplayer options).
    Session,
    /// Extension of the sidebar.
    Sidebar,
    /// Extension of the tactical view.
    Tactical,
}

impl GlobalKind {
    /// Order in which singleton records follow the per-kind blocks.
    pub const PERSISTED_ORDER: [GlobalKind; 5] = [
        GlobalKind::Rules,
        GlobalKind::Scenario,
        GlobalKind::Session,
        GlobalKind::Sidebar,
        GlobalKind::Tactical,
    ];

    /// Class id written before the record.
    pub const fn class_id(self) -> u32 {
        match self {
            GlobalKind::Rules => class_id(b"RULE"),
            GlobalKind::Scenario => class_id(b"SCEN"),
            GlobalKind::Session => class_id(b"SESS"),
            GlobalKind::Sidebar => class_id(b"SBAR"),
            GlobalKind::Tactical => class_id(b"TACT"),
        }
    }

    /// The name of the host singleton.
    pub const fn name(self) -> &'static str {
        match self {
            GlobalKind::Rules => "RulesClass",
            GlobalKind::Scenario => "ScenarioClass",
            GlobalKind::Session => "SessionClass",
            GlobalKind::Sidebar => "SidebarClass",
            GlobalKind::Tactical => "TacticalClass",
        }
    }
}

impl fmt::Display for GlobalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record attached to one of the game's singletons.
///
/// There is exactly one instance of each, so these records have no host
/// identity and are persisted without a count prefix.
pub trait GlobalExtension:
    Encode + Decode<()> + Relink + Serialize + Default + fmt::Debug + Send + 'static
{
    /// Which singleton this record extends.
    const KIND: GlobalKind;

    /// Size of the record, summed into the build fingerprint.
    fn size_of() -> usize {
        std::mem::size_of::<Self>()
    }

    /// Feeds the record's state into a checksum.
    fn compute_crc(&self, crc: &mut CrcEngine);

    /// Called when `target` is being removed from the game.
    fn detach(&mut self, _target: HostId, _all: bool) {}
}
