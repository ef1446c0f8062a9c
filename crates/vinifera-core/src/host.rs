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

//! Identity and runtime type tags of host objects.
//!
//! A host object is an instance of one of the game's own classes. Its memory
//! layout is fixed by the shipped executable, so this crate never looks inside
//! it: a host is only ever known by its [`HostId`] and its [`HostKind`].

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of a live host object.
///
/// In the running game this is the object's address. The registry only
/// compares and hashes it, it never dereferences it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Encode,
    Decode,
)]
pub struct HostId(u64);

impl HostId {
    /// Wraps a raw host address or handle.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value this id wraps.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Packs a four character tag into the 32-bit class id written on the wire.
pub const fn class_id(tag: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*tag)
}

/// The closed set of host types the game exposes to the extension layer.
///
/// Only some kinds carry extension records (see [`HostKind::is_extended`]).
/// The others are listed so that lifecycle hooks shared between many host
/// types can pass them through and get a benign "unsupported" answer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub enum HostKind {
    Aircraft,
    AircraftType,
    Anim,
    Building,
    BuildingType,
    Bullet,
    Cell,
    Factory,
    House,
    Infantry,
    InfantryType,
    Overlay,
    Side,
    Smudge,
    Super,
    Team,
    Terrain,
    Trigger,
    Unit,
    UnitType,
    Warhead,
    Wave,
    WeaponType,
}

impl HostKind {
    /// Order in which extended kinds are written to and read from a save.
    ///
    /// This order is part of the wire format. Reordering it breaks every
    /// existing save file.
    pub const PERSISTED_ORDER: [HostKind; 16] = [
        HostKind::Unit,
        HostKind::Aircraft,
        HostKind::AircraftType,
        HostKind::Anim,
        HostKind::Building,
        HostKind::BuildingType,
        HostKind::House,
        HostKind::Infantry,
        HostKind::InfantryType,
        HostKind::Side,
        HostKind::Super,
        HostKind::Terrain,
        HostKind::UnitType,
        HostKind::Warhead,
        HostKind::Wave,
        HostKind::WeaponType,
    ];

    /// Every kind, extended or not.
    pub const ALL: [HostKind; 23] = [
        HostKind::Aircraft,
        HostKind::AircraftType,
        HostKind::Anim,
        HostKind::Building,
        HostKind::BuildingType,
        HostKind::Bullet,
        HostKind::Cell,
        HostKind::Factory,
        HostKind::House,
        HostKind::Infantry,
        HostKind::InfantryType,
        HostKind::Overlay,
        HostKind::Side,
        HostKind::Smudge,
        HostKind::Super,
        HostKind::Team,
        HostKind::Terrain,
        HostKind::Trigger,
        HostKind::Unit,
        HostKind::UnitType,
        HostKind::Warhead,
        HostKind::Wave,
        HostKind::WeaponType,
    ];

    /// Returns the class id written before each record of this kind, or
    /// `None` for kinds that are not extended.
    pub const fn class_id(self) -> Option<u32> {
        match self {
            HostKind::Aircraft => Some(class_id(b"AIRC")),
            HostKind::AircraftType => Some(class_id(b"AIRT")),
            HostKind::Anim => Some(class_id(b"ANIM")),
            HostKind::Building => Some(class_id(b"BLDG")),
            HostKind::BuildingType => Some(class_id(b"BLDT")),
            HostKind::House => Some(class_id(b"HOUS")),
            HostKind::Infantry => Some(class_id(b"INFA")),
            HostKind::InfantryType => Some(class_id(b"INFT")),
            HostKind::Side => Some(class_id(b"SIDE")),
            HostKind::Super => Some(class_id(b"SUPR")),
            HostKind::Terrain => Some(class_id(b"TERR")),
            HostKind::Unit => Some(class_id(b"UNIT")),
            HostKind::UnitType => Some(class_id(b"UNTT")),
            HostKind::Warhead => Some(class_id(b"WARH")),
            HostKind::Wave => Some(class_id(b"WAVE")),
            HostKind::WeaponType => Some(class_id(b"WEAP")),
            HostKind::Bullet
            | HostKind::Cell
            | HostKind::Factory
            | HostKind::Overlay
            | HostKind::Smudge
            | HostKind::Team
            | HostKind::Trigger => None,
        }
    }

    /// Returns `true` if host objects of this kind carry extension records.
    pub const fn is_extended(self) -> bool {
        self.class_id().is_some()
    }

    /// The host class name, as the game's own RTTI reports it.
    pub const fn name(self) -> &'static str {
        match self {
            HostKind::Aircraft => "AircraftClass",
            HostKind::AircraftType => "AircraftTypeClass",
            HostKind::Anim => "AnimClass",
            HostKind::Building => "BuildingClass",
            HostKind::BuildingType => "BuildingTypeClass",
            HostKind::Bullet => "BulletClass",
            HostKind::Cell => "CellClass",
            HostKind::Factory => "FactoryClass",
            HostKind::House => "HouseClass",
            HostKind::Infantry => "InfantryClass",
            HostKind::InfantryType => "InfantryTypeClass",
            HostKind::Overlay => "OverlayClass",
            HostKind::Side => "SideClass",
            HostKind::Smudge => "SmudgeClass",
            HostKind::Super => "SuperClass",
            HostKind::Team => "TeamClass",
            HostKind::Terrain => "TerrainClass",
            HostKind::Trigger => "TriggerClass",
            HostKind::Unit => "UnitClass",
            HostKind::UnitType => "UnitTypeClass",
            HostKind::Warhead => "WarheadTypeClass",
            HostKind::Wave => "WaveClass",
            HostKind::WeaponType => "WeaponTypeClass",
        }
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A host object as the game reports it to a lifecycle hook: its identity
/// plus its runtime type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostHandle {
    /// Identity of the host object.
    pub id: HostId,
    /// Runtime type discriminator of the host object.
    pub kind: HostKind,
}

impl HostHandle {
    /// Creates a handle from an id and a kind.
    pub const fn new(id: HostId, kind: HostKind) -> Self {
        Self { id, kind }
    }
}

impl fmt::Display for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.id)
    }
}

/// Enumerates the host objects that are currently alive in the game.
///
/// Implemented by the host program. After a load, the registry walks this
/// directory to make sure every live host has a record and no record
/// outlives its host.
pub trait HostDirectory {
    /// Returns every live host of the given kind.
    fn live_hosts(&self, kind: HostKind) -> Vec<HostId>;
}
