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

//! The concrete extension records.
//!
//! Each record mirrors the state the extension layer keeps beside one host
//! class. Records that point at other hosts store plain [`HostId`]s and
//! implement [`Relink`](vinifera_core::Relink) so the loader can bring those
//! identities back to life.

mod global;
mod house;
mod techno;
mod types;
mod world;

pub use global::{
    RulesExtension, ScenarioExtension, SessionExtension, SidebarExtension, TacticalExtension,
};
pub use house::{HouseExtension, SideExtension};
pub use techno::{AircraftExtension, BuildingExtension, InfantryExtension, UnitExtension};
pub use types::{
    AircraftTypeExtension, BuildingTypeExtension, InfantryTypeExtension, UnitTypeExtension,
    WarheadExtension, WeaponTypeExtension,
};
pub use world::{AnimExtension, SuperExtension, TerrainExtension, WaveExtension};

use vinifera_core::HostId;

/// Clears `slot` if it points at `target`.
pub(crate) fn forget(slot: &mut Option<HostId>, target: HostId) {
    if *slot == Some(target) {
        *slot = None;
    }
}
