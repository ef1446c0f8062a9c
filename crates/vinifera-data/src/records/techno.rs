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

//! Records of the objects that move and fight on the map.

use super::forget;
use bincode::{Decode, Encode};
use serde::Serialize;
use vinifera_core::{CrcEngine, Extension, HostId, HostKind, Relink, Relinker};

/// Extension of `AircraftClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct AircraftExtension {
    /// The aircraft this record belongs to.
    pub host: HostId,
    /// The carrier or silo that launched this aircraft, if it was spawned.
    pub spawn_owner: Option<HostId>,
    /// Target of a kamikaze run.
    pub kamikaze_target: Option<HostId>,
    pub is_spawned: bool,
    /// Frames left before the next ammo reload.
    pub ammo_reload_timer: i32,
}

impl Extension for AircraftExtension {
    const KIND: HostKind = HostKind::Aircraft;

    fn new(host: HostId) -> Self {
        Self {
            host,
            spawn_owner: None,
            kamikaze_target: None,
            is_spawned: false,
            ammo_reload_timer: 0,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_host(self.spawn_owner);
        crc.add_host(self.kamikaze_target);
        crc.add_bool(self.is_spawned);
        crc.add_i32(self.ammo_reload_timer);
    }

    fn detach(&mut self, target: HostId, _all: bool) {
        forget(&mut self.spawn_owner, target);
        forget(&mut self.kamikaze_target, target);
    }
}

impl Relink for AircraftExtension {
    fn relink(&mut self, relinker: &mut Relinker<'_>) {
        relinker.remap(&mut self.spawn_owner, "AircraftExtension::spawn_owner");
        relinker.remap(&mut self.kamikaze_target, "AircraftExtension::kamikaze_target");
    }
}

/// Extension of `BuildingClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct BuildingExtension {
    /// The building this record belongs to.
    pub host: HostId,
    /// Frames until the next cash payout.
    pub produce_cash_timer: i32,
    /// Credits paid out on each tick of the timer.
    pub produce_cash_amount: i32,
    /// Credits left before the building stops paying out.
    pub current_produce_cash_budget: i32,
    pub is_capture_one_time_cash_given: bool,
    pub is_budget_depleted: bool,
    /// Last aircraft that docked on this helipad.
    pub last_docked_aircraft: Option<HostId>,
    pub last_flash_frame: u32,
}

impl Extension for BuildingExtension {
    const KIND: HostKind = HostKind::Building;

    fn new(host: HostId) -> Self {
        Self {
            host,
            produce_cash_timer: 0,
            produce_cash_amount: 0,
            current_produce_cash_budget: -1,
            is_capture_one_time_cash_given: false,
            is_budget_depleted: false,
            last_docked_aircraft: None,
            last_flash_frame: 0,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_i32(self.produce_cash_timer);
        crc.add_i32(self.produce_cash_amount);
        crc.add_i32(self.current_produce_cash_budget);
        crc.add_bool(self.is_capture_one_time_cash_given);
        crc.add_bool(self.is_budget_depleted);
        crc.add_host(self.last_docked_aircraft);
    }

    fn detach(&mut self, target: HostId, _all: bool) {
        forget(&mut self.last_docked_aircraft, target);
    }
}

impl Relink for BuildingExtension {
    fn relink(&mut self, relinker: &mut Relinker<'_>) {
        relinker.remap(
            &mut self.last_docked_aircraft,
            "BuildingExtension::last_docked_aircraft",
        );
    }
}

/// Extension of `InfantryClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct InfantryExtension {
    /// The infantry this record belongs to.
    pub host: HostId,
    /// The building this soldier is garrisoned in.
    pub garrisoned_in: Option<HostId>,
    pub is_mechanic_repairing: bool,
}

impl Extension for InfantryExtension {
    const KIND: HostKind = HostKind::Infantry;

    fn new(host: HostId) -> Self {
        Self {
            host,
            garrisoned_in: None,
            is_mechanic_repairing: false,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_host(self.garrisoned_in);
        crc.add_bool(self.is_mechanic_repairing);
    }

    fn detach(&mut self, target: HostId, _all: bool) {
        forget(&mut self.garrisoned_in, target);
    }
}

impl Relink for InfantryExtension {
    fn relink(&mut self, relinker: &mut Relinker<'_>) {
        relinker.remap(&mut self.garrisoned_in, "InfantryExtension::garrisoned_in");
    }
}

/// Extension of `UnitClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct UnitExtension {
    /// The unit this record belongs to.
    pub host: HostId,
    /// Aircraft launched by this unit that are still alive.
    pub spawned_aircraft: Vec<HostId>,
    /// The unit being towed, if any.
    pub tow_target: Option<HostId>,
    pub is_deploying: bool,
}

impl Extension for UnitExtension {
    const KIND: HostKind = HostKind::Unit;

    fn new(host: HostId) -> Self {
        Self {
            host,
            spawned_aircraft: Vec::new(),
            tow_target: None,
            is_deploying: false,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_u32(self.spawned_aircraft.len() as u32);
        for aircraft in &self.spawned_aircraft {
            crc.add_host(Some(*aircraft));
        }
        crc.add_host(self.tow_target);
        crc.add_bool(self.is_deploying);
    }

    fn detach(&mut self, target: HostId, _all: bool) {
        self.spawned_aircraft.retain(|&aircraft| aircraft != target);
        forget(&mut self.tow_target, target);
    }
}

impl Relink for UnitExtension {
    fn relink(&mut self, relinker: &mut Relinker<'_>) {
        relinker.remap_all(&mut self.spawned_aircraft, "UnitExtension::spawned_aircraft");
        relinker.remap(&mut self.tow_target, "UnitExtension::tow_target");
    }
}
