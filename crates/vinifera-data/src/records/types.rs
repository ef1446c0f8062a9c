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

//! Records of the type classes, the per-INI-section definitions shared by
//! every instance of an object type. None of them reference other hosts.

use bincode::{Decode, Encode};
use serde::Serialize;
use vinifera_core::{CrcEngine, Extension, HostId, HostKind, Relink};

/// Extension of `AircraftTypeClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct AircraftTypeExtension {
    pub host: HostId,
    /// Whether this aircraft only exists as a spawn of a carrier.
    pub is_spawned: bool,
    /// Number of aircraft a spawner of this type keeps airborne.
    pub spawn_count: i32,
    /// Frames between two spawns.
    pub spawn_reload_rate: i32,
    pub is_immune_to_emp: bool,
}

impl Extension for AircraftTypeExtension {
    const KIND: HostKind = HostKind::AircraftType;

    fn new(host: HostId) -> Self {
        Self {
            host,
            is_spawned: false,
            spawn_count: 0,
            spawn_reload_rate: 0,
            is_immune_to_emp: false,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_bool(self.is_spawned);
        crc.add_i32(self.spawn_count);
        crc.add_i32(self.spawn_reload_rate);
        crc.add_bool(self.is_immune_to_emp);
    }
}

impl Relink for AircraftTypeExtension {}

/// Extension of `BuildingTypeClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct BuildingTypeExtension {
    pub host: HostId,
    pub gate_up_sound: i32,
    pub gate_down_sound: i32,
    /// Credits granted once when the building is first placed.
    pub produce_cash_startup: i32,
    pub produce_cash_amount: i32,
    pub produce_cash_delay: i32,
    /// Total credits the building can pay out, `-1` for no limit.
    pub produce_cash_budget: i32,
    pub is_startup_cash_one_time: bool,
    pub is_reset_budget_on_capture: bool,
    pub is_eligible_for_ally_building: bool,
}

impl Extension for BuildingTypeExtension {
    const KIND: HostKind = HostKind::BuildingType;

    fn new(host: HostId) -> Self {
        Self {
            host,
            gate_up_sound: -1,
            gate_down_sound: -1,
            produce_cash_startup: 0,
            produce_cash_amount: 0,
            produce_cash_delay: 0,
            produce_cash_budget: -1,
            is_startup_cash_one_time: false,
            is_reset_budget_on_capture: false,
            is_eligible_for_ally_building: false,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_i32(self.gate_up_sound);
        crc.add_i32(self.gate_down_sound);
        crc.add_i32(self.produce_cash_startup);
        crc.add_i32(self.produce_cash_amount);
        crc.add_i32(self.produce_cash_delay);
        crc.add_i32(self.produce_cash_budget);
        crc.add_bool(self.is_startup_cash_one_time);
        crc.add_bool(self.is_reset_budget_on_capture);
        crc.add_bool(self.is_eligible_for_ally_building);
    }
}

impl Relink for BuildingTypeExtension {}

/// Extension of `InfantryTypeClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct InfantryTypeExtension {
    pub host: HostId,
    pub is_mechanic: bool,
    pub is_omni_healer: bool,
}

impl Extension for InfantryTypeExtension {
    const KIND: HostKind = HostKind::InfantryType;

    fn new(host: HostId) -> Self {
        Self {
            host,
            is_mechanic: false,
            is_omni_healer: false,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_bool(self.is_mechanic);
        crc.add_bool(self.is_omni_healer);
    }
}

impl Relink for InfantryTypeExtension {}

/// Extension of `UnitTypeClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct UnitTypeExtension {
    pub host: HostId,
    /// Whether another unit can tow this one.
    pub is_totable: bool,
    pub start_turret_frame: i32,
    pub turret_facings: i32,
    pub idle_rate: i32,
}

impl Extension for UnitTypeExtension {
    const KIND: HostKind = HostKind::UnitType;

    fn new(host: HostId) -> Self {
        Self {
            host,
            is_totable: true,
            start_turret_frame: -1,
            turret_facings: 32,
            idle_rate: 0,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_bool(self.is_totable);
        crc.add_i32(self.start_turret_frame);
        crc.add_i32(self.turret_facings);
        crc.add_i32(self.idle_rate);
    }
}

impl Relink for UnitTypeExtension {}

/// Extension of `WarheadTypeClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct WarheadExtension {
    pub host: HostId,
    /// Whether the explosion spreads through adjacent cells.
    pub is_volumetric: bool,
    /// Fraction of the damage walls soak up.
    pub wall_absorption: f32,
    pub shake_x_lo: i32,
    pub shake_x_hi: i32,
    pub shake_y_lo: i32,
    pub shake_y_hi: i32,
}

impl Extension for WarheadExtension {
    const KIND: HostKind = HostKind::Warhead;

    fn new(host: HostId) -> Self {
        Self {
            host,
            is_volumetric: false,
            wall_absorption: 1.0,
            shake_x_lo: 0,
            shake_x_hi: 0,
            shake_y_lo: 0,
            shake_y_hi: 0,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_bool(self.is_volumetric);
        crc.add_f32(self.wall_absorption);
        crc.add_i32(self.shake_x_lo);
        crc.add_i32(self.shake_x_hi);
        crc.add_i32(self.shake_y_lo);
        crc.add_i32(self.shake_y_hi);
    }
}

impl Relink for WarheadExtension {}

/// Extension of `WeaponTypeClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct WeaponTypeExtension {
    pub host: HostId,
    pub is_electric_bolt: bool,
    /// Colours of the three strands of an electric bolt, as RGB.
    pub electric_bolt_colors: [[u8; 3]; 3],
    pub electric_bolt_segment_count: i32,
    pub is_suicide: bool,
}

impl Extension for WeaponTypeExtension {
    const KIND: HostKind = HostKind::WeaponType;

    fn new(host: HostId) -> Self {
        Self {
            host,
            is_electric_bolt: false,
            electric_bolt_colors: [[255, 255, 255], [82, 81, 255], [82, 81, 255]],
            electric_bolt_segment_count: 8,
            is_suicide: false,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_bool(self.is_electric_bolt);
        for color in &self.electric_bolt_colors {
            crc.add_bytes(color);
        }
        crc.add_i32(self.electric_bolt_segment_count);
        crc.add_bool(self.is_suicide);
    }
}

impl Relink for WeaponTypeExtension {}
