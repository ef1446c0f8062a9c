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

//! Records of the game's singletons.

use super::forget;
use bincode::{Decode, Encode};
use serde::Serialize;
use vinifera_core::{CrcEngine, GlobalExtension, GlobalKind, HostId, Relink, Relinker};

/// Extension of `RulesClass`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Encode, Decode)]
pub struct RulesExtension {
    /// Whether the starting MCV deploys itself in multiplayer.
    pub is_mp_auto_deploy_mcv: bool,
    pub is_mp_prebuilt_construction_yard: bool,
    pub is_build_off_ally: bool,
    /// Frames an infantry mechanic waits between two repairs.
    pub mechanic_repair_delay: i32,
}

impl GlobalExtension for RulesExtension {
    const KIND: GlobalKind = GlobalKind::Rules;

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_bool(self.is_mp_auto_deploy_mcv);
        crc.add_bool(self.is_mp_prebuilt_construction_yard);
        crc.add_bool(self.is_build_off_ally);
        crc.add_i32(self.mechanic_repair_delay);
    }
}

impl Relink for RulesExtension {}

/// Extension of `ScenarioClass`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Encode, Decode)]
pub struct ScenarioExtension {
    /// Waypoint cells the scenario reserves as player start positions.
    pub starting_waypoints: Vec<u32>,
    pub is_ice_destruction_enabled: bool,
}

impl GlobalExtension for ScenarioExtension {
    const KIND: GlobalKind = GlobalKind::Scenario;

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_u32(self.starting_waypoints.len() as u32);
        for &waypoint in &self.starting_waypoints {
            crc.add_u32(waypoint);
        }
        crc.add_bool(self.is_ice_destruction_enabled);
    }
}

impl Relink for ScenarioExtension {}

/// Extension of `SessionClass`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Encode, Decode)]
pub struct SessionExtension {
    pub is_auto_deploy_mcv: bool,
    pub is_prebuilt_construction_yard: bool,
    pub is_fog_of_war: bool,
}

impl GlobalExtension for SessionExtension {
    const KIND: GlobalKind = GlobalKind::Session;

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_bool(self.is_auto_deploy_mcv);
        crc.add_bool(self.is_prebuilt_construction_yard);
        crc.add_bool(self.is_fog_of_war);
    }
}

impl Relink for SessionExtension {}

/// Extension of `SidebarClass`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Encode, Decode)]
pub struct SidebarExtension {
    /// Index of the selected sidebar tab.
    pub current_tab: i32,
    /// Scroll position of each tab.
    pub tab_scroll: [i32; 4],
}

impl GlobalExtension for SidebarExtension {
    const KIND: GlobalKind = GlobalKind::Sidebar;

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_i32(self.current_tab);
        for &scroll in &self.tab_scroll {
            crc.add_i32(scroll);
        }
    }
}

impl Relink for SidebarExtension {}

/// Extension of `TacticalClass`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Encode, Decode)]
pub struct TacticalExtension {
    /// The object the camera follows.
    pub focused_object: Option<HostId>,
    /// Text drawn in the top-left corner of the tactical view.
    pub info_text: String,
    pub info_text_timer: i32,
}

impl GlobalExtension for TacticalExtension {
    const KIND: GlobalKind = GlobalKind::Tactical;

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_host(self.focused_object);
        crc.add_str(&self.info_text);
        crc.add_i32(self.info_text_timer);
    }

    fn detach(&mut self, target: HostId, _all: bool) {
        forget(&mut self.focused_object, target);
    }
}

impl Relink for TacticalExtension {
    fn relink(&mut self, relinker: &mut Relinker<'_>) {
        relinker.remap(&mut self.focused_object, "TacticalExtension::focused_object");
    }
}
