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

use super::forget;
use bincode::{Decode, Encode};
use serde::Serialize;
use vinifera_core::{CrcEngine, Extension, HostId, HostKind, Relink, Relinker};

/// Extension of `HouseClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct HouseExtension {
    pub host: HostId,
    /// The side this house plays as.
    pub side: Option<HostId>,
    /// Percentage of the cost refunded when a building is repaired.
    pub repair_percent: i32,
    pub is_observer: bool,
}

impl Extension for HouseExtension {
    const KIND: HostKind = HostKind::House;

    fn new(host: HostId) -> Self {
        Self {
            host,
            side: None,
            repair_percent: 50,
            is_observer: false,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_host(self.side);
        crc.add_i32(self.repair_percent);
        crc.add_bool(self.is_observer);
    }

    fn detach(&mut self, target: HostId, _all: bool) {
        forget(&mut self.side, target);
    }
}

impl Relink for HouseExtension {
    fn relink(&mut self, relinker: &mut Relinker<'_>) {
        relinker.remap(&mut self.side, "HouseExtension::side");
    }
}

/// Extension of `SideClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct SideExtension {
    pub host: HostId,
    pub ui_color: [u8; 3],
    pub toolbar_color: [u8; 3],
    /// Name shown in the game lobby.
    pub ui_name: String,
}

impl Extension for SideExtension {
    const KIND: HostKind = HostKind::Side;

    fn new(host: HostId) -> Self {
        Self {
            host,
            ui_color: [255, 255, 255],
            toolbar_color: [255, 255, 255],
            ui_name: String::new(),
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_bytes(&self.ui_color);
        crc.add_bytes(&self.toolbar_color);
        crc.add_str(&self.ui_name);
    }
}

impl Relink for SideExtension {}
