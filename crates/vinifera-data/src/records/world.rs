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

/// Extension of `AnimClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct AnimExtension {
    pub host: HostId,
    /// House credited with the damage this animation deals.
    pub owner_house: Option<HostId>,
}

impl Extension for AnimExtension {
    const KIND: HostKind = HostKind::Anim;

    fn new(host: HostId) -> Self {
        Self {
            host,
            owner_house: None,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_host(self.owner_house);
    }

    fn detach(&mut self, target: HostId, _all: bool) {
        forget(&mut self.owner_house, target);
    }
}

impl Relink for AnimExtension {
    fn relink(&mut self, relinker: &mut Relinker<'_>) {
        relinker.remap(&mut self.owner_house, "AnimExtension::owner_house");
    }
}

/// Extension of `SuperClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct SuperExtension {
    pub host: HostId,
    /// Whether the sidebar tab flashes when the weapon is ready.
    pub is_flash_sidebar_tab: bool,
    pub flash_sidebar_tab_frame: i32,
}

impl Extension for SuperExtension {
    const KIND: HostKind = HostKind::Super;

    fn new(host: HostId) -> Self {
        Self {
            host,
            is_flash_sidebar_tab: false,
            flash_sidebar_tab_frame: 0,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_bool(self.is_flash_sidebar_tab);
        crc.add_i32(self.flash_sidebar_tab_frame);
    }
}

impl Relink for SuperExtension {}

/// Extension of `TerrainClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct TerrainExtension {
    pub host: HostId,
    /// Light source attached to this terrain object.
    pub light_source: Option<HostId>,
    pub is_lit: bool,
}

impl Extension for TerrainExtension {
    const KIND: HostKind = HostKind::Terrain;

    fn new(host: HostId) -> Self {
        Self {
            host,
            light_source: None,
            is_lit: false,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_host(self.light_source);
        crc.add_bool(self.is_lit);
    }

    fn detach(&mut self, target: HostId, _all: bool) {
        forget(&mut self.light_source, target);
    }
}

impl Relink for TerrainExtension {
    fn relink(&mut self, relinker: &mut Relinker<'_>) {
        relinker.remap(&mut self.light_source, "TerrainExtension::light_source");
    }
}

/// Extension of `WaveClass`.
#[derive(Debug, Clone, PartialEq, Serialize, Encode, Decode)]
pub struct WaveExtension {
    pub host: HostId,
    /// The object firing the wave.
    pub source: Option<HostId>,
    /// The object the wave is aimed at.
    pub target: Option<HostId>,
    pub beam_scale: f32,
}

impl Extension for WaveExtension {
    const KIND: HostKind = HostKind::Wave;

    fn new(host: HostId) -> Self {
        Self {
            host,
            source: None,
            target: None,
            beam_scale: 1.0,
        }
    }

    fn host(&self) -> HostId {
        self.host
    }

    fn rebind(&mut self, host: HostId) {
        self.host = host;
    }

    fn compute_crc(&self, crc: &mut CrcEngine) {
        crc.add_host(self.source);
        crc.add_host(self.target);
        crc.add_f32(self.beam_scale);
    }

    fn detach(&mut self, target: HostId, _all: bool) {
        forget(&mut self.source, target);
        forget(&mut self.target, target);
    }
}

impl Relink for WaveExtension {
    fn relink(&mut self, relinker: &mut Relinker<'_>) {
        relinker.remap(&mut self.source, "WaveExtension::source");
        relinker.remap(&mut self.target, "WaveExtension::target");
    }
}
