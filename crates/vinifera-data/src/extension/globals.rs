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

use crate::records::{
    RulesExtension, ScenarioExtension, SessionExtension, SidebarExtension, TacticalExtension,
};
use serde::Serialize;
use std::io::{Read, Write};
use vinifera_core::{stream, CrcEngine, GlobalExtension, HostId, Relink, Relinker, StreamError};

/// The singleton records, one per game singleton.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalExtensions {
    /// Extension of the rules database.
    pub rules: RulesExtension,
    /// Extension of the running scenario.
    pub scenario: ScenarioExtension,
    /// Extension of the session.
    pub session: SessionExtension,
    /// Extension of the sidebar.
    pub sidebar: SidebarExtension,
    /// Extension of the tactical view.
    pub tactical: TacticalExtension,
}

fn save_one<G: GlobalExtension>(writer: &mut dyn Write, record: &G) -> Result<(), StreamError> {
    stream::write_record(writer, G::KIND.class_id(), record, G::KIND.name())
}

fn load_one<G: GlobalExtension>(reader: &mut dyn Read) -> Result<G, StreamError> {
    stream::read_record(reader, G::KIND.class_id(), G::KIND.name())
}

impl GlobalExtensions {
    /// Puts every singleton record back to its default state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Tells every singleton that `target` is leaving the game.
    pub fn detach_all(&mut self, target: HostId, all: bool) {
        self.rules.detach(target, all);
        self.scenario.detach(target, all);
        self.session.detach(target, all);
        self.sidebar.detach(target, all);
        self.tactical.detach(target, all);
    }

    /// Feeds every singleton into `crc`, in persisted order.
    pub fn compute_crc(&self, crc: &mut CrcEngine) {
        self.rules.compute_crc(crc);
        self.scenario.compute_crc(crc);
        self.session.compute_crc(crc);
        self.sidebar.compute_crc(crc);
        self.tactical.compute_crc(crc);
    }

    /// Summed size of the singleton record types.
    pub fn layout_size() -> usize {
        RulesExtension::size_of()
            + ScenarioExtension::size_of()
            + SessionExtension::size_of()
            + SidebarExtension::size_of()
            + TacticalExtension::size_of()
    }

    /// Writes every singleton, in [`GlobalKind::PERSISTED_ORDER`](vinifera_core::GlobalKind::PERSISTED_ORDER).
    pub fn save(&self, writer: &mut dyn Write) -> Result<(), StreamError> {
        save_one(writer, &self.rules)?;
        save_one(writer, &self.scenario)?;
        save_one(writer, &self.session)?;
        save_one(writer, &self.sidebar)?;
        save_one(writer, &self.tactical)?;
        Ok(())
    }

    /// Reads every singleton back, in the order [`GlobalExtensions::save`] wrote them.
    pub fn load(reader: &mut dyn Read) -> Result<Self, StreamError> {
        Ok(Self {
            rules: load_one(reader)?,
            scenario: load_one(reader)?,
            session: load_one(reader)?,
            sidebar: load_one(reader)?,
            tactical: load_one(reader)?,
        })
    }

    /// Rewrites the saved identities held by the singletons.
    pub fn relink(&mut self, relinker: &mut Relinker<'_>) {
        self.rules.relink(relinker);
        self.scenario.relink(relinker);
        self.session.relink(relinker);
        self.sidebar.relink(relinker);
        self.tactical.relink(relinker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use vinifera_core::GlobalKind;

    #[test]
    fn test_singletons_are_written_in_persisted_order() {
        let globals = GlobalExtensions::default();
        let mut bytes = Vec::new();
        globals.save(&mut bytes).unwrap();

        let mut reader = Cursor::new(bytes);
        for kind in GlobalKind::PERSISTED_ORDER {
            let mut tag = [0u8; 4];
            reader.read_exact(&mut tag).unwrap();
            assert_eq!(u32::from_le_bytes(tag), kind.class_id(), "{kind}");
            // Skip the payload by decoding it as the matching record.
            match kind {
                GlobalKind::Rules => {
                    let _: RulesExtension =
                        bincode::decode_from_std_read(&mut reader, bincode::config::standard())
                            .unwrap();
                }
                GlobalKind::Scenario => {
                    let _: ScenarioExtension =
                        bincode::decode_from_std_read(&mut reader, bincode::config::standard())
                            .unwrap();
                }
                GlobalKind::Session => {
                    let _: SessionExtension =
                        bincode::decode_from_std_read(&mut reader, bincode::config::standard())
                            .unwrap();
                }
                GlobalKind::Sidebar => {
                    let _: SidebarExtension =
                        bincode::decode_from_std_read(&mut reader, bincode::config::standard())
                            .unwrap();
                }
                GlobalKind::Tactical => {
                    let _: TacticalExtension =
                        bincode::decode_from_std_read(&mut reader, bincode::config::standard())
                            .unwrap();
                }
            }
        }
    }

    #[test]
    fn test_singleton_round_trip() {
        let mut globals = GlobalExtensions::default();
        globals.scenario.starting_waypoints = vec![0, 1, 7];
        globals.sidebar.tab_scroll = [3, 0, 1, 2];
        globals.tactical.info_text = "Reinforcements have arrived".to_string();

        let mut bytes = Vec::new();
        globals.save(&mut bytes).unwrap();
        let loaded = GlobalExtensions::load(&mut Cursor::new(bytes)).unwrap();

        assert_eq!(loaded, globals);
    }

    #[test]
    fn test_reset_and_detach() {
        let mut globals = GlobalExtensions::default();
        globals.tactical.focused_object = Some(HostId::new(12));
        globals.rules.is_build_off_ally = true;

        globals.detach_all(HostId::new(12), false);
        assert_eq!(globals.tactical.focused_object, None);

        globals.reset();
        assert_eq!(globals, GlobalExtensions::default());
    }
}
