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

use crate::host::HostId;

/// Accumulates primitive values into a checksum.
///
/// Used to compare extension state between two game instances (multiplayer
/// sync checks, save/load debugging). The value is a diagnostic, nothing
/// relies on it for correctness.
#[derive(Debug, Clone)]
pub struct CrcEngine {
    hasher: blake3::Hasher,
    fed: usize,
}

impl CrcEngine {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self {
            hasher: blake3::Hasher::new(),
            fed: 0,
        }
    }

    /// Feeds raw bytes.
    pub fn add_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
        self.fed += bytes.len();
    }

    /// Feeds a boolean as a single byte.
    pub fn add_bool(&mut self, value: bool) {
        self.add_bytes(&[u8::from(value)]);
    }

    /// Feeds a signed 32-bit value.
    pub fn add_i32(&mut self, value: i32) {
        self.add_bytes(&value.to_le_bytes());
    }

    /// Feeds an unsigned 32-bit value.
    pub fn add_u32(&mut self, value: u32) {
        self.add_bytes(&value.to_le_bytes());
    }

    /// Feeds a float by its bit pattern.
    pub fn add_f32(&mut self, value: f32) {
        self.add_bytes(&value.to_bits().to_le_bytes());
    }

    /// Feeds an optional host reference. `None` feeds a zero id.
    pub fn add_host(&mut self, host: Option<HostId>) {
        self.add_bytes(&host.map_or(0, HostId::raw).to_le_bytes());
    }

    /// Feeds a string, length first so that adjacent strings cannot alias.
    pub fn add_str(&mut self, value: &str) {
        self.add_u32(value.len() as u32);
        self.add_bytes(value.as_bytes());
    }

    /// Number of bytes fed so far.
    pub fn bytes_fed(&self) -> usize {
        self.fed
    }

    /// Returns the current 32-bit checksum.
    pub fn value(&self) -> u32 {
        let hash = self.hasher.finalize();
        let bytes = hash.as_bytes();
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

impl Default for CrcEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_input_same_value() {
        let mut a = CrcEngine::new();
        let mut b = CrcEngine::new();
        a.add_i32(42);
        a.add_host(Some(HostId::new(7)));
        b.add_i32(42);
        b.add_host(Some(HostId::new(7)));
        assert_eq!(a.value(), b.value());
        assert_eq!(a.bytes_fed(), 12);
    }

    #[test]
    fn test_order_matters() {
        let mut a = CrcEngine::new();
        let mut b = CrcEngine::new();
        a.add_i32(1);
        a.add_i32(2);
        b.add_i32(2);
        b.add_i32(1);
        assert_ne!(a.value(), b.value());
    }

    #[test]
    fn test_strings_do_not_alias() {
        let mut a = CrcEngine::new();
        let mut b = CrcEngine::new();
        a.add_str("ab");
        a.add_str("c");
        b.add_str("a");
        b.add_str("bc");
        assert_ne!(a.value(), b.value());
    }
}
