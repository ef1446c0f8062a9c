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

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Marker at the very start of the extension data, must match exactly.
pub const SAVE_MARKER: [u8; MARKER_LEN] = *b"VINIFERA_SAVE_HEADER";
const MARKER_LEN: usize = 20;
const FINGERPRINT_LEN: usize = 40;

/// Identifies the build that wrote a save.
///
/// `schema_version` is bumped by hand whenever a record's persisted fields
/// change. `layout` is the sum of every record type's size and catches the
/// cases where someone forgot to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuildFingerprint {
    /// Hand-maintained version of the persisted record fields.
    pub schema_version: u32,
    /// Structural hash of the record layouts.
    pub layout: u32,
}

impl BuildFingerprint {
    /// Renders the fingerprint into its fixed-size, NUL-padded text form.
    pub fn to_bytes(&self) -> [u8; FINGERPRINT_LEN] {
        let text = self.to_string();
        let mut bytes = [0u8; FINGERPRINT_LEN];
        let len = text.len().min(FINGERPRINT_LEN);
        bytes[..len].copy_from_slice(&text.as_bytes()[..len]);
        bytes
    }
}

impl fmt::Display for BuildFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema:{:08x};layout:{:08x}", self.schema_version, self.layout)
    }
}

/// Errors raised while parsing a [`SaveHeader`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    /// Fewer bytes than a header were available.
    #[error("expected {expected} header bytes, found {found}")]
    Truncated {
        /// Size of a header.
        expected: usize,
        /// Bytes available.
        found: usize,
    },
    /// The marker does not match [`SAVE_MARKER`].
    #[error("missing save marker; not Vinifera extension data")]
    BadMarker,
}

/// The fixed 60-byte header in front of the extension data.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SaveHeader {
    /// Must be [`SAVE_MARKER`].
    pub marker: [u8; MARKER_LEN],
    /// The writer's [`BuildFingerprint`], as NUL-padded text.
    pub fingerprint: [u8; FINGERPRINT_LEN],
}

impl SaveHeader {
    /// The total size of the header in bytes.
    pub const SIZE: usize = MARKER_LEN + FINGERPRINT_LEN;

    /// Builds the header for a save written by `fingerprint`.
    pub fn new(fingerprint: &BuildFingerprint) -> Self {
        Self {
            marker: SAVE_MARKER,
            fingerprint: fingerprint.to_bytes(),
        }
    }

    /// The raw bytes of the header, as written to the stream.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Parses a header from the beginning of a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() < Self::SIZE {
            return Err(HeaderError::Truncated {
                expected: Self::SIZE,
                found: bytes.len(),
            });
        }

        let header: SaveHeader = bytemuck::pod_read_unaligned(&bytes[..Self::SIZE]);
        if header.marker != SAVE_MARKER {
            return Err(HeaderError::BadMarker);
        }
        Ok(header)
    }

    /// Returns `true` if this header was written by a build with `fingerprint`.
    pub fn matches(&self, fingerprint: &BuildFingerprint) -> bool {
        self.fingerprint == fingerprint.to_bytes()
    }

    /// The writer's fingerprint as text, for diagnostics.
    pub fn fingerprint_text(&self) -> String {
        let end = self
            .fingerprint
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(FINGERPRINT_LEN);
        String::from_utf8_lossy(&self.fingerprint[..end]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FINGERPRINT: BuildFingerprint = BuildFingerprint {
        schema_version: 3,
        layout: 0x1f4,
    };

    #[test]
    fn test_header_round_trip() {
        let header = SaveHeader::new(&FINGERPRINT);
        assert_eq!(header.as_bytes().len(), SaveHeader::SIZE);
        assert_eq!(&header.as_bytes()[..20], b"VINIFERA_SAVE_HEADER");

        let parsed = SaveHeader::from_bytes(header.as_bytes()).unwrap();
        assert_eq!(parsed, header);
        assert!(parsed.matches(&FINGERPRINT));
        assert_eq!(parsed.fingerprint_text(), "schema:00000003;layout:000001f4");
    }

    #[test]
    fn test_bad_marker() {
        let mut bytes = SaveHeader::new(&FINGERPRINT).as_bytes().to_vec();
        bytes[0] = b'X';
        assert_eq!(SaveHeader::from_bytes(&bytes), Err(HeaderError::BadMarker));
    }

    #[test]
    fn test_truncated() {
        assert_eq!(
            SaveHeader::from_bytes(&[0u8; 12]),
            Err(HeaderError::Truncated {
                expected: 60,
                found: 12
            })
        );
    }

    #[test]
    fn test_fingerprint_mismatch() {
        let header = SaveHeader::new(&FINGERPRINT);
        let other = BuildFingerprint {
            schema_version: 4,
            ..FINGERPRINT
        };
        assert!(!header.matches(&other));
    }
}
