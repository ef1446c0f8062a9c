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

//! Foundational types and contracts of the Vinifera extension layer.
//!
//! This crate knows nothing about concrete records. It defines how a host
//! object is identified, what an extension record must provide, how saved
//! identities are swizzled back to live ones, and how the extension stream is
//! framed on disk.

pub mod checksum;
pub mod extension;
pub mod format;
pub mod host;
pub mod stream;
pub mod swizzle;

pub use checksum::CrcEngine;
pub use extension::{Extension, GlobalExtension, GlobalKind};
pub use format::{BuildFingerprint, HeaderError, SaveHeader, SAVE_MARKER};
pub use host::{HostDirectory, HostHandle, HostId, HostKind};
pub use stream::StreamError;
pub use swizzle::{Relink, Relinker, RemapTable, SwizzleError, SwizzleManager};
