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

use vinifera_core::{HostId, HostKind, StreamError};

/// Errors raised by the extension maps and the registry façade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtensionError {
    /// Storage for a new record could not be allocated.
    #[error("failed to create the {kind} extension for host {host}")]
    CreationFailed {
        /// Kind of the host.
        kind: HostKind,
        /// The host the record was for.
        host: HostId,
    },
    /// A record already exists for this host.
    #[error("host {host} already has a {kind} extension")]
    AlreadyExists {
        /// Kind of the host.
        kind: HostKind,
        /// The host that already has a record.
        host: HostId,
    },
    /// The host kind carries no extension records.
    #[error("{0} is not an extended host type")]
    UnsupportedHostType(HostKind),
    /// The handle's kind does not match the requested record type.
    #[error("requested a {expected} extension through a {found} handle")]
    KindMismatch {
        /// Kind of the requested record type.
        expected: HostKind,
        /// Kind reported by the handle.
        found: HostKind,
    },
    /// The host has no record yet, or no longer has one.
    #[error("host {host} has no {kind} extension")]
    ExtensionNotFound {
        /// Kind of the host.
        kind: HostKind,
        /// The host that was looked up.
        host: HostId,
    },
}

/// Errors raised while reading one per-kind block of a save.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// The stream could not be read.
    #[error(transparent)]
    Stream(#[from] StreamError),
    /// The block holds two records for the same host.
    #[error("duplicate {kind} extension for saved host {host}")]
    DuplicateRecord {
        /// Kind of the block.
        kind: HostKind,
        /// The saved host identity that appears twice.
        host: HostId,
    },
}
