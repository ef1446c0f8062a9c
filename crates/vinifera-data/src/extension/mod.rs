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

//! The extension side-table.
//!
//! Every extended host kind owns one [`ExtensionMap`], a bijective map from a
//! host's identity to its record. The [`ExtensionRegistry`] bundles every map
//! with the singleton records and is the only entry point the host program
//! uses: it creates a record when a host is constructed, destroys it when the
//! host is destroyed, and hands the whole set to the persistence layer.

mod erased;
mod error;
mod globals;
mod map;
mod registry;

pub use erased::ErasedExtensionMap;
pub use error::{BlockError, ExtensionError};
pub use globals::GlobalExtensions;
pub use map::ExtensionMap;
pub use registry::{ExtensionRegistry, ReconcileReport, Registered};

#[cfg(test)]
mod tests;
