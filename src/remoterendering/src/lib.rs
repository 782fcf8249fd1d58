// Copyright 2025 the Mixed Reality Rust SDK Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Mixed Reality Remote Rendering client library for Rust.
//!
//! The Remote Rendering service renders high-quality, interactive 3D content
//! in the cloud and streams it to devices. Both of its main workflows are
//! long-running: converting an asset into the service's internal format takes
//! minutes, and a rendering session takes a while to become ready.
//!
//! This crate provides the pollers for those workflows, built on the
//! [lro] crate. Asset conversions cannot be cancelled: their poller rejects
//! cancellation without contacting the service. Rendering sessions can: their
//! poller maps cancellation to the service's stop-session call, and a stopped
//! session reports itself as cancelled.

/// The resource types returned by the Remote Rendering service.
pub mod model;

mod poller;
pub use poller::{RemoteRenderingOperations, new_conversion_poller, new_session_poller};

// Re-export the polling types appearing in this crate's public API.
pub use lro::{OperationState, OperationStatus, Poller, PollerOptions, RemoteOperation};

pub(crate) use gax::Result;
