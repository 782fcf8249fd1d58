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

mod core_error;
pub use core_error::*;

/// Errors and error details returned by the remote rendering service.
///
/// The client libraries distinguish between errors detected while trying to
/// reach the service (e.g. the connection drops before a full response), and
/// errors reported by the service itself. The types in this module represent
/// the detailed payloads returned by the service.
pub mod remote;
