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

//! Mixed Reality service helpers.
//!
//! This crate contains types and functions shared by the Mixed Reality client
//! libraries for Rust. Most applications consume these types indirectly,
//! through the results returned by the service clients and pollers.

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// This is the result type used by all functions wrapping remote calls.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// The core error types used by the client libraries.
pub mod error;
