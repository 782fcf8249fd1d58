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

use crate::{OperationStatus, RemoteOperation};
use gax::error::remote::RemoteError;

/// The state tracked by a poller for a long-running operation.
///
/// The state holds the latest snapshot returned by the service, and answers
/// questions about the operation's progress in terms of the common
/// [OperationStatus] buckets. Only the poller that owns the state updates it;
/// applications read it through [Poller::state][crate::Poller::state].
#[derive(Clone, Debug)]
pub struct OperationState<O> {
    latest: O,
}

impl<O> OperationState<O>
where
    O: RemoteOperation,
{
    pub(crate) fn new(initial: O) -> Self {
        Self { latest: initial }
    }

    /// Returns true if the operation has been started on the service.
    ///
    /// Pollers are created from a snapshot the service already returned, so
    /// this is always true. It exists so applications can treat all
    /// long-running operations uniformly.
    pub fn is_started(&self) -> bool {
        true
    }

    /// The status of the operation, classified into the common buckets.
    pub fn status(&self) -> OperationStatus {
        self.latest.status()
    }

    /// Returns true if the operation reached a terminal state.
    pub fn is_completed(&self) -> bool {
        self.status().is_terminal()
    }

    /// Returns true if the operation was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status() == OperationStatus::Cancelled
    }

    /// The error reported by the service, if the operation failed.
    ///
    /// This is `None` unless the operation reached the
    /// [Failed][OperationStatus::Failed] state. Note that the service may
    /// fail an operation without a detailed payload, so `None` does not
    /// imply success.
    pub fn error(&self) -> Option<&RemoteError> {
        match self.status() {
            OperationStatus::Failed => self.latest.error(),
            _ => None,
        }
    }

    /// The latest snapshot of the operation.
    ///
    /// While the operation is in progress this is the most recent snapshot
    /// returned by the service. Once [is_completed][Self::is_completed]
    /// returns true, this is the final snapshot.
    pub fn result(&self) -> &O {
        &self.latest
    }

    pub(crate) fn apply(&mut self, snapshot: O) {
        self.latest = snapshot;
    }

    pub(crate) fn into_result(self) -> O {
        self.latest
    }
}
