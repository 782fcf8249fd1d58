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

use std::time::Duration;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// The configuration for a polling loop.
///
/// # Example
/// ```
/// # use mixedreality_lro::PollerOptions;
/// # use std::time::Duration;
/// let options = PollerOptions::new().with_interval(Duration::from_secs(2));
/// assert_eq!(options.interval(), Duration::from_secs(2));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PollerOptions {
    interval: Duration,
    poll_on_start: bool,
}

impl PollerOptions {
    /// Creates options with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time between queries.
    ///
    /// The default is 10 seconds. Most operations take minutes to complete,
    /// so shorter intervals rarely help and add load on the service.
    pub fn with_interval(mut self, v: Duration) -> Self {
        self.interval = v;
        self
    }

    /// Sets whether the first query is issued immediately.
    ///
    /// By default the polling loop waits one interval before the first
    /// query, since the initial snapshot was returned by the service moments
    /// earlier. Enable this when resuming a poller from a snapshot of
    /// unknown age.
    pub fn with_poll_on_start(mut self, v: bool) -> Self {
        self.poll_on_start = v;
        self
    }

    /// The time between queries.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the first query is issued immediately.
    pub fn poll_on_start(&self) -> bool {
        self.poll_on_start
    }
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            poll_on_start: false,
        }
    }
}
