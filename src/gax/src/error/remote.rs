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

use serde::{Deserialize, Serialize};

/// The error payload reported by the remote rendering service.
///
/// The service uses this representation both when it rejects a request
/// outright and when a long-running operation finishes in a failed state. In
/// the latter case the payload is carried inside the operation snapshot and
/// is not a client-side error at all.
///
/// # Example
/// ```
/// use mixedreality_gax::error::remote::RemoteError;
/// let payload = serde_json::json!({
///     "code": "InvalidInput",
///     "message": "The input asset could not be read.",
///     "target": "settings.inputLocation",
/// });
/// let error: RemoteError = serde_json::from_value(payload)?;
/// assert_eq!(error.code, "InvalidInput");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteError {
    /// A machine-readable error code.
    pub code: String,

    /// A human-readable description of the problem.
    pub message: String,

    /// The request field or resource the error applies to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Additional errors related to this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<RemoteError>,

    /// A more specific error that caused this one, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_error: Option<Box<RemoteError>>,
}

impl RemoteError {
    /// Sets the value of [code][RemoteError::code].
    pub fn set_code<T: Into<String>>(mut self, v: T) -> Self {
        self.code = v.into();
        self
    }

    /// Sets the value of [message][RemoteError::message].
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }

    /// Sets the value of [target][RemoteError::target].
    pub fn set_target<T: Into<String>>(mut self, v: T) -> Self {
        self.target = Some(v.into());
        self
    }

    /// Sets the value of [details][RemoteError::details].
    pub fn set_details<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<RemoteError>,
    {
        self.details = v.into_iter().map(|i| i.into()).collect();
        self
    }

    /// Sets the value of [inner_error][RemoteError::inner_error].
    pub fn set_inner_error<T: Into<RemoteError>>(mut self, v: T) -> Self {
        self.inner_error = Some(Box::new(v.into()));
        self
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
