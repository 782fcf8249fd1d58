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

use gax::error::remote::RemoteError;
use lro::{OperationStatus, RemoteOperation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The status of an asset conversion.
///
/// Conversions cannot be cancelled, so no conversion status classifies into
/// the [Cancelled][OperationStatus::Cancelled] bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ConversionStatus {
    /// The service accepted the conversion but has not started it.
    #[default]
    NotStarted,
    /// The conversion is running.
    Running,
    /// The conversion completed successfully.
    Succeeded,
    /// The conversion failed. The conversion's error payload has details.
    Failed,
}

impl ConversionStatus {
    /// Classifies this status into the common [OperationStatus] buckets.
    pub fn operation_status(&self) -> OperationStatus {
        match self {
            Self::NotStarted => OperationStatus::Pending,
            Self::Running => OperationStatus::Running,
            Self::Succeeded => OperationStatus::Succeeded,
            Self::Failed => OperationStatus::Failed,
        }
    }
}

impl std::str::FromStr for ConversionStatus {
    type Err = gax::error::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "NotStarted" => Ok(Self::NotStarted),
            "Running" => Ok(Self::Running),
            "Succeeded" => Ok(Self::Succeeded),
            "Failed" => Ok(Self::Failed),
            _ => Err(gax::error::Error::invalid_status(format!(
                "unrecognized conversion status {s:?}"
            ))),
        }
    }
}

impl std::fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NotStarted => "NotStarted",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
        };
        write!(f, "{name}")
    }
}

/// The status of a rendering session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum SessionStatus {
    /// The session is being provisioned.
    #[default]
    Starting,
    /// The session is ready to accept client connections.
    Ready,
    /// The session terminated with an error. The session's error payload
    /// has details.
    Error,
    /// The session was stopped, either explicitly or by the service.
    Stopped,
    /// The session reached its maximum lease time and expired.
    Expired,
}

impl SessionStatus {
    /// Classifies this status into the common [OperationStatus] buckets.
    ///
    /// A stopped session classifies as cancelled: stopping is the session
    /// analog of cancelling the provisioning operation. An expired session
    /// classifies as failed, though the service does not always attach an
    /// error payload to it.
    pub fn operation_status(&self) -> OperationStatus {
        match self {
            Self::Starting => OperationStatus::Running,
            Self::Ready => OperationStatus::Succeeded,
            Self::Error => OperationStatus::Failed,
            Self::Stopped => OperationStatus::Cancelled,
            Self::Expired => OperationStatus::Failed,
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = gax::error::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Starting" => Ok(Self::Starting),
            "Ready" => Ok(Self::Ready),
            "Error" => Ok(Self::Error),
            "Stopped" => Ok(Self::Stopped),
            "Expired" => Ok(Self::Expired),
            _ => Err(gax::error::Error::invalid_status(format!(
                "unrecognized session status {s:?}"
            ))),
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Starting => "Starting",
            Self::Ready => "Ready",
            Self::Error => "Error",
            Self::Stopped => "Stopped",
            Self::Expired => "Expired",
        };
        write!(f, "{name}")
    }
}

/// A snapshot of an asset conversion.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    /// The identifier of the conversion, unique within the account.
    pub id: String,

    /// The settings the conversion was created with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ConversionSettings>,

    /// The conversion output. Populated once the conversion succeeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ConversionOutput>,

    /// The error reported by the service, if the conversion failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RemoteError>,

    /// The status of the conversion.
    pub status: ConversionStatus,

    /// The time the conversion was created.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub creation_time: Option<OffsetDateTime>,
}

impl Conversion {
    /// Sets the value of [id][Conversion::id].
    pub fn set_id<T: Into<String>>(mut self, v: T) -> Self {
        self.id = v.into();
        self
    }

    /// Sets the value of [settings][Conversion::settings].
    pub fn set_settings<T: Into<ConversionSettings>>(mut self, v: T) -> Self {
        self.settings = Some(v.into());
        self
    }

    /// Sets the value of [output][Conversion::output].
    pub fn set_output<T: Into<ConversionOutput>>(mut self, v: T) -> Self {
        self.output = Some(v.into());
        self
    }

    /// Sets the value of [error][Conversion::error].
    pub fn set_error<T: Into<RemoteError>>(mut self, v: T) -> Self {
        self.error = Some(v.into());
        self
    }

    /// Sets the value of [status][Conversion::status].
    pub fn set_status<T: Into<ConversionStatus>>(mut self, v: T) -> Self {
        self.status = v.into();
        self
    }

    /// Sets the value of [creation_time][Conversion::creation_time].
    pub fn set_creation_time<T: Into<OffsetDateTime>>(mut self, v: T) -> Self {
        self.creation_time = Some(v.into());
        self
    }
}

impl RemoteOperation for Conversion {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> OperationStatus {
        self.status.operation_status()
    }

    fn error(&self) -> Option<&RemoteError> {
        self.error.as_ref()
    }
}

/// The settings an asset conversion is created with.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSettings {
    /// Where to read the input asset from.
    pub input_location: ConversionInputSettings,

    /// Where to write the converted asset to.
    pub output_location: ConversionOutputSettings,
}

impl ConversionSettings {
    pub fn new(input_location: ConversionInputSettings, output_location: ConversionOutputSettings) -> Self {
        Self {
            input_location,
            output_location,
        }
    }
}

/// The location of the input asset for a conversion.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionInputSettings {
    /// The URI of the storage container holding the input asset.
    pub storage_container_uri: String,

    /// A shared access signature granting read and list access to the
    /// container. Not needed when the account has access to the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_container_read_list_sas: Option<String>,

    /// Restricts the input to blobs with this prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_prefix: Option<String>,

    /// The path to the input asset, relative to the container (and the blob
    /// prefix, when set).
    pub relative_input_asset_path: String,
}

impl ConversionInputSettings {
    pub fn new<T, U>(storage_container_uri: T, relative_input_asset_path: U) -> Self
    where
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            storage_container_uri: storage_container_uri.into(),
            relative_input_asset_path: relative_input_asset_path.into(),
            ..Self::default()
        }
    }

    /// Sets the value of
    /// [storage_container_read_list_sas][ConversionInputSettings::storage_container_read_list_sas].
    pub fn set_storage_container_read_list_sas<T: Into<String>>(mut self, v: T) -> Self {
        self.storage_container_read_list_sas = Some(v.into());
        self
    }

    /// Sets the value of [blob_prefix][ConversionInputSettings::blob_prefix].
    pub fn set_blob_prefix<T: Into<String>>(mut self, v: T) -> Self {
        self.blob_prefix = Some(v.into());
        self
    }
}

/// The location of the output asset for a conversion.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOutputSettings {
    /// The URI of the storage container to write the converted asset to.
    pub storage_container_uri: String,

    /// A shared access signature granting write access to the container.
    /// Not needed when the account has access to the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_container_write_sas: Option<String>,

    /// A prefix prepended to the output blob names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_prefix: Option<String>,

    /// The filename of the converted asset. Defaults to the input filename
    /// with the converted extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_asset_filename: Option<String>,
}

impl ConversionOutputSettings {
    pub fn new<T: Into<String>>(storage_container_uri: T) -> Self {
        Self {
            storage_container_uri: storage_container_uri.into(),
            ..Self::default()
        }
    }

    /// Sets the value of
    /// [storage_container_write_sas][ConversionOutputSettings::storage_container_write_sas].
    pub fn set_storage_container_write_sas<T: Into<String>>(mut self, v: T) -> Self {
        self.storage_container_write_sas = Some(v.into());
        self
    }

    /// Sets the value of [blob_prefix][ConversionOutputSettings::blob_prefix].
    pub fn set_blob_prefix<T: Into<String>>(mut self, v: T) -> Self {
        self.blob_prefix = Some(v.into());
        self
    }

    /// Sets the value of
    /// [output_asset_filename][ConversionOutputSettings::output_asset_filename].
    pub fn set_output_asset_filename<T: Into<String>>(mut self, v: T) -> Self {
        self.output_asset_filename = Some(v.into());
        self
    }
}

/// The output of a successful asset conversion.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOutput {
    /// The URI of the converted asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_asset_uri: Option<String>,
}

impl ConversionOutput {
    /// Sets the value of [output_asset_uri][ConversionOutput::output_asset_uri].
    pub fn set_output_asset_uri<T: Into<String>>(mut self, v: T) -> Self {
        self.output_asset_uri = Some(v.into());
        self
    }
}

/// A snapshot of a rendering session.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProperties {
    /// The identifier of the session, unique within the account.
    pub id: String,

    /// The port for the ArrInspector diagnostic tool. Populated once the
    /// session is ready.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arr_inspector_port: Option<u16>,

    /// The port clients connect to. Populated once the session is ready.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handshake_port: Option<u16>,

    /// How long the session has been running, in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_time_minutes: Option<i32>,

    /// The host clients connect to. Populated once the session is ready.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// The lease time of the session, in minutes. The session expires when
    /// the lease runs out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lease_time_minutes: Option<i32>,

    /// The size of the server the session runs on, such as `"Standard"` or
    /// `"Premium"`.
    pub size: String,

    /// The status of the session.
    pub status: SessionStatus,

    /// The rendering capacity of the session's server, in teraflops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teraflops: Option<f32>,

    /// The error reported by the service, if the session terminated with an
    /// error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RemoteError>,

    /// The time the session was created.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub creation_time: Option<OffsetDateTime>,
}

impl SessionProperties {
    /// Sets the value of [id][SessionProperties::id].
    pub fn set_id<T: Into<String>>(mut self, v: T) -> Self {
        self.id = v.into();
        self
    }

    /// Sets the value of [arr_inspector_port][SessionProperties::arr_inspector_port].
    pub fn set_arr_inspector_port(mut self, v: u16) -> Self {
        self.arr_inspector_port = Some(v);
        self
    }

    /// Sets the value of [handshake_port][SessionProperties::handshake_port].
    pub fn set_handshake_port(mut self, v: u16) -> Self {
        self.handshake_port = Some(v);
        self
    }

    /// Sets the value of [elapsed_time_minutes][SessionProperties::elapsed_time_minutes].
    pub fn set_elapsed_time_minutes(mut self, v: i32) -> Self {
        self.elapsed_time_minutes = Some(v);
        self
    }

    /// Sets the value of [hostname][SessionProperties::hostname].
    pub fn set_hostname<T: Into<String>>(mut self, v: T) -> Self {
        self.hostname = Some(v.into());
        self
    }

    /// Sets the value of [max_lease_time_minutes][SessionProperties::max_lease_time_minutes].
    pub fn set_max_lease_time_minutes(mut self, v: i32) -> Self {
        self.max_lease_time_minutes = Some(v);
        self
    }

    /// Sets the value of [size][SessionProperties::size].
    pub fn set_size<T: Into<String>>(mut self, v: T) -> Self {
        self.size = v.into();
        self
    }

    /// Sets the value of [status][SessionProperties::status].
    pub fn set_status<T: Into<SessionStatus>>(mut self, v: T) -> Self {
        self.status = v.into();
        self
    }

    /// Sets the value of [teraflops][SessionProperties::teraflops].
    pub fn set_teraflops(mut self, v: f32) -> Self {
        self.teraflops = Some(v);
        self
    }

    /// Sets the value of [error][SessionProperties::error].
    pub fn set_error<T: Into<RemoteError>>(mut self, v: T) -> Self {
        self.error = Some(v.into());
        self
    }

    /// Sets the value of [creation_time][SessionProperties::creation_time].
    pub fn set_creation_time<T: Into<OffsetDateTime>>(mut self, v: T) -> Self {
        self.creation_time = Some(v.into());
        self
    }
}

impl RemoteOperation for SessionProperties {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> OperationStatus {
        self.status.operation_status()
    }

    fn error(&self) -> Option<&RemoteError> {
        self.error.as_ref()
    }
}
