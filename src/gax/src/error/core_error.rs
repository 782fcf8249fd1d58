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

use super::remote::RemoteError;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The core error returned by all client libraries.
///
/// The client libraries report errors from multiple sources. For example, the
/// service may reject a request, the transport may be unable to complete the
/// round-trip, the response may not deserialize, or the application may
/// request a capability the operation kind does not support.
///
/// Most applications will just return the error or log it, without any
/// further action. Applications that need to interrogate the failure can use
/// the predicates to determine the error kind, and the accessors to query the
/// most common error details. The error [source][std::error::Error::source]
/// carries deeper information when available.
///
/// # Example
/// ```
/// use mixedreality_gax::error::Error;
/// match example_function() {
///     Err(e) if e.status().is_some() => {
///         println!("service error {e}, debug using {:?}", e.status().unwrap());
///     },
///     Err(e) if e.is_unsupported() => { println!("not supported here: {e}"); },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success, how boring"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # use mixedreality_gax::error::remote::RemoteError;
///     # Err(Error::service(RemoteError::default().set_code("NotFound").set_message("NOT FOUND")))
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error with the information returned by the service.
    ///
    /// Note that this represents the service rejecting a *request*. A remote
    /// operation finishing in a failed state is not an `Error`: it is a
    /// successfully polled snapshot whose own error payload is set.
    ///
    /// # Example
    /// ```
    /// use mixedreality_gax::error::Error;
    /// use mixedreality_gax::error::remote::RemoteError;
    /// let payload = RemoteError::default().set_code("NotFound").set_message("NOT FOUND");
    /// let error = Error::service(payload.clone());
    /// assert_eq!(error.status(), Some(&payload));
    /// ```
    pub fn service(status: RemoteError) -> Self {
        Self {
            kind: ErrorKind::Service(Box::new(status)),
            source: None,
        }
    }

    /// The [RemoteError] payload associated with this error, if any.
    pub fn status(&self) -> Option<&RemoteError> {
        match &self.kind {
            ErrorKind::Service(status) => Some(status.as_ref()),
            _ => None,
        }
    }

    /// A problem reported by the transport layer, with a full HTTP response.
    pub fn http(status_code: u16, payload: bytes::Bytes) -> Self {
        let details = TransportDetails {
            status_code: Some(status_code),
            payload: Some(payload),
        };
        Self {
            kind: ErrorKind::Transport(Box::new(details)),
            source: None,
        }
    }

    /// A problem in the transport layer without a full HTTP response.
    ///
    /// Examples include: a broken connection after the request is sent, or
    /// any error that did not include a status code.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        let details = TransportDetails {
            status_code: None,
            payload: None,
        };
        Self {
            kind: ErrorKind::Transport(Box::new(details)),
            source: Some(source.into()),
        }
    }

    /// The round-trip did not reach the service or did not complete.
    pub fn is_transport(&self) -> bool {
        matches!(&self.kind, ErrorKind::Transport { .. })
    }

    /// The round-trip failed without receiving a full HTTP response.
    pub fn is_io(&self) -> bool {
        matches!(
            &self.kind,
            ErrorKind::Transport(d) if matches!(**d, TransportDetails { status_code: None, .. }))
    }

    /// The HTTP status code, if any, associated with this error.
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Transport(d) => d.as_ref().status_code,
            _ => None,
        }
    }

    /// The payload, if any, associated with this error.
    pub fn http_payload(&self) -> Option<&bytes::Bytes> {
        match &self.kind {
            ErrorKind::Transport(d) => d.payload.as_ref(),
            _ => None,
        }
    }

    /// Creates an error representing a timeout.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use mixedreality_gax::error::Error;
    /// let error = Error::timeout("simulated timeout");
    /// assert!(error.is_timeout());
    /// assert!(error.source().is_some());
    /// ```
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            source: Some(source.into()),
        }
    }

    /// A single round-trip could not be completed before its deadline.
    ///
    /// This is always a client-side generated error, and it is local to one
    /// request: it says nothing about the state of the remote operation the
    /// request was querying.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Creates an error representing a deserialization problem.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use mixedreality_gax::error::Error;
    /// let error = Error::deser("simulated problem");
    /// assert!(error.is_deserialization());
    /// assert!(error.source().is_some());
    /// ```
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// The response could not be deserialized.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// Creates an error representing a capability mismatch.
    ///
    /// Some operation kinds do not support all capabilities. For example,
    /// asset conversions have no server-side cancel endpoint. This error is
    /// stable: retrying never helps.
    ///
    /// # Example
    /// ```
    /// use mixedreality_gax::error::Error;
    /// let error = Error::unsupported("Cancel operation is not supported.");
    /// assert!(error.is_unsupported());
    /// ```
    pub fn unsupported<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Unsupported,
            source: Some(source.into()),
        }
    }

    /// The requested capability is not available for this operation kind.
    pub fn is_unsupported(&self) -> bool {
        matches!(self.kind, ErrorKind::Unsupported)
    }

    /// Creates an error representing a status value outside the enumerated
    /// domain.
    ///
    /// The status classifiers are total over their enumerated status domain.
    /// A value outside that domain is a contract violation: treating it as
    /// "still pending" could poll forever, so it must fail loudly instead.
    ///
    /// # Example
    /// ```
    /// use mixedreality_gax::error::Error;
    /// let error = Error::invalid_status("unrecognized status \"Paused\"");
    /// assert!(error.is_invalid_status());
    /// ```
    pub fn invalid_status<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::InvalidStatus,
            source: Some(source.into()),
        }
    }

    /// The service reported a status value outside the enumerated domain.
    pub fn is_invalid_status(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidStatus)
    }

    /// An uncategorized problem.
    pub fn other<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Other,
            source: Some(source.into()),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Service(status), _) => {
                write!(
                    f,
                    "the service reports an error with code {} described as: {}",
                    status.code, status.message
                )
            }
            (ErrorKind::Transport(details), _) => details.display(self.source(), f),
            (ErrorKind::Timeout, Some(e)) => {
                write!(f, "the request exceeded the request deadline {e}")
            }
            (ErrorKind::Deserialization, Some(e)) => {
                write!(f, "cannot deserialize the response {e}")
            }
            (ErrorKind::Unsupported, Some(e)) => {
                write!(f, "the operation does not support this request: {e}")
            }
            (ErrorKind::InvalidStatus, Some(e)) => {
                write!(f, "the status value violates the service contract: {e}")
            }
            (ErrorKind::Other, Some(e)) => {
                write!(f, "an unclassified problem making a request: {e}")
            }
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error))
    }
}

/// The type of error held by an [Error] instance.
#[derive(Debug)]
enum ErrorKind {
    Service(Box<RemoteError>),
    Transport(Box<TransportDetails>),
    Timeout,
    Deserialization,
    Unsupported,
    InvalidStatus,
    Other,
}

#[derive(Debug)]
struct TransportDetails {
    status_code: Option<u16>,
    payload: Option<bytes::Bytes>,
}

impl TransportDetails {
    fn display(
        &self,
        source: Option<&(dyn StdError + 'static)>,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match (source, self) {
            (
                _,
                TransportDetails {
                    status_code: Some(code),
                    payload: Some(p),
                },
            ) => {
                if let Ok(message) = std::str::from_utf8(p.as_ref()) {
                    write!(f, "the HTTP transport reports a [{code}] error: {message}")
                } else {
                    write!(f, "the HTTP transport reports a [{code}] error: {p:?}")
                }
            }
            (Some(source), _) => {
                write!(f, "the transport reports an error: {source}")
            }
            (None, _) => unreachable!("no Error constructor allows this"),
        }
    }
}
