// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A composite error type for errors that can occur while interacting with Crabber.
//!
//! Any action that has to go over the network can fail in a handful of well-known ways, so every
//! fallible function in this crate returns [`Result`] with the [`Error`] enum below. The variants
//! split into errors raised by this crate before a request is ever sent (`AuthenticationRequired`
//! when no access token is on hand, `InvalidArgument` for caller-side validation), errors
//! translated from the server's response status (`NotFound`, `ApiError`, `MaxTriesReached`), and
//! errors bubbled up from the underlying libraries.

use hyper::StatusCode;

/// Convenient alias to a `Result` containing this crate's composite [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// A set of errors that can occur when interacting with Crabber.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The attempted action requires an access token, but the [`Credentials`][crate::Credentials]
    /// in use only carry a developer key.
    ///
    /// This is raised before any network call is made. It is also raised if the server rejects
    /// the supplied token with an HTTP 401.
    #[error("This request requires an access token")]
    AuthenticationRequired,
    /// The requested crab or molt does not exist on the target instance.
    #[error("The requested resource was not found")]
    NotFound,
    /// The request kept failing with a transient status (a 429 or a server error) until the
    /// configured retry budget ran out. Contains the number of attempts that were made. See
    /// [`RetryPolicy`][crate::RetryPolicy] to tune the budget.
    #[error("The request failed after {0} attempts")]
    MaxTriesReached(u32),
    /// A function argument violated a documented constraint, e.g. an empty or over-long molt.
    /// Contains a description of the broken constraint. No network call is made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The server rejected the request. Contains the error message the server responded with.
    #[error("The server rejected the request: {0}")]
    ApiError(String),
    /// The response from the server was missing an expected value. Contains a description of what
    /// was missing.
    #[error("Invalid response received: {0}")]
    InvalidResponse(&'static str),
    /// The server returned a status code that this crate has no specific handling for.
    #[error("Error status received: {0}")]
    BadStatus(StatusCode),
    /// The base URL given for the target instance could not be parsed.
    #[error("Invalid base URL: {0}")]
    BadUrl(#[from] url::ParseError),
    /// An error occurred while loading the JSON response.
    #[error("JSON deserialize error: {0}")]
    DeserializeError(#[from] serde_json::Error),
    /// An error occurred in the HTTP client while performing the request.
    #[error("Network error: {0}")]
    NetError(#[from] hyper::Error),
    /// An error occurred while assembling the HTTP request.
    #[error("HTTP error: {0}")]
    HttpError(#[from] hyper::http::Error),
    /// An IO error was encountered, e.g. while reading an image file for upload.
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}
