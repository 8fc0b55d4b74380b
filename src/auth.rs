// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Types and constructors for the credentials that authenticate API calls.
//!
//! Crabber's authentication model is deliberately simple: a *developer key* identifies the
//! application making the call and is required on every request, and an *access token* grants
//! that application permission to act on behalf of one account. Both are issued by the developer
//! page of the target instance, and both travel as query parameters on each request.
//!
//! Those two shapes are captured by the two variants of [`Credentials`]. Read-only lookups work
//! with either variant; anything that posts, follows, likes, or otherwise acts as an account
//! needs the [`Access`][Credentials::Access] variant. Calling a privileged function with
//! [`Developer`][Credentials::Developer] credentials fails with
//! [`Error::AuthenticationRequired`][crate::error::Error::AuthenticationRequired] before a
//! request is ever sent, so there is no way to leak a half-authenticated call to the server.
//!
//! A `Developer` credential can be upgraded in place once a token becomes available:
//!
//! ```rust
//! use crabber::Credentials;
//!
//! let creds = Credentials::developer("YOUR_API_KEY");
//! assert!(!creds.is_authenticated());
//!
//! let creds = creds.authenticate("YOUR_ACCESS_TOKEN");
//! assert!(creds.is_authenticated());
//! ```

use std::borrow::Cow;

use crate::error::{Error, Result};

pub(crate) mod raw;

/// The credential pair used to authenticate requests to a Crabber instance.
///
/// See [the module documentation][self] for details.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// A developer key on its own. Grants read-only access to the API.
    Developer {
        /// The developer key identifying the calling application.
        api_key: Cow<'static, str>,
    },
    /// A developer key plus an access token, allowing the application to act on behalf of the
    /// token's account.
    Access {
        /// The developer key identifying the calling application.
        api_key: Cow<'static, str>,
        /// The access token granting permission to act as an account.
        access_token: Cow<'static, str>,
    },
}

impl Credentials {
    /// Creates an unauthenticated credential from the given developer key.
    pub fn developer(api_key: impl Into<Cow<'static, str>>) -> Credentials {
        Credentials::Developer {
            api_key: api_key.into(),
        }
    }

    /// Creates an authenticated credential from the given developer key and access token.
    pub fn access(
        api_key: impl Into<Cow<'static, str>>,
        access_token: impl Into<Cow<'static, str>>,
    ) -> Credentials {
        Credentials::Access {
            api_key: api_key.into(),
            access_token: access_token.into(),
        }
    }

    /// Upgrades this credential with the given access token, keeping the developer key.
    ///
    /// If this credential already carried a token, the new one replaces it.
    pub fn authenticate(self, access_token: impl Into<Cow<'static, str>>) -> Credentials {
        match self {
            Credentials::Developer { api_key } | Credentials::Access { api_key, .. } => {
                Credentials::Access {
                    api_key,
                    access_token: access_token.into(),
                }
            }
        }
    }

    /// The developer key carried by this credential.
    pub fn api_key(&self) -> &str {
        match self {
            Credentials::Developer { api_key } | Credentials::Access { api_key, .. } => api_key,
        }
    }

    /// The access token carried by this credential, if any.
    pub fn access_token(&self) -> Option<&str> {
        match self {
            Credentials::Developer { .. } => None,
            Credentials::Access { access_token, .. } => Some(access_token),
        }
    }

    /// Whether this credential carries an access token.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Credentials::Access { .. })
    }

    /// Returns the access token, or `AuthenticationRequired` if there is none.
    ///
    /// Privileged operations call this before assembling their request.
    pub(crate) fn require_access_token(&self) -> Result<&str> {
        self.access_token().ok_or(Error::AuthenticationRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::Credentials;
    use crate::error::Error;

    #[test]
    fn developer_has_no_token() {
        let creds = Credentials::developer("key");
        assert_eq!(creds.api_key(), "key");
        assert_eq!(creds.access_token(), None);
        assert!(!creds.is_authenticated());

        match creds.require_access_token() {
            Err(Error::AuthenticationRequired) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn authenticate_keeps_api_key() {
        let creds = Credentials::developer("key").authenticate("token");
        assert_eq!(creds.api_key(), "key");
        assert_eq!(creds.access_token(), Some("token"));
        assert!(creds.is_authenticated());
    }

    #[test]
    fn authenticate_replaces_token() {
        let creds = Credentials::access("key", "stale").authenticate("fresh");
        assert_eq!(creds.access_token(), Some("fresh"));
    }
}
