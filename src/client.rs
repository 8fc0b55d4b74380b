// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The connection to a Crabber instance.
//!
//! A [`Client`] bundles the three pieces of configuration every call needs: the
//! [`Credentials`], the base URL of the target instance, and the [`RetryPolicy`] used when the
//! server answers with a transient failure. Constructing one performs no network traffic; use
//! [`ping`][Client::ping] if you want to verify the connection details up front.
//!
//! The methods on `Client` cover the facade-level operations: lookups by ID or username, the
//! molt listings, and posting. Operations scoped to a single crab or molt live in the [`crab`]
//! and [`molt`] modules (and as methods on the model structs themselves), all of which take a
//! `&Client` to issue their calls through.
//!
//! [`crab`]: crate::crab
//! [`molt`]: crate::molt

use std::time::Duration;

use hyper::client::HttpConnector;
use hyper::Method;
use hyper_tls::HttpsConnector;

use crate::auth::raw::RequestBuilder;
use crate::auth::Credentials;
use crate::common::{raw_request, ParamList};
use crate::crab::{self, Crab};
use crate::error::{Error, Result};
use crate::links;
use crate::media::MediaSource;
use crate::molt::{self, ListParams, Molt, MoltDraft};

type HttpClient = hyper::Client<HttpsConnector<HttpConnector>>;

/// How often, and how patiently, a request is retried when the server answers with a transient
/// failure (HTTP 429 or a server error).
///
/// The delay before attempt `n + 1` is `backoff * n`, a simple linear ramp. The defaults are ten
/// attempts half a second apart; tune them with [`Client::retry_policy`].
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// The total number of attempts to make before giving up with
    /// [`Error::MaxTriesReached`][crate::error::Error::MaxTriesReached].
    pub max_tries: u32,
    /// The base delay between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> RetryPolicy {
        RetryPolicy {
            max_tries: 10,
            backoff: Duration::from_millis(500),
        }
    }
}

/// A connection to an instance of Crabber.
///
/// See [the module documentation][self] for an overview, or [the crate documentation][crate] for
/// usage examples.
#[derive(Debug, Clone)]
pub struct Client {
    credentials: Credentials,
    site_root: String,
    retry: RetryPolicy,
    http: HttpClient,
}

impl Client {
    /// Creates a client for the flagship instance at `https://crabber.net`.
    pub fn new(credentials: Credentials) -> Client {
        Client {
            credentials,
            site_root: links::DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            http: hyper::Client::builder().build(HttpsConnector::new()),
        }
    }

    /// Creates a client for the instance at the given base URL, e.g. `http://localhost:5000`.
    ///
    /// The URL must carry an `http` or `https` scheme; a trailing slash is tolerated. The API
    /// root (`/api/v1`) is appended automatically and must not be part of the URL.
    pub fn custom(credentials: Credentials, base_url: &str) -> Result<Client> {
        let parsed = url::Url::parse(base_url)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::InvalidArgument(
                "base_url must use an http or https scheme",
            ));
        }

        Ok(Client {
            site_root: base_url.trim_end_matches('/').to_string(),
            ..Client::new(credentials)
        })
    }

    /// Replaces the retry policy used for transient failures.
    pub fn retry_policy(self, retry: RetryPolicy) -> Client {
        Client { retry, ..self }
    }

    /// The credentials this client authenticates with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Whether this client carries an access token.
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }

    /// Verifies that the base URL points at a live Crabber API.
    pub async fn ping(&self) -> Result<()> {
        let req = self.get("/", None);
        raw_request(self, req).await?;
        Ok(())
    }

    /// Upgrades this client with the given access token and verifies it with the server.
    ///
    /// On success the client is authenticated and the crab that owns the token is returned.
    pub async fn authenticate(&mut self, access_token: impl Into<String>) -> Result<Crab> {
        self.credentials = self.credentials.clone().authenticate(access_token.into());
        self.current_user().await
    }

    /// Loads the crab that owns this client's access token.
    pub async fn current_user(&self) -> Result<Crab> {
        self.credentials.require_access_token()?;
        let req = self.get(links::AUTHENTICATE, None);
        crate::common::request_with_json_response(self, req).await
    }

    /// Loads the crab with the given ID.
    pub async fn crab(&self, id: u64) -> Result<Crab> {
        crab::show(id, self).await
    }

    /// Loads the crab with the given username.
    pub async fn crab_by_username(&self, username: &str) -> Result<Crab> {
        crab::show_by_username(username, self).await
    }

    /// Loads the molt with the given ID.
    pub async fn molt(&self, id: u64) -> Result<Molt> {
        molt::show(id, self).await
    }

    /// Loads molts that use the given crabtag, newest first.
    pub async fn molts_with_crabtag(
        &self,
        crabtag: &str,
        params: &ListParams,
    ) -> Result<Vec<Molt>> {
        molt::with_crabtag(crabtag, params, self).await
    }

    /// Loads molts that explicitly mention the given username with `@username`.
    pub async fn molts_mentioning(
        &self,
        username: &str,
        params: &ListParams,
    ) -> Result<Vec<Molt>> {
        molt::mentioning(username, params, self).await
    }

    /// Loads molts that reply to molts posted by the given username.
    pub async fn molts_replying_to(
        &self,
        username: &str,
        params: &ListParams,
    ) -> Result<Vec<Molt>> {
        molt::replying_to(username, params, self).await
    }

    /// Posts a new molt with the given text content as the authenticated user.
    ///
    /// To attach an image or to post replies and quotes, use [`MoltDraft`] directly.
    pub async fn post_molt(&self, content: &str) -> Result<Molt> {
        MoltDraft::new(content.to_string()).send(self).await
    }

    /// The root URL of the target instance, without the API root. Avatar and image paths are
    /// relative to this.
    pub(crate) fn site_url(&self) -> &str {
        &self.site_root
    }

    pub(crate) fn retry(&self) -> RetryPolicy {
        self.retry
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Joins an endpoint path onto the instance's API root, normalizing the surrounding slashes.
    fn endpoint(&self, path: &str) -> String {
        let mut url = format!("{}{}", self.site_root, links::API_ROOT);
        if !path.starts_with('/') {
            url.push('/');
        }
        url.push_str(path);
        if !url.ends_with('/') {
            url.push('/');
        }
        url
    }

    /// The credential parameters attached to every request.
    fn credential_params(&self) -> ParamList {
        ParamList::new()
            .add_param("api_key", self.credentials.api_key().to_string())
            .add_opt_param(
                "access_token",
                self.credentials.access_token().map(str::to_string),
            )
    }

    pub(crate) fn get(&self, path: &str, params: Option<&ParamList>) -> RequestBuilder {
        let mut query = self.credential_params();
        if let Some(params) = params {
            query.combine(params.clone());
        }
        RequestBuilder::new(Method::GET, self.endpoint(path)).with_query_params(query)
    }

    pub(crate) fn post(&self, path: &str, form: Option<ParamList>) -> RequestBuilder {
        let builder = RequestBuilder::new(Method::POST, self.endpoint(path))
            .with_query_params(self.credential_params());
        match form {
            Some(form) => builder.with_form_params(form),
            None => builder,
        }
    }

    pub(crate) fn post_media(
        &self,
        path: &str,
        form: ParamList,
        media: MediaSource,
    ) -> RequestBuilder {
        RequestBuilder::new(Method::POST, self.endpoint(path))
            .with_query_params(self.credential_params())
            .with_media(form, media)
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        RequestBuilder::new(Method::DELETE, self.endpoint(path))
            .with_query_params(self.credential_params())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> Client {
        Client::new(Credentials::developer("key"))
    }

    #[test]
    fn endpoint_normalizes_slashes() {
        let client = test_client();
        assert_eq!(
            client.endpoint("/crabs/1/"),
            "https://crabber.net/api/v1/crabs/1/"
        );
        assert_eq!(client.endpoint("molts"), "https://crabber.net/api/v1/molts/");
        assert_eq!(client.endpoint("/"), "https://crabber.net/api/v1/");
    }

    #[test]
    fn custom_trims_trailing_slash() {
        let client = Client::custom(Credentials::developer("key"), "http://localhost:5000/")
            .unwrap();
        assert_eq!(client.site_url(), "http://localhost:5000");
        assert_eq!(
            client.endpoint("/authenticate/"),
            "http://localhost:5000/api/v1/authenticate/"
        );
    }

    #[test]
    fn custom_rejects_bad_urls() {
        assert!(Client::custom(Credentials::developer("key"), "crabber.net:80").is_err());
        assert!(Client::custom(Credentials::developer("key"), "ftp://crabber.net").is_err());
    }

    #[test]
    fn credential_params_omit_missing_token() {
        let client = test_client();
        let params = client.credential_params();
        assert_eq!(params.get("api_key").map(|v| v.as_ref()), Some("key"));
        assert!(params.get("access_token").is_none());

        let client = Client::new(Credentials::access("key", "token"));
        let params = client.credential_params();
        assert_eq!(params.get("access_token").map(|v| v.as_ref()), Some("token"));
    }

    #[tokio::test]
    async fn exhausted_retries_surface_max_tries() {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        // A loopback server that answers every request with a 429.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            for _ in 0..3 {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                stream
                    .write_all(
                        b"HTTP/1.1 429 Too Many Requests\r\n\
                          content-length: 0\r\nconnection: close\r\n\r\n",
                    )
                    .unwrap();
            }
        });

        let client =
            Client::custom(Credentials::developer("key"), &format!("http://{}", addr))
                .unwrap()
                .retry_policy(RetryPolicy {
                    max_tries: 3,
                    backoff: Duration::from_millis(1),
                });

        match client.ping().await {
            Err(crate::error::Error::MaxTriesReached(tries)) => assert_eq!(tries, 3),
            other => panic!("unexpected result: {:?}", other),
        }

        // Exactly max_tries requests reached the server.
        server.join().unwrap();
    }

    #[tokio::test]
    async fn current_user_requires_token() {
        match test_client().current_user().await {
            Err(crate::error::Error::AuthenticationRequired) => (),
            other => panic!("unexpected result: {:?}", other.map(|c| c.id)),
        }
    }
}
