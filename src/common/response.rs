// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Infrastructure functions that all web calls go through: the ones that send a request, apply
//! the retry budget, and translate an unhappy status code into the right [`Error`] variant.

use hyper::StatusCode;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::auth::raw::RequestBuilder;
use crate::client::Client;
use crate::error::{Error, Result};

/// Sends the given request and returns the response body as text.
///
/// Transient failures (HTTP 429 and server errors) are retried according to the client's
/// [`RetryPolicy`][crate::RetryPolicy]; everything else resolves immediately. The request is
/// rebuilt from the `RequestBuilder` for every attempt.
pub(crate) async fn raw_request(client: &Client, req: RequestBuilder) -> Result<String> {
    let policy = client.retry();
    let mut tries = 0u32;

    loop {
        tries += 1;

        let response = client.http().request(req.build()?).await?;
        let status = response.status();
        let buf = hyper::body::to_bytes(response.into_body()).await?;
        let body = String::from_utf8_lossy(&buf).into_owned();

        if status.is_success() {
            return Ok(body);
        }

        match status {
            StatusCode::NOT_FOUND => return Err(Error::NotFound),
            StatusCode::UNAUTHORIZED => return Err(Error::AuthenticationRequired),
            s if s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error() => {
                if tries < policy.max_tries {
                    tokio::time::sleep(policy.backoff * tries).await;
                } else {
                    return Err(Error::MaxTriesReached(tries));
                }
            }
            s if s.is_client_error() => {
                return Err(Error::ApiError(server_message(&body)));
            }
            s => return Err(Error::BadStatus(s)),
        }
    }
}

/// Sends the given request and deserializes the JSON response body into the target type.
pub(crate) async fn request_with_json_response<T: DeserializeOwned>(
    client: &Client,
    req: RequestBuilder,
) -> Result<T> {
    let full_resp = raw_request(client, req).await?;
    Ok(serde_json::from_str(&full_resp)?)
}

/// Extracts a human-readable message from an error response body.
///
/// The API usually answers with a JSON object carrying an `error` (or `message`) field, but some
/// failures are served as an HTML error page with the summary in its `<title>` and `<p>` tags.
/// Falls back to the raw body when neither shape matches.
fn server_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiMessage {
        error: Option<String>,
        message: Option<String>,
    }

    if let Ok(msg) = serde_json::from_str::<ApiMessage>(body) {
        if let Some(text) = msg.error.or(msg.message) {
            return text;
        }
    }

    lazy_static::lazy_static! {
        static ref ERROR_PAGE: Regex =
            Regex::new(r"<title>([^<]+)</title>(?s:.)+?<p>([^<]+)</p>").unwrap();
    }
    if let Some(caps) = ERROR_PAGE.captures(body) {
        return format!("{}: {}", &caps[1], &caps[2]);
    }

    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::server_message;

    #[test]
    fn message_from_json() {
        assert_eq!(
            server_message(r#"{"error": "Molt content is required."}"#),
            "Molt content is required."
        );
        assert_eq!(
            server_message(r#"{"message": "This user has blocked you."}"#),
            "This user has blocked you."
        );
    }

    #[test]
    fn message_from_error_page() {
        let page = "<html><head><title>400 Bad Request</title></head>\
                    <body><h1>Bad Request</h1>\
                    <p>The browser (or proxy) sent a request that this server could not \
                    understand.</p></body></html>";
        assert_eq!(
            server_message(page),
            "400 Bad Request: The browser (or proxy) sent a request that this server could not \
             understand."
        );
    }

    #[test]
    fn message_fallback_raw() {
        assert_eq!(server_message("  not json at all  "), "not json at all");
        assert_eq!(server_message("{}"), "{}");
    }
}
