// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Internal mechanisms for assembling authenticated requests.
//!
//! A [`RequestBuilder`] owns everything needed to produce a `hyper::Request`: the method, the
//! full URL, the query parameters (which the client seeds with the credentials), and the body, if
//! any. Ownership matters here because the retry loop in `common::response` may need to issue the
//! same request several times, and a `hyper::Request` can only be sent once; `build()` can be
//! called repeatedly to mint a fresh request for each attempt.

use hyper::header::CONTENT_TYPE;
use hyper::{Body, Method, Request};
use rand::Rng;

use crate::common::ParamList;
use crate::error::Result;
use crate::media::MediaSource;

/// An owned, re-buildable description of a single API request.
pub(crate) struct RequestBuilder {
    method: Method,
    url: String,
    params: ParamList,
    body: RequestBody,
}

enum RequestBody {
    Empty,
    Form(ParamList),
    Multipart {
        form: ParamList,
        media: MediaSource,
        boundary: String,
    },
}

impl RequestBuilder {
    pub(crate) fn new(method: Method, url: String) -> Self {
        RequestBuilder {
            method,
            url,
            params: ParamList::new(),
            body: RequestBody::Empty,
        }
    }

    /// Appends the given parameters to the request's query string.
    pub(crate) fn with_query_params(mut self, params: ParamList) -> Self {
        self.params.combine(params);
        self
    }

    /// Attaches the given parameters as an `application/x-www-form-urlencoded` body.
    pub(crate) fn with_form_params(self, form: ParamList) -> Self {
        RequestBuilder {
            body: RequestBody::Form(form),
            ..self
        }
    }

    /// Attaches the given form fields and image as a `multipart/form-data` body.
    ///
    /// The image travels in a part named `image`, as the upload endpoints expect.
    pub(crate) fn with_media(self, form: ParamList, media: MediaSource) -> Self {
        RequestBuilder {
            body: RequestBody::Multipart {
                form,
                media,
                boundary: boundary(),
            },
            ..self
        }
    }

    /// Mints a `hyper::Request` from this description. May be called once per retry attempt.
    pub(crate) fn build(&self) -> Result<Request<Body>> {
        let full_url = if self.params.is_empty() {
            self.url.clone()
        } else {
            format!("{}?{}", self.url, self.params.to_urlencoded())
        };

        let request = Request::builder().method(self.method.clone()).uri(full_url);

        let request = match &self.body {
            RequestBody::Empty => request.body(Body::empty())?,
            RequestBody::Form(form) => request
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_urlencoded()))?,
            RequestBody::Multipart {
                form,
                media,
                boundary,
            } => request
                .header(
                    CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(multipart_body(form, media, boundary)))?,
        };

        Ok(request)
    }
}

/// Generates a random boundary token for a multipart body.
fn boundary() -> String {
    let mut rng = rand::thread_rng();
    let token: String = std::iter::repeat(())
        .map(|()| rng.sample(rand::distributions::Alphanumeric))
        .map(char::from)
        .take(24)
        .collect();
    format!("crabber{}", token)
}

/// Renders form fields and an image into a `multipart/form-data` body.
fn multipart_body(form: &ParamList, media: &MediaSource, boundary: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(media.data.len() + 512);

    for (key, value) in form.iter() {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                boundary, key, value
            )
            .as_bytes(),
        );
    }

    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\n\
             Content-Type: {}\r\n\r\n",
            boundary, media.filename, media.mime
        )
        .as_bytes(),
    );
    body.extend_from_slice(&media.data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_in_uri() {
        let builder = RequestBuilder::new(Method::GET, "https://crabber.net/api/v1/".to_string())
            .with_query_params(ParamList::new().add_param("api_key", "sekrit"));
        let request = builder.build().unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request.uri().query(),
            Some("api_key=sekrit"),
            "credentials should travel in the query string"
        );

        // A builder can mint more than one request.
        let again = builder.build().unwrap();
        assert_eq!(again.uri(), request.uri());
    }

    #[test]
    fn form_body_sets_content_type() {
        let builder =
            RequestBuilder::new(Method::POST, "https://crabber.net/api/v1/molts/".to_string())
                .with_form_params(ParamList::new().add_param("content", "hello"));
        let request = builder.build().unwrap();

        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn multipart_layout() {
        let media = MediaSource::from_bytes(vec![0xff, 0xd8, 0xff], "photo.jpg");
        let form = ParamList::new().add_param("content", "check this out");
        let body = multipart_body(&form, &media, "crabberBOUNDARY");
        let text = String::from_utf8_lossy(&body);

        assert!(text.starts_with("--crabberBOUNDARY\r\n"));
        assert!(text.contains("Content-Disposition: form-data; name=\"content\""));
        assert!(text.contains("name=\"image\"; filename=\"photo.jpg\""));
        assert!(text.contains("Content-Type: image/jpeg"));
        assert!(text.ends_with("\r\n--crabberBOUNDARY--\r\n"));
    }

    #[test]
    fn boundaries_are_unique() {
        assert_ne!(boundary(), boundary());
    }
}
