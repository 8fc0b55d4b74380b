// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Set of structs and methods that act as a sort of internal prelude.
//!
//! The elements in this module are the basic building blocks the other modules glob-import to
//! make available as a common language: the `ParamList` used to assemble query strings and form
//! bodies, the percent-encoding helper that backs it, and the functions in `response` that
//! actually drive a request over the network and translate failures.

use std::borrow::Cow;
use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode};

pub(crate) mod response;

pub(crate) use self::response::{raw_request, request_with_json_response};

pub type CowStr = Cow<'static, str>;

/// Represents a list of parameters to a Crabber API call.
///
/// This type is a wrapper around a `HashMap<Cow<'static, str>, Cow<'static, str>>` to collect a
/// set of parameter key/value pairs, used both for query strings and for
/// `application/x-www-form-urlencoded` bodies. The `Cow` type is used to avoid having to allocate
/// a `String` if a string literal is used for a parameter. The functions that add parameters
/// accept `impl Into<Cow<'static, str>>`, meaning that either a string literal or an owned
/// `String` may be used.
///
/// The functions to add parameters follow a builder pattern, so that a `ParamList` can be
/// assembled in a single statement.
#[derive(Debug, Clone, Default, derive_more::Deref, derive_more::DerefMut, derive_more::From)]
pub struct ParamList(HashMap<Cow<'static, str>, Cow<'static, str>>);

impl ParamList {
    /// Creates a new, empty `ParamList`.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Adds the given key/value parameter to this `ParamList`.
    pub fn add_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.insert(key.into(), value.into());
        self
    }

    /// Adds the given key/value parameter to this `ParamList` only if the given value is `Some`.
    ///
    /// If the given value is `None`, the `ParamList` is returned unmodified.
    pub fn add_opt_param(
        self,
        key: impl Into<Cow<'static, str>>,
        value: Option<impl Into<Cow<'static, str>>>,
    ) -> Self {
        match value {
            Some(val) => self.add_param(key.into(), val.into()),
            None => self,
        }
    }

    /// Merge the parameters from the given `ParamList` into this one.
    pub(crate) fn combine(&mut self, other: ParamList) {
        self.0.extend(other.0);
    }

    /// Renders this `ParamList` as an `application/x-www-form-urlencoded` string.
    ///
    /// The key/value pairs are printed as `key1=value1&key2=value2`, with all keys and values
    /// being percent-encoded.
    pub fn to_urlencoded(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

// Helper trait to stringify the contents of an Option
pub(crate) trait MapString {
    fn map_string(&self) -> Option<String>;
}

impl<T: std::fmt::Display> MapString for Option<T> {
    fn map_string(&self) -> Option<String> {
        self.as_ref().map(|v| v.to_string())
    }
}

/// Percent-encodes the given string slice for transmission in a query string or form body.
///
/// The scheme is the one from RFC 3986, Section 2.1: every *byte* that is not an ASCII number or
/// letter, or one of the ASCII characters `-`, `.`, `_`, or `~`, is replaced with a percent sign
/// (`%`) and the byte value in hexadecimal.
pub fn percent_encode(src: &str) -> PercentEncode<'_> {
    lazy_static::lazy_static! {
        static ref ENCODER: AsciiSet = percent_encoding::NON_ALPHANUMERIC
            .remove(b'-')
            .remove(b'.')
            .remove(b'_')
            .remove(b'~');
    }
    utf8_percent_encode(src, &*ENCODER)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Read;

    pub(crate) fn load_file(path: &str) -> String {
        let mut file = File::open(path).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn encode_reserved_bytes() {
        assert_eq!(percent_encode("hello world").to_string(), "hello%20world");
        assert_eq!(percent_encode("a-b.c_d~e").to_string(), "a-b.c_d~e");
        assert_eq!(percent_encode("100%").to_string(), "100%25");
    }

    #[test]
    fn urlencoded_pairs() {
        let params = ParamList::new().add_param("limit", "10");
        assert_eq!(params.to_urlencoded(), "limit=10");

        let params = params.add_param("since_id", "42");
        let encoded = params.to_urlencoded();
        // HashMap ordering is unspecified, so check the pieces instead of the whole.
        assert!(encoded.contains("limit=10"));
        assert!(encoded.contains("since_id=42"));
        assert_eq!(encoded.matches('&').count(), 1);
    }

    #[test]
    fn opt_param_skips_none() {
        let params = ParamList::new()
            .add_opt_param("since", None::<String>)
            .add_opt_param("offset", Some("20"));
        assert!(params.get("since").is_none());
        assert_eq!(params.get("offset").map(|v| v.as_ref()), Some("20"));
    }

    #[test]
    fn map_string_stringifies() {
        assert_eq!(Some(42u64).map_string(), Some("42".to_string()));
        assert_eq!(None::<u64>.map_string(), None);
    }
}
