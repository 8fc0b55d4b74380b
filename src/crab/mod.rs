// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structs and functions for working with crabs, the accounts on a Crabber instance.
//!
//! ## Types
//!
//! - [`Crab`]: a single account, as deserialized from the server. Nothing is cached; a `Crab` is
//!   a snapshot from the moment it was loaded, and re-fetching is the only way to observe
//!   updates.
//! - [`Bio`]: the profile metadata attached to a crab. Lists of crabs (follower pages, embedded
//!   molt authors) usually arrive without one; [`bio_of`] fetches it explicitly.
//! - [`BioUpdate`]: a builder for rewriting the authenticated user's bio via [`update_bio`].
//!
//! ## Functions
//!
//! ### Lookup
//!
//! - [`show`] / [`show_by_username`] / [`bio_of`]
//! - [`molts_of`]: molts posted by a crab, with a [`ListParams`] filter.
//! - [`followers_of`] / [`following_of`] / [`bookmarks_of`]: paginated
//!   [`PageIter`][crate::cursor::PageIter] streams.
//!
//! ### User actions
//!
//! These require an access token on the client's credentials.
//!
//! - [`follow`] / [`unfollow`]
//! - [`update_bio`]
//!
//! Each of these is also available as a method on [`Crab`] for when you already hold one.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::client::Client;
use crate::common::{MapString, ParamList};
use crate::cursor::{CrabPage, MoltPage, PageIter};
use crate::error::Result;
use crate::molt::{self, ListParams, Molt};

mod fun;

pub use self::fun::*;

/// Represents a Crabber account.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Crab {
    /// Unique identifier for this crab. Assigned by the server and immutable.
    pub id: u64,
    /// The unique handle identifying this crab, without the leading `@`.
    pub username: String,
    /// The user-entered display name. Display names don't have to be unique and can include
    /// spaces, emoji, and really any Unicode characters.
    pub display_name: String,
    /// Whether this crab is a verified account.
    pub verified: bool,
    /// The path to this crab's avatar image, relative to the instance's base URL. Use
    /// [`avatar_url`][Crab::avatar_url] for a full URL.
    pub avatar: String,
    /// The UTC timestamp for when this account was registered.
    #[serde(rename = "register_time", with = "chrono::serde::ts_seconds")]
    pub registered_at: DateTime<Utc>,
    /// The number of followers this crab has.
    #[serde(rename = "followers", default)]
    pub follower_count: i32,
    /// The number of crabs this crab follows.
    #[serde(rename = "following", default)]
    pub following_count: i32,
    /// This crab's bio, when the endpoint includes it. Most listings leave it out; see
    /// [`bio_of`] for an explicit fetch.
    #[serde(default)]
    pub bio: Option<Bio>,
}

impl Crab {
    /// The full URL of this crab's avatar image on its home instance.
    pub fn avatar_url(&self, client: &Client) -> String {
        format!("{}{}", client.site_url(), self.avatar)
    }

    /// Loads this crab's bio from the server.
    pub async fn fetch_bio(&self, client: &Client) -> Result<Bio> {
        bio_of(self.id, client).await
    }

    /// Follow this crab as the authenticated user.
    pub async fn follow(&self, client: &Client) -> Result<()> {
        fun::follow(self.id, client).await
    }

    /// Unfollow this crab as the authenticated user.
    pub async fn unfollow(&self, client: &Client) -> Result<()> {
        fun::unfollow(self.id, client).await
    }

    /// A stream over every crab that follows this one.
    pub fn followers<'a>(&self, client: &'a Client) -> PageIter<'a, CrabPage> {
        followers_of(self.id, client)
    }

    /// A stream over every crab this one follows.
    pub fn following<'a>(&self, client: &'a Client) -> PageIter<'a, CrabPage> {
        following_of(self.id, client)
    }

    /// A stream over this crab's bookmarked molts, most recently bookmarked first.
    pub fn bookmarks<'a>(&self, client: &'a Client) -> PageIter<'a, MoltPage> {
        bookmarks_of(self.id, client)
    }

    /// Loads molts posted by this crab.
    pub async fn molts(&self, params: &ListParams, client: &Client) -> Result<Vec<Molt>> {
        molts_of(self.id, params, client).await
    }

    /// Loads molts that explicitly mention this crab with `@username`.
    pub async fn mentions(&self, params: &ListParams, client: &Client) -> Result<Vec<Molt>> {
        molt::mentioning(&self.username, params, client).await
    }

    /// Loads molts that reply to any of this crab's molts.
    pub async fn replies(&self, params: &ListParams, client: &Client) -> Result<Vec<Molt>> {
        molt::replying_to(&self.username, params, client).await
    }
}

/// A crab's profile metadata. Every field is optional free text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Bio {
    pub age: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "emoji")]
    pub favorite_emoji: Option<String>,
    /// What this crab is currently listening to.
    pub jam: Option<String>,
    pub location: Option<String>,
    pub obsession: Option<String>,
    pub pronouns: Option<String>,
    pub quote: Option<String>,
    #[serde(rename = "remember")]
    pub remember_when: Option<String>,
}

/// Assembles a bio rewrite for [`update_bio`].
///
/// Only the fields you set are sent; the server clears the rest, matching how the bio form on
/// the website behaves.
#[derive(Debug, Clone, Default)]
pub struct BioUpdate {
    age: Option<String>,
    description: Option<String>,
    favorite_emoji: Option<String>,
    jam: Option<String>,
    location: Option<String>,
    obsession: Option<String>,
    pronouns: Option<String>,
    quote: Option<String>,
    remember_when: Option<String>,
}

impl BioUpdate {
    /// Creates an empty update.
    pub fn new() -> BioUpdate {
        BioUpdate::default()
    }

    pub fn age(mut self, age: impl Into<String>) -> Self {
        self.age = Some(age.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn favorite_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.favorite_emoji = Some(emoji.into());
        self
    }

    pub fn jam(mut self, jam: impl Into<String>) -> Self {
        self.jam = Some(jam.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn obsession(mut self, obsession: impl Into<String>) -> Self {
        self.obsession = Some(obsession.into());
        self
    }

    pub fn pronouns(mut self, pronouns: impl Into<String>) -> Self {
        self.pronouns = Some(pronouns.into());
        self
    }

    pub fn quote(mut self, quote: impl Into<String>) -> Self {
        self.quote = Some(quote.into());
        self
    }

    pub fn remember_when(mut self, remember: impl Into<String>) -> Self {
        self.remember_when = Some(remember.into());
        self
    }

    /// Renders the update as the form fields the bio endpoint expects.
    pub(crate) fn to_params(&self) -> ParamList {
        ParamList::new()
            .add_opt_param("age", self.age.map_string())
            .add_opt_param("description", self.description.map_string())
            .add_opt_param("emoji", self.favorite_emoji.map_string())
            .add_opt_param("jam", self.jam.map_string())
            .add_opt_param("location", self.location.map_string())
            .add_opt_param("obsession", self.obsession.map_string())
            .add_opt_param("pronouns", self.pronouns.map_string())
            .add_opt_param("quote", self.quote.map_string())
            .add_opt_param("remember", self.remember_when.map_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tests::load_file;
    use chrono::{Datelike, TimeZone};

    fn load_crab(path: &str) -> Crab {
        let content = load_file(path);
        serde_json::from_str::<Crab>(&content).unwrap()
    }

    #[test]
    fn parse_basic() {
        let sample = load_crab("src/crab/sample-crab.json");

        assert_eq!(sample.id, 1);
        assert_eq!(sample.username, "jake");
        assert_eq!(sample.display_name, "Jake L.");
        assert!(sample.verified);
        assert_eq!(sample.avatar, "/static/img/user_uploads/jake-avatar.jpg");
        assert_eq!(sample.follower_count, 128);
        assert_eq!(sample.following_count, 54);
        assert_eq!(sample.registered_at, Utc.timestamp_opt(1591401600, 0).unwrap());
        assert_eq!(sample.registered_at.year(), 2020);

        let bio = sample.bio.expect("sample carries a bio");
        assert_eq!(bio.favorite_emoji.as_deref(), Some("🦀"));
        assert_eq!(bio.pronouns.as_deref(), Some("he/him"));
        assert_eq!(bio.age, None);
    }

    #[test]
    fn parse_is_idempotent() {
        // Two loads of the same payload compare equal, field for field.
        let first = load_crab("src/crab/sample-crab.json");
        let second = load_crab("src/crab/sample-crab.json");
        assert_eq!(first, second);
    }

    #[test]
    fn parse_without_bio_or_counts() {
        // Embedded authors come without bio or relationship counts.
        let sample: Crab = serde_json::from_str(
            r#"{"id": 3, "username": "molty", "display_name": "Molty",
                "verified": false, "avatar": "/static/img/default-avatar.png",
                "register_time": 1591401600}"#,
        )
        .unwrap();

        assert_eq!(sample.bio, None);
        assert_eq!(sample.follower_count, 0);
        assert_eq!(sample.following_count, 0);
    }

    #[test]
    fn bio_update_uses_server_field_names() {
        let params = BioUpdate::new()
            .favorite_emoji("🦀")
            .remember_when("when the site was new")
            .jam("crab rave")
            .to_params();

        assert_eq!(params.get("emoji").map(|v| v.as_ref()), Some("🦀"));
        assert_eq!(
            params.get("remember").map(|v| v.as_ref()),
            Some("when the site was new")
        );
        assert_eq!(params.get("jam").map(|v| v.as_ref()), Some("crab rave"));
        assert!(params.get("age").is_none());
        assert_eq!(params.len(), 3);
    }
}
