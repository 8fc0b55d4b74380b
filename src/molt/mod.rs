// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structs and functions for working with molts, the posts on a Crabber instance.
//!
//! ## Types
//!
//! - [`Molt`]: a single post. Like everything else in this crate it is a plain snapshot of the
//!   server's response; counts and flags go stale the moment they arrive.
//! - [`MoltDraft`]: what you use to post. A draft holds the text content and an optional image,
//!   and can be sent as a fresh molt, as a reply, or as a quote.
//! - [`ListParams`]: the limit/offset/since filter accepted by every listing function.
//!
//! ## Functions
//!
//! ### Lookup
//!
//! - [`show`] and [`replies_of`] for single molts and their reply threads.
//! - [`with_crabtag`], [`mentioning`], [`replying_to`] for instance-wide listings. The server
//!   caps these at 50 entries per call; page with [`ListParams::offset`].
//!
//! ### User actions
//!
//! These require an access token on the client's credentials and fail with
//! [`Error::AuthenticationRequired`][crate::error::Error::AuthenticationRequired] before any
//! network call otherwise.
//!
//! - posting, via [`MoltDraft`]
//! - [`like`]/[`unlike`], [`bookmark`]/[`unbookmark`], [`remolt`]/[`unremolt`]
//! - [`edit`] (within the five-minute window) and [`delete`]

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::client::Client;
use crate::common::{MapString, ParamList};
use crate::crab::Crab;
use crate::error::Result;
use crate::media::MediaSource;

mod fun;

pub use self::fun::*;

/// The maximum number of characters a molt's content may hold.
pub const MOLT_CHARACTER_LIMIT: usize = 280;

/// How long a molt stays editable after it is posted. Edit requests received by the server after
/// this window are rejected.
const EDIT_WINDOW_MINUTES: i64 = 5;

/// Represents a single Crabber post.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Molt {
    /// Unique identifier for this molt. Assigned by the server and immutable; IDs are assigned
    /// in ascending order, which is what makes [`ListParams::since_id`] filters work.
    pub id: u64,
    /// The crab who posted this molt.
    pub author: Crab,
    /// The text content of this molt.
    pub content: String,
    /// The crabtags used in this molt, without the leading `%`.
    #[serde(default)]
    pub crabtags: Vec<String>,
    /// The usernames explicitly mentioned in this molt, without the leading `@`.
    #[serde(default)]
    pub mentions: Vec<String>,
    /// The UTC timestamp from when this molt was posted.
    #[serde(rename = "timestamp", with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    /// Whether this molt has been edited since it was posted.
    pub edited: bool,
    /// The path to the image attached to this molt, if any, relative to the instance's base URL.
    /// Use [`image_url`][Molt::image_url] for a full URL.
    pub image: Option<String>,
    /// The number of likes this molt has.
    #[serde(default)]
    pub likes: i32,
    /// The number of molts that quote this molt.
    #[serde(default)]
    pub quotes: i32,
    /// The number of remolts this molt has.
    #[serde(default)]
    pub remolts: i32,
    /// If this molt quotes another, the ID of the quoted molt.
    pub quoted_molt: Option<u64>,
    /// If this molt is a reply, the ID of the molt it replies to.
    pub replying_to: Option<u64>,
}

impl Molt {
    /// Whether this molt is a reply to another molt.
    pub fn is_reply(&self) -> bool {
        self.replying_to.is_some()
    }

    /// Whether this molt quotes another molt.
    pub fn is_quote(&self) -> bool {
        self.quoted_molt.is_some()
    }

    /// Whether this molt is still within its edit window.
    ///
    /// Molts are editable for the first five minutes after they are posted; this is judged
    /// against the local clock, so a request right at the boundary may still be rejected by the
    /// server.
    pub fn editable(&self) -> bool {
        Utc::now().signed_duration_since(self.created_at)
            < Duration::minutes(EDIT_WINDOW_MINUTES)
    }

    /// The full URL of the image attached to this molt, if any.
    pub fn image_url(&self, client: &Client) -> Option<String> {
        self.image
            .as_ref()
            .map(|path| format!("{}{}", client.site_url(), path))
    }

    /// Loads the molt this one replies to, if this molt is a reply.
    pub async fn replied_molt(&self, client: &Client) -> Result<Option<Molt>> {
        match self.replying_to {
            Some(id) => show(id, client).await.map(Some),
            None => Ok(None),
        }
    }

    /// Loads the molt this one quotes, if this molt is a quote.
    pub async fn original_molt(&self, client: &Client) -> Result<Option<Molt>> {
        match self.quoted_molt {
            Some(id) => show(id, client).await.map(Some),
            None => Ok(None),
        }
    }

    /// Loads the molts that reply to this one.
    pub async fn get_replies(&self, params: &ListParams, client: &Client) -> Result<Vec<Molt>> {
        replies_of(self.id, params, client).await
    }

    /// Like this molt as the authenticated user.
    pub async fn like(&self, client: &Client) -> Result<()> {
        fun::like(self.id, client).await
    }

    /// Take back a like of this molt as the authenticated user.
    pub async fn unlike(&self, client: &Client) -> Result<()> {
        fun::unlike(self.id, client).await
    }

    /// Bookmark this molt as the authenticated user.
    pub async fn bookmark(&self, client: &Client) -> Result<()> {
        fun::bookmark(self.id, client).await
    }

    /// Remove this molt from the authenticated user's bookmarks.
    pub async fn unbookmark(&self, client: &Client) -> Result<()> {
        fun::unbookmark(self.id, client).await
    }

    /// Remolt this molt as the authenticated user.
    pub async fn remolt(&self, client: &Client) -> Result<()> {
        fun::remolt(self.id, client).await
    }

    /// Take back the authenticated user's remolt of this molt.
    pub async fn unremolt(&self, client: &Client) -> Result<()> {
        fun::unremolt(self.id, client).await
    }

    /// Delete this molt. The authenticated user must be its author.
    pub async fn delete(&self, client: &Client) -> Result<()> {
        fun::delete(self.id, client).await
    }

    /// Replace this molt's content. The authenticated user must be its author, and the molt must
    /// still be within its edit window.
    pub async fn edit(&self, content: &str, client: &Client) -> Result<Molt> {
        fun::edit(self.id, Some(content), None, client).await
    }

    /// Post a reply to this molt as the authenticated user.
    pub async fn reply(&self, content: &str, client: &Client) -> Result<Molt> {
        MoltDraft::new(content).reply_to(self.id, client).await
    }

    /// Post a quote of this molt as the authenticated user.
    pub async fn quote(&self, content: &str, client: &Client) -> Result<Molt> {
        MoltDraft::new(content).quote(self.id, client).await
    }
}

/// A molt that is ready to be posted.
///
/// Drafts can be sent as a fresh molt with [`send`][MoltDraft::send], as a reply with
/// [`reply_to`][MoltDraft::reply_to], or as a quote with [`quote`][MoltDraft::quote]. The
/// content is validated (non-empty, within [`MOLT_CHARACTER_LIMIT`]) and the credentials are
/// checked for an access token before anything goes over the network.
///
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), crabber::error::Error> {
/// # let client = crabber::Client::new(crabber::Credentials::access("KEY", "TOKEN"));
/// use crabber::{MediaSource, MoltDraft};
///
/// let posted = MoltDraft::new("look at this crab")
///     .media(MediaSource::from_file("crab.jpg")?)
///     .send(&client)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MoltDraft {
    /// The text content to post.
    pub content: String,
    /// The image to attach, if any.
    pub media: Option<MediaSource>,
}

impl MoltDraft {
    /// Creates a new draft with the given text content.
    pub fn new(content: impl Into<String>) -> MoltDraft {
        MoltDraft {
            content: content.into(),
            media: None,
        }
    }

    /// Attaches an image to this draft.
    pub fn media(mut self, media: MediaSource) -> MoltDraft {
        self.media = Some(media);
        self
    }

    /// Post this draft as a new molt by the authenticated user.
    pub async fn send(&self, client: &Client) -> Result<Molt> {
        post_draft(self, crate::links::molts::CREATE.to_string(), client).await
    }

    /// Post this draft as a reply to the molt with the given ID.
    pub async fn reply_to(&self, id: u64, client: &Client) -> Result<Molt> {
        post_draft(self, crate::links::molts::reply(id), client).await
    }

    /// Post this draft as a quote of the molt with the given ID.
    pub async fn quote(&self, id: u64, client: &Client) -> Result<Molt> {
        post_draft(self, crate::links::molts::quote(id), client).await
    }
}

/// The filter accepted by every molt listing call.
///
/// All fields are optional; the server defaults to the 10 newest entries and caps `limit` at 50.
/// `since_id` is the one to reach for when polling for new activity: remember the largest ID you
/// have processed and pass it on the next call to receive only strictly newer molts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListParams {
    /// The maximum number of results to return.
    pub limit: Option<u32>,
    /// How many molts to skip before applying the limit.
    pub offset: Option<u32>,
    /// Only return molts posted after this UTC timestamp.
    pub since: Option<i64>,
    /// Only return molts whose ID is strictly greater than this.
    pub since_id: Option<u64>,
}

impl ListParams {
    /// Creates an empty filter, deferring to the server's defaults.
    pub fn new() -> ListParams {
        ListParams::default()
    }

    /// Sets the maximum number of results to return.
    pub fn limit(mut self, limit: u32) -> ListParams {
        self.limit = Some(limit);
        self
    }

    /// Sets how many molts to skip before applying the limit.
    pub fn offset(mut self, offset: u32) -> ListParams {
        self.offset = Some(offset);
        self
    }

    /// Only return molts posted after the given time.
    pub fn since(mut self, since: DateTime<Utc>) -> ListParams {
        self.since = Some(since.timestamp());
        self
    }

    /// Only return molts whose ID is strictly greater than the given one.
    pub fn since_id(mut self, since_id: u64) -> ListParams {
        self.since_id = Some(since_id);
        self
    }

    pub(crate) fn to_params(&self) -> ParamList {
        ParamList::new()
            .add_opt_param("limit", self.limit.map_string())
            .add_opt_param("offset", self.offset.map_string())
            .add_opt_param("since", self.since.map_string())
            .add_opt_param("since_id", self.since_id.map_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tests::load_file;
    use chrono::TimeZone;

    fn load_molt(path: &str) -> Molt {
        let content = load_file(path);
        serde_json::from_str::<Molt>(&content).unwrap()
    }

    pub(crate) fn sample_author() -> Crab {
        Crab {
            id: 1,
            username: "jake".to_string(),
            display_name: "Jake L.".to_string(),
            verified: false,
            avatar: "/static/img/avatar.jpg".to_string(),
            registered_at: Utc.timestamp_opt(1591401600, 0).unwrap(),
            follower_count: 0,
            following_count: 0,
            bio: None,
        }
    }

    pub(crate) fn sample_molt(id: u64) -> Molt {
        Molt {
            id,
            author: sample_author(),
            content: format!("molt number {}", id),
            crabtags: Vec::new(),
            mentions: Vec::new(),
            created_at: Utc.timestamp_opt(1591405200, 0).unwrap(),
            edited: false,
            image: None,
            likes: 0,
            quotes: 0,
            remolts: 0,
            quoted_molt: None,
            replying_to: None,
        }
    }

    #[test]
    fn parse_basic() {
        let sample = load_molt("src/molt/sample-molt.json");

        assert_eq!(sample.id, 1439);
        assert_eq!(
            sample.content,
            "finally got the %crabrave playlist going @clawdia"
        );
        assert_eq!(sample.author.username, "jake");
        assert_eq!(sample.crabtags, vec!["crabrave".to_string()]);
        assert_eq!(sample.mentions, vec!["clawdia".to_string()]);
        assert_eq!(sample.created_at, Utc.timestamp_opt(1591405200, 0).unwrap());
        assert_eq!(sample.likes, 12);
        assert_eq!(sample.quotes, 1);
        assert_eq!(sample.remolts, 3);
        assert!(!sample.edited);
        assert_eq!(sample.image.as_deref(), Some("/static/img/user_uploads/rave.gif"));
        assert!(!sample.is_reply());
        assert!(!sample.is_quote());
        // Posted in 2020; well past the edit window by now.
        assert!(!sample.editable());
    }

    #[test]
    fn parse_reply() {
        let sample = load_molt("src/molt/sample-reply.json");

        assert!(sample.is_reply());
        assert_eq!(sample.replying_to, Some(1439));
        assert!(!sample.is_quote());
    }

    #[test]
    fn parse_quote() {
        let sample = load_molt("src/molt/sample-quote.json");

        assert!(sample.is_quote());
        assert_eq!(sample.quoted_molt, Some(1439));
        assert_eq!(sample.replying_to, None);
    }

    #[test]
    fn fresh_molt_is_editable() {
        let molt = Molt {
            created_at: Utc::now(),
            ..sample_molt(1)
        };
        assert!(molt.editable());
    }

    #[test]
    fn draft_holds_content_verbatim() {
        let draft = MoltDraft::new("Hello, world!");
        assert_eq!(draft.content, "Hello, world!");
        assert!(draft.media.is_none());
    }

    #[test]
    fn list_params_render_only_set_fields() {
        let params = ListParams::new().limit(50).since_id(1300).to_params();

        assert_eq!(params.get("limit").map(|v| v.as_ref()), Some("50"));
        assert_eq!(params.get("since_id").map(|v| v.as_ref()), Some("1300"));
        assert!(params.get("offset").is_none());
        assert!(params.get("since").is_none());
    }

    #[test]
    fn list_params_since_renders_timestamp() {
        let since = Utc.timestamp_opt(1591405200, 0).unwrap();
        let params = ListParams::new().since(since).to_params();
        assert_eq!(params.get("since").map(|v| v.as_ref()), Some("1591405200"));
    }
}
