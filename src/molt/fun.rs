// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::Deserialize;

use crate::client::Client;
use crate::common::{raw_request, request_with_json_response, ParamList};
use crate::error::{Error, Result};
use crate::links;
use crate::media::MediaSource;

use super::{ListParams, Molt, MoltDraft, MOLT_CHARACTER_LIMIT};

/// The wrapper every molt listing endpoint serves its results in.
#[derive(Deserialize)]
struct MoltList {
    #[serde(default)]
    molts: Vec<Molt>,
}

/// Lookup a single molt by ID.
pub async fn show(id: u64, client: &Client) -> Result<Molt> {
    let req = client.get(&links::molts::show(id), None);
    request_with_json_response(client, req).await
}

/// Load the replies to the given molt, newest first.
pub async fn replies_of(id: u64, params: &ListParams, client: &Client) -> Result<Vec<Molt>> {
    molt_list(links::molts::replies(id), params, client).await
}

/// Load molts that use the given crabtag, newest first. Pass the tag without the leading `%`.
pub async fn with_crabtag(tag: &str, params: &ListParams, client: &Client) -> Result<Vec<Molt>> {
    molt_list(links::crabtag::timeline(tag), params, client).await
}

/// Load molts that explicitly mention the given username with `@username`, newest first.
pub async fn mentioning(
    username: &str,
    params: &ListParams,
    client: &Client,
) -> Result<Vec<Molt>> {
    molt_list(links::molts::mentioning(username), params, client).await
}

/// Load molts that reply to molts posted by the given username, newest first.
pub async fn replying_to(
    username: &str,
    params: &ListParams,
    client: &Client,
) -> Result<Vec<Molt>> {
    molt_list(links::molts::replying_to(username), params, client).await
}

/// Like the given molt as the authenticated user.
pub async fn like(id: u64, client: &Client) -> Result<()> {
    molt_action(links::molts::like(id), client).await
}

/// Take back a like of the given molt as the authenticated user.
pub async fn unlike(id: u64, client: &Client) -> Result<()> {
    molt_action(links::molts::unlike(id), client).await
}

/// Bookmark the given molt as the authenticated user.
pub async fn bookmark(id: u64, client: &Client) -> Result<()> {
    molt_action(links::molts::bookmark(id), client).await
}

/// Remove the given molt from the authenticated user's bookmarks.
pub async fn unbookmark(id: u64, client: &Client) -> Result<()> {
    molt_action(links::molts::unbookmark(id), client).await
}

/// Remolt the given molt as the authenticated user.
pub async fn remolt(id: u64, client: &Client) -> Result<()> {
    molt_action(links::molts::remolt(id), client).await
}

/// Take back the authenticated user's remolt of the given molt.
pub async fn unremolt(id: u64, client: &Client) -> Result<()> {
    client.credentials().require_access_token()?;
    let req = client.delete(&links::molts::remolt(id));
    raw_request(client, req).await?;
    Ok(())
}

/// Delete the given molt. The authenticated user must be its author.
pub async fn delete(id: u64, client: &Client) -> Result<()> {
    client.credentials().require_access_token()?;
    let req = client.delete(&links::molts::show(id));
    raw_request(client, req).await?;
    Ok(())
}

/// Replace the content and/or image of the given molt.
///
/// At least one of `content` and `media` must be given. The authenticated user must be the
/// molt's author, and the server only accepts edits within the first five minutes after posting
/// (see [`Molt::editable`]).
pub async fn edit(
    id: u64,
    content: Option<&str>,
    media: Option<MediaSource>,
    client: &Client,
) -> Result<Molt> {
    if content.is_none() && media.is_none() {
        return Err(Error::InvalidArgument(
            "an edit needs new content or a new image",
        ));
    }
    if let Some(content) = content {
        validate_content(content)?;
    }
    client.credentials().require_access_token()?;

    let form = ParamList::new().add_opt_param("content", content.map(str::to_string));
    let path = links::molts::edit(id);
    let req = match media {
        Some(media) => client.post_media(&path, form, media),
        None => client.post(&path, Some(form)),
    };
    request_with_json_response(client, req).await
}

/// Loads a `{"molts": [...]}` listing and applies the client-side part of the filter.
///
/// The server understands `limit`, `offset`, and `since`; `since_id` is filtered here after the
/// fact, leaning on the fact that molt IDs ascend with posting order.
pub(crate) async fn molt_list(
    path: String,
    params: &ListParams,
    client: &Client,
) -> Result<Vec<Molt>> {
    let req = client.get(&path, Some(&params.to_params()));
    let list: MoltList = request_with_json_response(client, req).await?;
    Ok(apply_since_id(list.molts, params.since_id))
}

/// Drops every molt whose ID is not strictly greater than `since_id`.
pub(crate) fn apply_since_id(molts: Vec<Molt>, since_id: Option<u64>) -> Vec<Molt> {
    match since_id {
        Some(since_id) => molts.into_iter().filter(|molt| molt.id > since_id).collect(),
        None => molts,
    }
}

pub(crate) async fn post_draft(
    draft: &MoltDraft,
    path: String,
    client: &Client,
) -> Result<Molt> {
    validate_content(&draft.content)?;
    client.credentials().require_access_token()?;

    let form = ParamList::new().add_param("content", draft.content.clone());
    let req = match &draft.media {
        Some(media) => client.post_media(&path, form, media.clone()),
        None => client.post(&path, Some(form)),
    };
    request_with_json_response(client, req).await
}

async fn molt_action(path: String, client: &Client) -> Result<()> {
    client.credentials().require_access_token()?;
    let req = client.post(&path, None);
    raw_request(client, req).await?;
    Ok(())
}

/// Checks molt content before it is sent anywhere. The limit counts characters, not bytes, so a
/// content full of emoji still gets its full 280.
fn validate_content(content: &str) -> Result<()> {
    if content.is_empty() {
        Err(Error::InvalidArgument("molt content cannot be empty"))
    } else if content.chars().count() > MOLT_CHARACTER_LIMIT {
        Err(Error::InvalidArgument(
            "molt content is over the character limit",
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::sample_molt;
    use super::*;
    use crate::auth::Credentials;

    #[tokio::test]
    async fn like_requires_token() {
        let client = Client::new(Credentials::developer("key"));
        match like(1, &client).await {
            Err(Error::AuthenticationRequired) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn posting_rejects_empty_content() {
        // Content validation fires before the credential check or any network traffic.
        let client = Client::new(Credentials::access("key", "token"));
        match MoltDraft::new("").send(&client).await {
            Err(Error::InvalidArgument(_)) => (),
            other => panic!("unexpected result: {:?}", other.map(|m| m.id)),
        }
    }

    #[tokio::test]
    async fn posting_rejects_overlong_content() {
        let client = Client::new(Credentials::access("key", "token"));
        let content = "🦀".repeat(MOLT_CHARACTER_LIMIT + 1);
        match MoltDraft::new(content).send(&client).await {
            Err(Error::InvalidArgument(_)) => (),
            other => panic!("unexpected result: {:?}", other.map(|m| m.id)),
        }
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        // 280 crab emoji are 1120 bytes but still a legal molt.
        let content = "🦀".repeat(MOLT_CHARACTER_LIMIT);
        assert!(validate_content(&content).is_ok());
    }

    #[tokio::test]
    async fn edit_requires_something_to_change() {
        let client = Client::new(Credentials::access("key", "token"));
        match edit(1, None, None, &client).await {
            Err(Error::InvalidArgument(_)) => (),
            other => panic!("unexpected result: {:?}", other.map(|m| m.id)),
        }
    }

    #[test]
    fn since_id_keeps_strictly_newer_molts() {
        let molts = vec![sample_molt(10), sample_molt(20), sample_molt(30)];

        let filtered = apply_since_id(molts.clone(), Some(20));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 30);

        let unfiltered = apply_since_id(molts, None);
        assert_eq!(unfiltered.len(), 3);
    }
}
