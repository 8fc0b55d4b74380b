// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::client::Client;
use crate::common::{raw_request, request_with_json_response};
use crate::cursor::{CrabPage, MoltPage, PageIter};
use crate::error::{Error, Result};
use crate::links;
use crate::molt::{molt_list, ListParams, Molt};

use super::{Bio, BioUpdate, Crab};

/// Lookup a single crab by numeric ID.
pub async fn show(id: u64, client: &Client) -> Result<Crab> {
    let req = client.get(&links::crabs::show(id), None);
    request_with_json_response(client, req).await
}

/// Lookup a single crab by username.
pub async fn show_by_username(username: &str, client: &Client) -> Result<Crab> {
    let req = client.get(&links::crabs::by_username(username), None);
    request_with_json_response(client, req).await
}

/// Load the bio of the crab with the given ID.
pub async fn bio_of(id: u64, client: &Client) -> Result<Bio> {
    let req = client.get(&links::crabs::bio(id), None);
    let crab: Crab = request_with_json_response(client, req).await?;
    crab.bio
        .ok_or(Error::InvalidResponse("bio missing from bio endpoint response"))
}

/// Rewrite the authenticated user's bio.
///
/// The given `id` must be the authenticated user's own; the server rejects updates to anyone
/// else's bio. Returns the crab with the updated bio attached.
pub async fn update_bio(id: u64, update: &BioUpdate, client: &Client) -> Result<Crab> {
    client.credentials().require_access_token()?;
    let req = client.post(&links::crabs::bio(id), Some(update.to_params()));
    request_with_json_response(client, req).await
}

/// Follow the given crab as the authenticated user.
pub async fn follow(id: u64, client: &Client) -> Result<()> {
    client.credentials().require_access_token()?;
    let req = client.post(&links::crabs::follow(id), None);
    raw_request(client, req).await?;
    Ok(())
}

/// Unfollow the given crab as the authenticated user.
pub async fn unfollow(id: u64, client: &Client) -> Result<()> {
    client.credentials().require_access_token()?;
    let req = client.post(&links::crabs::unfollow(id), None);
    raw_request(client, req).await?;
    Ok(())
}

/// Make a stream over every crab that follows the given crab.
pub fn followers_of(id: u64, client: &Client) -> PageIter<'_, CrabPage> {
    PageIter::new(links::crabs::followers(id), client)
}

/// Make a stream over every crab the given crab follows.
pub fn following_of(id: u64, client: &Client) -> PageIter<'_, CrabPage> {
    PageIter::new(links::crabs::following(id), client)
}

/// Make a stream over the given crab's bookmarked molts, in descending order of the time at
/// which they were bookmarked.
pub fn bookmarks_of(id: u64, client: &Client) -> PageIter<'_, MoltPage> {
    PageIter::new(links::crabs::bookmarks(id), client)
}

/// Load molts posted by the given crab, newest first.
pub async fn molts_of(id: u64, params: &ListParams, client: &Client) -> Result<Vec<Molt>> {
    molt_list(links::crabs::molts(id), params, client).await
}
