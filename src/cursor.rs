// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Types and traits to navigate paginated collections.
//!
//! The endpoints that return a crab's whole follower list, following list, or bookmark
//! collection serve their results in offset/limit pages, each wrapped in an envelope that also
//! reports the page's offset and the total number of entries. Much of this module can be
//! considered an implementation detail; the intended entry point is [`PageIter`], which can be
//! used as a [`Stream`] to walk every page without thinking about the envelopes:
//!
//! ```rust,no_run
//! use futures::TryStreamExt;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), crabber::error::Error> {
//! let client = crabber::Client::new(crabber::Credentials::developer("YOUR_API_KEY"));
//!
//! let mut followers = crabber::crab::followers_of(1, &client);
//! while let Some(crab) = followers.try_next().await? {
//!     println!("@{}", crab.username);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The rest of the module is available so consumers can see precisely what comes over the wire,
//! and to page through results manually with [`PageIter::call`].

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::vec;

use futures::Stream;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::client::Client;
use crate::common::{request_with_json_response, ParamList};
use crate::crab::Crab;
use crate::error::Result;
use crate::molt::Molt;

/// Trait to generalize over single-page envelopes of API results.
///
/// Types that implement `Page` are used as intermediate steps in [`PageIter`]'s `Stream`
/// implementation. Most of the time you don't need to deal with them directly, but
/// [`PageIter::call`] returns them for manual paging.
pub trait Page: DeserializeOwned {
    /// What type is being returned by the API call?
    type Item;

    /// The number of entries in this page.
    fn count(&self) -> usize;
    /// The total number of entries in the collection being paged over.
    fn total(&self) -> usize;
    /// The offset at which this page starts.
    fn offset(&self) -> usize;
    /// Unwraps the envelope, returning the entries inside.
    fn into_items(self) -> Vec<Self::Item>;
}

/// A single-page view into a list of crabs, e.g. a page of someone's followers.
#[derive(Debug, Deserialize)]
pub struct CrabPage {
    /// The number of crabs in this page.
    pub count: usize,
    /// The total number of crabs in the collection.
    pub total: usize,
    /// The offset at which this page starts.
    pub offset: usize,
    /// The crabs in this page of results.
    pub crabs: Vec<Crab>,
}

impl Page for CrabPage {
    type Item = Crab;

    fn count(&self) -> usize {
        self.count
    }

    fn total(&self) -> usize {
        self.total
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn into_items(self) -> Vec<Crab> {
        self.crabs
    }
}

/// A single-page view into a list of molts, e.g. a page of someone's bookmarks.
#[derive(Debug, Deserialize)]
pub struct MoltPage {
    /// The number of molts in this page.
    pub count: usize,
    /// The total number of molts in the collection.
    pub total: usize,
    /// The offset at which this page starts.
    pub offset: usize,
    /// The molts in this page of results.
    pub molts: Vec<Molt>,
}

impl Page for MoltPage {
    type Item = Molt;

    fn count(&self) -> usize {
        self.count
    }

    fn total(&self) -> usize {
        self.total
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn into_items(self) -> Vec<Molt> {
        self.molts
    }
}

type FuturePage<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// A restartable stream over a paginated collection.
///
/// The `Stream` implementation loads a page of results when polled and serves the individual
/// entries from that locally-held page until it runs out, then loads the next one. Errors are
/// passed straight through, and polling again after an error re-issues the failed page load, so
/// a rate-limited stream can be resumed once the window passes.
///
/// Use [`with_page_size`][PageIter::with_page_size] before consuming the stream to change how
/// many entries each network call fetches.
#[must_use = "streams are lazy and do nothing unless consumed"]
pub struct PageIter<'a, T: Page> {
    client: &'a Client,
    path: String,
    /// The number of results fetched in one network call.
    pub page_size: usize,
    offset: usize,
    total: Option<usize>,
    loader: Option<FuturePage<'a, T>>,
    items: Option<vec::IntoIter<T::Item>>,
}

impl<'a, T> PageIter<'a, T>
where
    T: Page + Send + 'a,
{
    pub(crate) fn new(path: String, client: &'a Client) -> PageIter<'a, T> {
        PageIter {
            client,
            path,
            page_size: 10,
            offset: 0,
            total: None,
            loader: None,
            items: None,
        }
    }

    /// Sets the number of results fetched in a single network call.
    ///
    /// Calling this function invalidates any current results, if any were previously loaded.
    pub fn with_page_size(self, page_size: usize) -> PageIter<'a, T> {
        PageIter {
            page_size,
            offset: 0,
            total: None,
            loader: None,
            items: None,
            ..self
        }
    }

    /// Loads the page of results starting at the stream's current offset.
    ///
    /// This is intended to be used as part of this struct's `Stream` implementation. It is
    /// provided as a convenience for those who wish to manage network calls and pagination
    /// manually; the stream's offset is only advanced by the `Stream` implementation itself.
    pub fn call(&self) -> FuturePage<'a, T> {
        let client = self.client;
        let path = self.path.clone();
        let params = ParamList::new()
            .add_param("limit", self.page_size.to_string())
            .add_param("offset", self.offset.to_string());

        Box::pin(async move {
            let req = client.get(&path, Some(&params));
            request_with_json_response(client, req).await
        })
    }
}

impl<'a, T> Stream for PageIter<'a, T>
where
    T: Page + Send + 'a,
    T::Item: Unpin,
{
    type Item = Result<T::Item>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(fut) = this.loader.as_mut() {
                let page = match fut.as_mut().poll(cx) {
                    Poll::Pending => return Poll::Pending,
                    Poll::Ready(Err(e)) => {
                        this.loader = None;
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Ready(Ok(page)) => page,
                };
                this.loader = None;

                // An empty page means the collection ran out, whatever the envelope's
                // total claims.
                if page.count() == 0 {
                    return Poll::Ready(None);
                }

                this.total = Some(page.total());
                this.offset = page.offset() + page.count();
                this.items = Some(page.into_items().into_iter());
            }

            if let Some(items) = this.items.as_mut() {
                if let Some(item) = items.next() {
                    return Poll::Ready(Some(Ok(item)));
                }
                if this.total.map_or(false, |total| this.offset >= total) {
                    return Poll::Ready(None);
                }
            }

            this.loader = Some(this.call());
        }
    }
}
