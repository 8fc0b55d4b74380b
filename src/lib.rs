// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A library for interacting with the Crabber API.
//!
//! [Crabber] is a small, crab-themed microblogging service. This crate wraps its REST API so you
//! can load and post [Molts], follow and unfollow [Crabs], and manage likes and bookmarks from
//! Rust. It can talk to any instance of Crabber, including one running on your own machine; the
//! flagship instance at `https://crabber.net` is the default.
//!
//! [Crabber]: https://crabber.net
//! [Molts]: molt::Molt
//! [Crabs]: crab::Crab
//!
//! # Getting started
//!
//! Every request to a Crabber instance carries a developer key, obtained from the developer page
//! of your target instance. Requests that act on behalf of an account additionally need an access
//! token from the same page. These two values make up your [`Credentials`], which you hand to a
//! [`Client`]:
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), crabber::error::Error> {
//! let client = crabber::Client::new(crabber::Credentials::developer("YOUR_API_KEY"));
//!
//! let crab = client.crab_by_username("jake").await?;
//! println!("{} (@{})", crab.display_name, crab.username);
//! # Ok(())
//! # }
//! ```
//!
//! Adding an access token unlocks the posting and relationship endpoints:
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), crabber::error::Error> {
//! let credentials = crabber::Credentials::access("YOUR_API_KEY", "YOUR_ACCESS_TOKEN");
//! let client = crabber::Client::new(credentials);
//!
//! let molt = client.post_molt("Hello, world!").await?;
//! println!("posted molt {}", molt.id);
//! # Ok(())
//! # }
//! ```
//!
//! Calling a privileged function without an access token fails with
//! [`Error::AuthenticationRequired`][error::Error::AuthenticationRequired] before any network
//! call is made.
//!
//! # Module layout
//!
//! The [`Client`] is the entry point and covers the common lookups and posting. The finer-grained
//! operations live next to the type they act on:
//!
//! - [`crab`]: accounts, their profiles ([`Bio`]), and follow relationships.
//! - [`molt`]: posts, replies, quotes, likes, bookmarks, and remolts.
//! - [`cursor`]: the paginated streams returned by relation listings.
//! - [`media`]: image attachments for molts.
//! - [`error`]: the error taxonomy shared by every call in the crate.
//!
//! Functions that return collections either take a [`ListParams`] filter (molt listings, which
//! the server bounds at 50 entries per call) or return a [`PageIter`][cursor::PageIter] stream
//! that walks every page for you (followers, following, bookmarks).

mod common;
mod links;

pub mod auth;
pub mod client;
pub mod crab;
pub mod cursor;
pub mod error;
pub mod media;
pub mod molt;

pub use crate::auth::Credentials;
pub use crate::client::{Client, RetryPolicy};
pub use crate::crab::{Bio, BioUpdate, Crab};
pub use crate::media::MediaSource;
pub use crate::molt::{ListParams, Molt, MoltDraft};
