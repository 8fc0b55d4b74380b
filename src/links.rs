// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Endpoint paths for the Crabber API.
//!
//! Unlike a service with a single fixed host, a Crabber endpoint is relative to whatever instance
//! the [`Client`][crate::Client] points at, and most of them interpolate an ID or username into
//! the path. The functions here build those paths; the client joins them onto its base URL and
//! API root.

/// The flagship Crabber instance, used when no custom base URL is given.
pub const DEFAULT_BASE_URL: &str = "https://crabber.net";

/// The API root every endpoint lives under. `/api/v1` is the only compliant endpoint at this
/// time.
pub const API_ROOT: &str = "/api/v1";

/// Token verification; responds with the authenticated crab.
pub const AUTHENTICATE: &str = "/authenticate/";

pub mod crabs {
    use crate::common::percent_encode;

    pub fn show(id: u64) -> String {
        format!("/crabs/{}/", id)
    }

    pub fn by_username(username: &str) -> String {
        format!("/crabs/username/{}/", percent_encode(username))
    }

    pub fn bio(id: u64) -> String {
        format!("/crabs/{}/bio/", id)
    }

    pub fn follow(id: u64) -> String {
        format!("/crabs/{}/follow/", id)
    }

    pub fn unfollow(id: u64) -> String {
        format!("/crabs/{}/unfollow/", id)
    }

    pub fn followers(id: u64) -> String {
        format!("/crabs/{}/followers/", id)
    }

    pub fn following(id: u64) -> String {
        format!("/crabs/{}/following/", id)
    }

    pub fn bookmarks(id: u64) -> String {
        format!("/crabs/{}/bookmarks/", id)
    }

    pub fn molts(id: u64) -> String {
        format!("/crabs/{}/molts/", id)
    }
}

pub mod molts {
    use crate::common::percent_encode;

    /// Posting a new molt (POST).
    pub const CREATE: &str = "/molts/";

    /// Loading (GET) or deleting (DELETE) a single molt.
    pub fn show(id: u64) -> String {
        format!("/molts/{}/", id)
    }

    pub fn replies(id: u64) -> String {
        format!("/molts/{}/replies/", id)
    }

    pub fn reply(id: u64) -> String {
        format!("/molts/{}/reply/", id)
    }

    pub fn quote(id: u64) -> String {
        format!("/molts/{}/quote/", id)
    }

    pub fn edit(id: u64) -> String {
        format!("/molts/{}/edit/", id)
    }

    pub fn like(id: u64) -> String {
        format!("/molts/{}/like/", id)
    }

    pub fn unlike(id: u64) -> String {
        format!("/molts/{}/unlike/", id)
    }

    pub fn bookmark(id: u64) -> String {
        format!("/molts/{}/bookmark/", id)
    }

    pub fn unbookmark(id: u64) -> String {
        format!("/molts/{}/unbookmark/", id)
    }

    /// Remolting (POST) or taking a remolt back (DELETE).
    pub fn remolt(id: u64) -> String {
        format!("/molts/{}/remolt/", id)
    }

    pub fn mentioning(username: &str) -> String {
        format!("/molts/mentioning/{}/", percent_encode(username))
    }

    pub fn replying_to(username: &str) -> String {
        format!("/molts/replying/{}/", percent_encode(username))
    }
}

pub mod crabtag {
    use crate::common::percent_encode;

    pub fn timeline(tag: &str) -> String {
        format!("/crabtag/{}/", percent_encode(tag))
    }
}

#[cfg(test)]
mod tests {
    // Usernames and crabtags are free text; anything outside the unreserved set has to be
    // encoded or the path is not a valid URI.
    #[test]
    fn interpolated_segments_are_encoded() {
        assert_eq!(
            super::crabs::by_username("crab lord"),
            "/crabs/username/crab%20lord/"
        );
        assert_eq!(
            super::molts::mentioning("crab lord"),
            "/molts/mentioning/crab%20lord/"
        );
        assert_eq!(
            super::crabtag::timeline("crab🦀rave"),
            "/crabtag/crab%F0%9F%A6%80rave/"
        );
        assert_eq!(super::crabs::by_username("jake"), "/crabs/username/jake/");
    }
}
