//
// Copyright (c) 2025 rustmailer.com (https://rustmailer.com)
//
// This file is part of the Papillon Mail Search Project
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.


use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

static MSGID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^<>\s]+)>").expect("message-id regex"));

/// Merge a References-style chain and an optional In-Reply-To back-pointer
/// into one ordered list of ancestor identifiers: oldest first, direct
/// parent last, no identifier twice.
///
/// The back-pointer is appended unless it is already the chain's last
/// element; duplicates keep their first-seen position. Malformed or empty
/// tokens are skipped; this never fails.
pub fn resolve_references(chain: &str, in_reply_to: Option<&str>) -> Vec<String> {
    let mut ids = tokenize(chain);
    if let Some(raw) = in_reply_to {
        if let Some(id) = tokenize(raw).into_iter().next() {
            if ids.last() != Some(&id) {
                ids.push(id);
            }
        }
    }
    ids.into_iter().unique().collect()
}

fn tokenize(raw: &str) -> Vec<String> {
    if raw.contains('<') {
        MSGID_RE
            .captures_iter(raw)
            .map(|captures| captures[1].to_string())
            .collect()
    } else {
        raw.split_whitespace().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_chain_oldest_first() {
        let ids = resolve_references("<a@x> <b@x> <c@x>", None);
        assert_eq!(ids, ["a@x", "b@x", "c@x"]);
    }

    #[test]
    fn appends_reply_pointer_as_direct_parent() {
        let ids = resolve_references("<a@x> <b@x>", Some("<c@x>"));
        assert_eq!(ids, ["a@x", "b@x", "c@x"]);
    }

    #[test]
    fn reply_pointer_already_last_does_not_grow_the_list() {
        let ids = resolve_references("<a@x> <b@x>", Some("<b@x>"));
        assert_eq!(ids, ["a@x", "b@x"]);
    }

    #[test]
    fn duplicates_keep_first_seen_position() {
        let ids = resolve_references("<a@x> <b@x> <a@x>", None);
        assert_eq!(ids, ["a@x", "b@x"]);
    }

    #[test]
    fn reply_pointer_seen_earlier_in_chain_is_dropped() {
        let ids = resolve_references("<a@x> <b@x>", Some("<a@x>"));
        assert_eq!(ids, ["a@x", "b@x"]);
    }

    #[test]
    fn empty_inputs_yield_no_ancestors() {
        assert!(resolve_references("", None).is_empty());
        assert!(resolve_references("   ", None).is_empty());
    }

    #[test]
    fn reply_pointer_alone_is_the_parent() {
        let ids = resolve_references("", Some("<a@x>"));
        assert_eq!(ids, ["a@x"]);
    }

    #[test]
    fn bare_tokens_without_brackets_are_accepted() {
        let ids = resolve_references("a@x b@x", None);
        assert_eq!(ids, ["a@x", "b@x"]);
    }

    #[test]
    fn malformed_fragments_are_skipped() {
        let ids = resolve_references("<a@x> <> junk <b@x", None);
        assert_eq!(ids, ["a@x"]);
    }
}
