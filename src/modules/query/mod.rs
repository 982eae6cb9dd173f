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


use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::modules::envelope::Envelope;
use crate::modules::error::PapillonResult;
use crate::modules::query::refs::resolve_references;

pub mod refs;
pub mod run;
pub mod threads;

/// Options for a single query run; freely combinable.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryFlags(u8);

impl QueryFlags {
    pub const NONE: QueryFlags = QueryFlags(0);
    pub const DESCENDING: QueryFlags = QueryFlags(1);
    pub const SKIP_DUPLICATES: QueryFlags = QueryFlags(1 << 1);
    pub const INCLUDE_RELATED: QueryFlags = QueryFlags(1 << 2);
    pub const THREADING: QueryFlags = QueryFlags(1 << 3);

    pub fn contains(self, flag: QueryFlags) -> bool {
        self.0 & flag.0 == flag.0
    }
}

impl BitOr for QueryFlags {
    type Output = QueryFlags;

    fn bitor(self, rhs: QueryFlags) -> QueryFlags {
        QueryFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for QueryFlags {
    fn bitor_assign(&mut self, rhs: QueryFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for QueryFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (QueryFlags::DESCENDING, "Descending"),
            (QueryFlags::SKIP_DUPLICATES, "SkipDuplicates"),
            (QueryFlags::INCLUDE_RELATED, "IncludeRelated"),
            (QueryFlags::THREADING, "Threading"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| *name)
        .collect();
        write!(f, "QueryFlags({})", names.join("|"))
    }
}

/// Structural annotations attached to one result by the thread walk.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchFlags(u8);

impl MatchFlags {
    pub const NONE: MatchFlags = MatchFlags(0);
    /// The message has no parent in the current result set.
    pub const ROOT: MatchFlags = MatchFlags(1);
    /// First among its ordered siblings.
    pub const FIRST: MatchFlags = MatchFlags(1 << 1);
    /// Last among its ordered siblings.
    pub const LAST: MatchFlags = MatchFlags(1 << 2);
    /// The recorded parent reference could not be resolved.
    pub const ORPHAN: MatchFlags = MatchFlags(1 << 3);
    /// Further occurrences of this message-id were suppressed.
    pub const DUPLICATE: MatchFlags = MatchFlags(1 << 4);
    /// Pulled in only to complete a thread, not a match itself.
    pub const RELATED: MatchFlags = MatchFlags(1 << 5);

    pub fn contains(self, flag: MatchFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn names(self) -> Vec<&'static str> {
        [
            (MatchFlags::ROOT, "root"),
            (MatchFlags::FIRST, "first"),
            (MatchFlags::LAST, "last"),
            (MatchFlags::ORPHAN, "orphan"),
            (MatchFlags::DUPLICATE, "duplicate"),
            (MatchFlags::RELATED, "related"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| *name)
        .collect()
    }
}

impl BitOr for MatchFlags {
    type Output = MatchFlags;

    fn bitor(self, rhs: MatchFlags) -> MatchFlags {
        MatchFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for MatchFlags {
    fn bitor_assign(&mut self, rhs: MatchFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for MatchFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchFlags({})", self.names().join("|"))
    }
}

/// The fields a query result can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Date,
    From,
    Maildir,
    MessageId,
    Size,
    Subject,
    To,
}

impl SortField {
    /// Resolve a field name or its single-character shortcut.
    pub fn from_name(name: &str) -> Option<SortField> {
        match name {
            "date" | "d" => Some(SortField::Date),
            "from" | "f" => Some(SortField::From),
            "maildir" | "m" => Some(SortField::Maildir),
            "msgid" | "message-id" | "i" => Some(SortField::MessageId),
            "size" | "z" => Some(SortField::Size),
            "subject" | "s" => Some(SortField::Subject),
            "to" | "t" => Some(SortField::To),
            _ => None,
        }
    }
}

/// A sort key value; totally ordered so sibling and flat ordering work the
/// same for dates, sizes and strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Integer(i64),
    Text(String),
}

/// One message produced by the search backend for the current query.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub envelope: Envelope,
    pub sort_key: SortValue,
}

impl Candidate {
    pub fn new(envelope: Envelope, sort_field: SortField) -> Candidate {
        let sort_key = envelope.sort_value(sort_field);
        Candidate { envelope, sort_key }
    }

    /// The message-id, when the message has one.
    pub fn identifier(&self) -> Option<&str> {
        if self.envelope.message_id.is_empty() {
            None
        } else {
            Some(self.envelope.message_id.as_str())
        }
    }

    /// The identifier used to key this message in a thread forest: its
    /// message-id, or a synthetic stand-in unique to the backend document.
    pub fn thread_identifier(&self) -> String {
        thread_identifier(&self.envelope)
    }

    /// Ancestor identifiers, oldest first, direct parent last.
    pub fn reference_list(&self) -> Vec<String> {
        resolve_references(&self.envelope.references, self.envelope.in_reply_to.as_deref())
    }
}

pub(crate) fn thread_identifier(envelope: &Envelope) -> String {
    if envelope.message_id.is_empty() {
        format!("{:016x}.no-message-id@localhost", envelope.id)
    } else {
        envelope.message_id.clone()
    }
}

/// What the query engine needs from the index: a candidate set for an
/// expression, and point lookups used to complete threads.
pub trait SearchBackend {
    fn search(
        &self,
        expr: &str,
        sort_field: SortField,
        descending: bool,
    ) -> PapillonResult<Vec<Candidate>>;

    fn fetch_by_identifier(
        &self,
        id: &str,
        sort_field: SortField,
    ) -> PapillonResult<Option<Candidate>>;
}

/// One element of the final, ordered result sequence.
#[derive(Debug, Clone)]
pub struct QueryMatch {
    pub envelope: Envelope,
    pub flags: MatchFlags,
    /// Thread nesting level; 1 for roots.
    pub thread_level: u32,
    /// Sortable key encoding the position in the thread traversal.
    pub thread_path: String,
    /// True only for the final emitted element.
    pub is_last: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_flags_combine() {
        let flags = QueryFlags::THREADING | QueryFlags::DESCENDING;
        assert!(flags.contains(QueryFlags::THREADING));
        assert!(flags.contains(QueryFlags::DESCENDING));
        assert!(!flags.contains(QueryFlags::SKIP_DUPLICATES));
    }

    #[test]
    fn match_flag_names() {
        let flags = MatchFlags::ROOT | MatchFlags::ORPHAN;
        assert_eq!(flags.names(), vec!["root", "orphan"]);
    }

    #[test]
    fn sort_field_shortcuts() {
        assert_eq!(SortField::from_name("date"), Some(SortField::Date));
        assert_eq!(SortField::from_name("z"), Some(SortField::Size));
        assert_eq!(SortField::from_name("bogus"), None);
    }

    #[test]
    fn sort_values_are_totally_ordered() {
        assert!(SortValue::Integer(1) < SortValue::Integer(2));
        assert!(SortValue::Text("a".into()) < SortValue::Text("b".into()));
    }
}
