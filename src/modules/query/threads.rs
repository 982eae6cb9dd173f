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


use ahash::{AHashMap, AHashSet};

use crate::modules::query::{Candidate, MatchFlags, QueryMatch};

/// One message in the thread forest of the current query.
struct ThreadNode {
    /// Direct parent identifier; cleared when the link is broken or the
    /// parent is missing from the working set.
    parent_id: Option<String>,
    /// Arena indices of the children, in discovery order.
    children: Vec<usize>,
    /// Pulled in only to complete a thread.
    related: bool,
    /// Recorded a parent reference that could not be resolved.
    orphan: bool,
    /// Further occurrences of this identifier were suppressed.
    duplicate: bool,
    candidate: Candidate,
}

/// Forest of thread nodes, rebuilt from scratch for every query and
/// discarded with it. Nodes live in an arena; parent/child links are arena
/// indices resolved through an identifier map during construction.
pub(crate) struct ThreadForest {
    arena: Vec<ThreadNode>,
    roots: Vec<usize>,
}

/// Build the thread forest for the given candidates and relatives.
///
/// Candidates come first so a message matched by the query wins the
/// identifier over a relative carrying the same id. A second occurrence of
/// an identifier marks the first node as a duplicate instead of adding a
/// node. Reference cycles are broken before any attachment by walking each
/// node's recorded parent chain: revisiting any node on the walk drops the
/// starting node's link, which makes mutually-referencing messages
/// independent roots regardless of discovery order.
pub(crate) fn build_forest(candidates: Vec<Candidate>, relatives: Vec<Candidate>) -> ThreadForest {
    let total = candidates.len() + relatives.len();
    let mut arena: Vec<ThreadNode> = Vec::with_capacity(total);
    let mut by_id: AHashMap<String, usize> = AHashMap::with_capacity(total);

    let tagged = candidates
        .into_iter()
        .map(|c| (false, c))
        .chain(relatives.into_iter().map(|c| (true, c)));
    for (related, candidate) in tagged {
        let id = candidate.thread_identifier();
        if let Some(&existing) = by_id.get(&id) {
            arena[existing].duplicate = true;
            continue;
        }
        let parent_id = candidate.reference_list().pop();
        by_id.insert(id, arena.len());
        arena.push(ThreadNode {
            parent_id,
            children: Vec::new(),
            related,
            orphan: false,
            duplicate: false,
            candidate,
        });
    }

    let mut broken = Vec::new();
    for idx in 0..arena.len() {
        if arena[idx].parent_id.is_none() {
            continue;
        }
        let mut seen: AHashSet<usize> = AHashSet::new();
        seen.insert(idx);
        let mut cursor = parent_index(&arena, &by_id, idx);
        while let Some(node) = cursor {
            if !seen.insert(node) {
                broken.push(idx);
                break;
            }
            cursor = parent_index(&arena, &by_id, node);
        }
    }
    for idx in broken {
        arena[idx].parent_id = None;
    }

    let mut roots = Vec::new();
    for idx in 0..arena.len() {
        match arena[idx].parent_id.clone() {
            None => roots.push(idx),
            Some(parent) => match by_id.get(&parent) {
                Some(&parent_idx) => arena[parent_idx].children.push(idx),
                None => {
                    arena[idx].orphan = true;
                    arena[idx].parent_id = None;
                    roots.push(idx);
                }
            },
        }
    }

    ThreadForest { arena, roots }
}

fn parent_index(
    arena: &[ThreadNode],
    by_id: &AHashMap<String, usize>,
    idx: usize,
) -> Option<usize> {
    arena[idx]
        .parent_id
        .as_deref()
        .and_then(|parent| by_id.get(parent))
        .copied()
}

/// Order the forest and flatten it into the display sequence.
///
/// Roots and every sibling group are sorted by the prefetched sort key in
/// the requested direction, ties keeping discovery order; the walk is a
/// pre-order DFS. Each node gets its flags, its level (1 for roots) and a
/// path of fixed-width hex positions whose lexical order reproduces the
/// walk.
pub(crate) fn annotate_forest(forest: ThreadForest, descending: bool) -> Vec<QueryMatch> {
    let ThreadForest { mut arena, roots } = forest;

    let mut roots = roots;
    sort_siblings(&mut roots, &arena, descending);
    for idx in 0..arena.len() {
        let mut children = std::mem::take(&mut arena[idx].children);
        sort_siblings(&mut children, &arena, descending);
        arena[idx].children = children;
    }

    struct Visit {
        idx: usize,
        level: u32,
        path: String,
        first: bool,
        last: bool,
    }

    let mut stack: Vec<Visit> = Vec::with_capacity(arena.len());
    let width = path_width(roots.len());
    for (pos, &idx) in roots.iter().enumerate().rev() {
        stack.push(Visit {
            idx,
            level: 1,
            path: format!("{:0width$x}", pos),
            first: pos == 0,
            last: pos + 1 == roots.len(),
        });
    }

    let mut matches = Vec::with_capacity(arena.len());
    while let Some(visit) = stack.pop() {
        let node = &arena[visit.idx];
        let mut flags = MatchFlags::NONE;
        if node.parent_id.is_none() {
            flags |= MatchFlags::ROOT;
        }
        if node.orphan {
            flags |= MatchFlags::ORPHAN;
        }
        if node.duplicate {
            flags |= MatchFlags::DUPLICATE;
        }
        if node.related {
            flags |= MatchFlags::RELATED;
        }
        if visit.first {
            flags |= MatchFlags::FIRST;
        }
        if visit.last {
            flags |= MatchFlags::LAST;
        }

        let width = path_width(node.children.len());
        for (pos, &child) in node.children.iter().enumerate().rev() {
            stack.push(Visit {
                idx: child,
                level: visit.level + 1,
                path: format!("{}:{:0width$x}", visit.path, pos),
                first: pos == 0,
                last: pos + 1 == node.children.len(),
            });
        }

        matches.push(QueryMatch {
            envelope: node.candidate.envelope.clone(),
            flags,
            thread_level: visit.level,
            thread_path: visit.path,
            is_last: false,
        });
    }
    matches
}

fn sort_siblings(siblings: &mut [usize], arena: &[ThreadNode], descending: bool) {
    siblings.sort_by(|&a, &b| {
        let ordering = arena[a].candidate.sort_key.cmp(&arena[b].candidate.sort_key);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

/// Hex digits needed to render any position of a sibling group of `count`,
/// so that path segments compare lexically the way the positions compare
/// numerically.
pub(crate) fn path_width(count: usize) -> usize {
    let mut width = 1;
    let mut rest = count.saturating_sub(1) >> 4;
    while rest > 0 {
        width += 1;
        rest >>= 4;
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::envelope::Envelope;
    use crate::modules::query::{Candidate, SortField};
    use crate::modules::utils::create_hash;

    fn candidate(message_id: &str, references: &str, date: i64) -> Candidate {
        let envelope = Envelope {
            id: create_hash(&format!("{message_id}/{references}/{date}")),
            message_id: message_id.to_string(),
            references: references.to_string(),
            subject: format!("msg {message_id}"),
            date,
            ..Default::default()
        };
        Candidate::new(envelope, SortField::Date)
    }

    fn ids(matches: &[QueryMatch]) -> Vec<String> {
        matches.iter().map(|m| m.envelope.message_id.clone()).collect()
    }

    #[test]
    fn chain_becomes_single_thread() {
        let forest = build_forest(
            vec![
                candidate("c@x", "<a@x> <b@x>", 3),
                candidate("a@x", "", 1),
                candidate("b@x", "<a@x>", 2),
            ],
            Vec::new(),
        );
        let matches = annotate_forest(forest, false);
        assert_eq!(ids(&matches), ["a@x", "b@x", "c@x"]);
        assert_eq!(
            matches.iter().map(|m| m.thread_level).collect::<Vec<_>>(),
            [1, 2, 3]
        );
        assert_eq!(
            matches[0].flags,
            MatchFlags::ROOT | MatchFlags::FIRST | MatchFlags::LAST
        );
        assert_eq!(matches[1].flags, MatchFlags::FIRST | MatchFlags::LAST);
    }

    #[test]
    fn unresolved_parent_demotes_to_orphan_root() {
        let forest = build_forest(vec![candidate("b@x", "<missing@x>", 1)], Vec::new());
        let matches = annotate_forest(forest, false);
        assert_eq!(matches.len(), 1);
        assert!(matches[0].flags.contains(MatchFlags::ROOT));
        assert!(matches[0].flags.contains(MatchFlags::ORPHAN));
        assert_eq!(matches[0].thread_level, 1);
    }

    #[test]
    fn mutual_references_become_independent_roots() {
        let forest = build_forest(
            vec![candidate("a@x", "<b@x>", 1), candidate("b@x", "<a@x>", 2)],
            Vec::new(),
        );
        let matches = annotate_forest(forest, false);
        assert_eq!(matches.len(), 2);
        for m in &matches {
            assert!(m.flags.contains(MatchFlags::ROOT));
            assert!(!m.flags.contains(MatchFlags::ORPHAN));
            assert_eq!(m.thread_level, 1);
        }
    }

    #[test]
    fn self_reference_is_dropped() {
        let forest = build_forest(vec![candidate("a@x", "<a@x>", 1)], Vec::new());
        let matches = annotate_forest(forest, false);
        assert_eq!(matches.len(), 1);
        assert!(matches[0].flags.contains(MatchFlags::ROOT));
    }

    #[test]
    fn repeated_identifier_marks_duplicate_without_second_node() {
        let forest = build_forest(
            vec![candidate("a@x", "", 1), candidate("a@x", "", 2)],
            Vec::new(),
        );
        let matches = annotate_forest(forest, false);
        assert_eq!(matches.len(), 1);
        assert!(matches[0].flags.contains(MatchFlags::DUPLICATE));
    }

    #[test]
    fn relative_parent_carries_related_flag() {
        let forest = build_forest(
            vec![candidate("b@x", "<a@x>", 2)],
            vec![candidate("a@x", "", 1)],
        );
        let matches = annotate_forest(forest, false);
        assert_eq!(ids(&matches), ["a@x", "b@x"]);
        assert!(matches[0].flags.contains(MatchFlags::RELATED));
        assert!(!matches[1].flags.contains(MatchFlags::ORPHAN));
        assert_eq!(matches[1].thread_level, 2);
    }

    #[test]
    fn siblings_follow_sort_key_and_direction() {
        let candidates = vec![
            candidate("root@x", "", 1),
            candidate("late@x", "<root@x>", 9),
            candidate("early@x", "<root@x>", 2),
        ];
        let ascending = annotate_forest(build_forest(candidates.clone(), Vec::new()), false);
        assert_eq!(ids(&ascending), ["root@x", "early@x", "late@x"]);
        assert!(ascending[1].flags.contains(MatchFlags::FIRST));
        assert!(ascending[2].flags.contains(MatchFlags::LAST));

        let descending = annotate_forest(build_forest(candidates, Vec::new()), true);
        assert_eq!(ids(&descending), ["root@x", "late@x", "early@x"]);
    }

    #[test]
    fn sibling_ties_keep_discovery_order() {
        let forest = build_forest(
            vec![
                candidate("root@x", "", 1),
                candidate("one@x", "<root@x>", 5),
                candidate("two@x", "<root@x>", 5),
            ],
            Vec::new(),
        );
        let matches = annotate_forest(forest, false);
        assert_eq!(ids(&matches), ["root@x", "one@x", "two@x"]);
    }

    #[test]
    fn paths_reproduce_walk_order_lexically() {
        let mut candidates = vec![candidate("root@x", "", 0)];
        // enough roots to need two hex digits
        for i in 0..17 {
            candidates.push(candidate(&format!("r{i}@x"), "", i + 1));
        }
        candidates.push(candidate("kid@x", "<root@x>", 99));
        let matches = annotate_forest(build_forest(candidates, Vec::new()), false);
        let paths: Vec<&str> = matches.iter().map(|m| m.thread_path.as_str()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn missing_message_id_gets_synthetic_identity() {
        let a = candidate("", "", 1);
        let b = candidate("", "", 2);
        let forest = build_forest(vec![a, b], Vec::new());
        let matches = annotate_forest(forest, false);
        // distinct synthetic ids, so no duplicate suppression
        assert_eq!(matches.len(), 2);
        assert!(!matches[0].flags.contains(MatchFlags::DUPLICATE));
    }
}
