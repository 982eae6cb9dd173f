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


use ahash::AHashSet;
use tracing::debug;

use crate::{
    modules::{
        error::{code::ErrorCode, PapillonResult},
        query::{
            thread_identifier,
            threads::{annotate_forest, build_forest, path_width},
            Candidate, MatchFlags, QueryFlags, QueryMatch, SearchBackend, SortField,
        },
    },
    raise_error,
};

/// Run a query end to end: search, optionally thread and expand, order,
/// deduplicate, cap and mark the final element.
///
/// The sort field is validated before the backend is touched. An empty
/// result is not an error here; callers decide how to report it.
pub fn run_query<B: SearchBackend>(
    backend: &B,
    expr: &str,
    sort_field: &str,
    flags: QueryFlags,
    max_results: Option<usize>,
) -> PapillonResult<Vec<QueryMatch>> {
    let field = SortField::from_name(sort_field).ok_or_else(|| {
        raise_error!(
            format!("invalid sort field: '{}'", sort_field),
            ErrorCode::InvalidParameter
        )
    })?;
    let descending = flags.contains(QueryFlags::DESCENDING);
    let threading = flags.contains(QueryFlags::THREADING);

    let candidates = backend.search(expr, field, descending)?;

    let mut matches = if threading {
        let relatives = if flags.contains(QueryFlags::INCLUDE_RELATED) {
            fetch_relatives(backend, &candidates, field)
        } else {
            Vec::new()
        };
        annotate_forest(build_forest(candidates, relatives), descending)
    } else {
        flat_matches(candidates, descending)
    };

    if flags.contains(QueryFlags::SKIP_DUPLICATES) {
        let mut seen: AHashSet<String> = AHashSet::with_capacity(matches.len());
        matches.retain(|m| seen.insert(thread_identifier(&m.envelope)));
    }

    // Whole-sequence reversal: sibling order was already fixed per the
    // requested direction, this flips the presentation order of the
    // flattened thread forest. The flat path comes out of the sort already
    // directed, so it is not reversed again.
    if descending && threading {
        matches.reverse();
    }

    if let Some(limit) = max_results {
        matches.truncate(limit);
    }
    if let Some(last) = matches.last_mut() {
        last.is_last = true;
    }
    Ok(matches)
}

/// Without threading every result is its own root; candidates are ordered
/// flatly by the requested field and direction.
fn flat_matches(mut candidates: Vec<Candidate>, descending: bool) -> Vec<QueryMatch> {
    candidates.sort_by(|a, b| {
        let ordering = a.sort_key.cmp(&b.sort_key);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    let width = path_width(candidates.len());
    candidates
        .into_iter()
        .enumerate()
        .map(|(pos, candidate)| QueryMatch {
            envelope: candidate.envelope,
            flags: MatchFlags::ROOT,
            thread_level: 1,
            thread_path: format!("{:0width$x}", pos),
            is_last: false,
        })
        .collect()
}

/// Fetch the ancestors referenced by the candidates but absent from the
/// candidate set. A miss or a failing fetch leaves the reference
/// unresolved, which later surfaces as an orphan; it never aborts the
/// query.
fn fetch_relatives<B: SearchBackend>(
    backend: &B,
    candidates: &[Candidate],
    field: SortField,
) -> Vec<Candidate> {
    let present: AHashSet<&str> = candidates.iter().filter_map(|c| c.identifier()).collect();
    let mut requested: AHashSet<String> = AHashSet::new();
    let mut wanted: Vec<String> = Vec::new();
    for candidate in candidates {
        for id in candidate.reference_list() {
            if !present.contains(id.as_str()) && requested.insert(id.clone()) {
                wanted.push(id);
            }
        }
    }

    let mut relatives = Vec::with_capacity(wanted.len());
    for id in wanted {
        match backend.fetch_by_identifier(&id, field) {
            Ok(Some(candidate)) => relatives.push(candidate),
            Ok(None) => debug!("referenced message '{}' not in index", id),
            Err(error) => debug!("fetching '{}' failed: {:?}", id, error),
        }
    }
    relatives
}
