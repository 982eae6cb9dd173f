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


use crate::{
    modules::{
        error::{code::ErrorCode, PapillonResult},
        indexer::manager::IndexManager,
        output::create_formatter,
        query::{run::run_query, QueryFlags},
        settings::{cli::FindArgs, dir::DATA_DIR_MANAGER},
    },
    raise_error,
};

pub fn execute(args: &FindArgs) -> PapillonResult<()> {
    let expr = args.query.join(" ");

    let mut flags = QueryFlags::NONE;
    if args.reverse {
        flags |= QueryFlags::DESCENDING;
    }
    if args.skip_dups {
        flags |= QueryFlags::SKIP_DUPLICATES;
    }
    if args.include_related {
        flags |= QueryFlags::INCLUDE_RELATED;
    }
    if args.threads {
        flags |= QueryFlags::THREADING;
    }

    let manager = IndexManager::open(&DATA_DIR_MANAGER.index_dir)?;
    let mut matches = run_query(&manager, &expr, &args.sortfield, flags, args.maxnum)?;

    if matches.is_empty() {
        return Err(raise_error!(
            "no matches for search expression".into(),
            ErrorCode::NoMatches
        ));
    }

    if let Some(after) = args.after {
        matches.retain(|m| m.envelope.date >= after);
        for m in matches.iter_mut() {
            m.is_last = false;
        }
        if let Some(last) = matches.last_mut() {
            last.is_last = true;
        }
    }

    let mut formatter = create_formatter(args);
    formatter.header();
    for item in &matches {
        formatter.message(item);
    }
    formatter.footer();
    Ok(())
}
