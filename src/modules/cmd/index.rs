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


use std::time::Instant;

use tracing::info;

use crate::modules::{
    error::PapillonResult,
    indexer::manager::IndexManager,
    settings::{cli::IndexArgs, dir::DATA_DIR_MANAGER},
};

pub async fn execute(args: &IndexArgs) -> PapillonResult<()> {
    let manager = IndexManager::open(&DATA_DIR_MANAGER.index_dir)?;
    let started = Instant::now();
    info!("indexing maildir '{}'", args.maildir.display());
    let stats = manager.index_maildir(&args.maildir).await?;
    info!(
        "indexed {} messages ({} skipped) in {:.1?}",
        stats.indexed,
        stats.skipped,
        started.elapsed()
    );
    println!(
        "indexed {} messages, skipped {}",
        stats.indexed, stats.skipped
    );
    Ok(())
}
