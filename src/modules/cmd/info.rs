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


use crate::modules::{
    error::PapillonResult,
    indexer::manager::IndexManager,
    settings::dir::DATA_DIR_MANAGER,
};
use crate::papillon_version;

pub fn execute() -> PapillonResult<()> {
    let manager = IndexManager::open(&DATA_DIR_MANAGER.index_dir)?;
    println!("papillon version  : {} [{}]", papillon_version!(), env!("GIT_HASH"));
    println!(
        "index directory   : {}",
        DATA_DIR_MANAGER.index_dir.display()
    );
    println!("messages in index : {}", manager.total_messages()?);
    Ok(())
}
