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


use std::{path::PathBuf, sync::LazyLock};

use crate::modules::{error::PapillonResult, settings::cli::SETTINGS};

pub static DATA_DIR_MANAGER: LazyLock<DataDirManager> = LazyLock::new(DataDirManager::new);

pub struct DataDirManager {
    pub root_dir: PathBuf,
    pub index_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl DataDirManager {
    fn new() -> Self {
        let root_dir = PathBuf::from(&SETTINGS.papillon_root_dir);
        DataDirManager {
            index_dir: root_dir.join("index"),
            log_dir: root_dir.join("logs"),
            root_dir,
        }
    }

    pub fn initialize(&self) -> PapillonResult<()> {
        std::fs::create_dir_all(&self.root_dir)?;
        std::fs::create_dir_all(&self.index_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}
