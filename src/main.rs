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


use mimalloc::MiMalloc;
use modules::{
    cmd,
    error::PapillonResult,
    logger,
    settings::{
        cli::{Command, SETTINGS},
        dir::DATA_DIR_MANAGER,
    },
};
use tracing::debug;

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[cfg(not(test))]
#[tokio::main]
async fn main() {
    logger::initialize_logging();
    debug!(
        "papillon {} [{}] starting",
        papillon_version!(),
        env!("GIT_HASH")
    );

    if let Err(error) = run().await {
        eprintln!("{}", error);
        std::process::exit(error.exit_code());
    }
}

#[cfg(not(test))]
async fn run() -> PapillonResult<()> {
    DATA_DIR_MANAGER.initialize()?;
    match &SETTINGS.command {
        Command::Index(args) => cmd::index::execute(args).await,
        Command::Find(args) => cmd::find::execute(args),
        Command::Info => cmd::info::execute(),
    }
}
