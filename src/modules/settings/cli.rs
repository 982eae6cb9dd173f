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


use clap::{builder::ValueParser, Args, Parser, Subcommand, ValueEnum};
use std::{fmt, path::PathBuf, sync::LazyLock};

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(|| {
    // Use PAPILLON_ROOT_DIR if set, otherwise use /tmp/papillon_test
    let root_dir =
        std::env::var("PAPILLON_ROOT_DIR").unwrap_or_else(|_| "/tmp/papillon_test".to_string());

    // Ensure the directory exists
    std::fs::create_dir_all(&root_dir).ok();

    Settings {
        papillon_log_level: "info".to_string(),
        papillon_ansi_logs: true,
        papillon_log_to_file: false,
        papillon_json_logs: false,
        papillon_max_log_files: 5,
        papillon_root_dir: root_dir,
        command: Command::Info,
    }
});

#[derive(Debug, Parser)]
#[clap(
    name = "papillon",
    about = "A self-hosted maildir indexing and search tool built in Rust",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// papillon log level (default: "info")
    #[clap(
        long,
        default_value = "info",
        env,
        help = "Set the log level for papillon"
    )]
    pub papillon_log_level: String,

    /// Enable ANSI logs (default: true)
    #[clap(long, default_value = "true", env, help = "Enable ANSI formatted logs")]
    pub papillon_ansi_logs: bool,

    /// Enable log file output (default: false)
    /// If false, logs will be printed to stderr
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable log file output (otherwise logs go to stderr)"
    )]
    pub papillon_log_to_file: bool,

    /// Enable JSON logs (default: false)
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable JSON formatted logs"
    )]
    pub papillon_json_logs: bool,

    /// Maximum number of log files (default: 5)
    #[clap(
        long,
        default_value = "5",
        env,
        help = "Set the maximum number of log files to keep"
    )]
    pub papillon_max_log_files: usize,

    #[clap(
        long,
        env,
        help = "Set the directory holding the papillon index and logs",
        value_parser = ValueParser::new(|s: &str| {
            let path = PathBuf::from(s);
            if !path.is_absolute() {
                return Err("Path must be an absolute directory path".to_string());
            }
            Ok(s.to_string())
        })
    )]
    pub papillon_root_dir: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Index a maildir tree
    Index(IndexArgs),
    /// Search the index and print the matching messages
    Find(FindArgs),
    /// Show information about the index
    Info,
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Root of the maildir tree to index
    #[clap(long, short = 'm', env = "PAPILLON_MAILDIR")]
    pub maildir: PathBuf,
}

#[derive(Debug, Args)]
pub struct FindArgs {
    /// Search expression, e.g.: subject:meeting from:alice
    #[clap(required = true)]
    pub query: Vec<String>,

    /// Field to sort the results by
    #[clap(long, short = 's', default_value = "date")]
    pub sortfield: String,

    /// Sort in descending order
    #[clap(long, short = 'z')]
    pub reverse: bool,

    /// Show only the first of messages sharing a message-id
    #[clap(long, short = 'u')]
    pub skip_dups: bool,

    /// Also include messages that complete the threads of the matches
    #[clap(long, short = 'r')]
    pub include_related: bool,

    /// Group the results into conversation threads
    #[clap(long, short = 't')]
    pub threads: bool,

    /// Maximum number of results
    #[clap(long, short = 'n')]
    pub maxnum: Option<usize>,

    /// Output format
    #[clap(long, short = 'o', value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Fields to display, as shortcut characters (d=date, f=from, t=to,
    /// c=cc, s=subject, z=size, i=message-id, l=path, m=maildir, g=flags);
    /// other characters are printed as-is
    #[clap(long, short = 'f', default_value = "d f s")]
    pub fields: String,

    /// Only print messages whose date is at or after this Unix timestamp
    #[clap(long)]
    pub after: Option<i64>,

    /// Disable ANSI colors in plain output
    #[clap(long)]
    pub nocolor: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[clap(name = "plain")]
    Plain,
    #[clap(name = "json")]
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
