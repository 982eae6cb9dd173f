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


use crate::modules::output::{json::JsonFormatter, plain::PlainFormatter};
use crate::modules::query::QueryMatch;
use crate::modules::settings::cli::{FindArgs, OutputFormat};

pub mod json;
pub mod plain;

/// Renders the ordered result sequence; one implementation per output
/// format. `header`/`footer` bracket the stream for formats that need it.
pub trait Formatter {
    fn header(&mut self) {}
    fn message(&mut self, item: &QueryMatch);
    fn footer(&mut self) {}
}

pub fn create_formatter(args: &FindArgs) -> Box<dyn Formatter> {
    let out = std::io::stdout().lock();
    match args.format {
        OutputFormat::Plain => Box::new(PlainFormatter::new(
            out,
            args.fields.clone(),
            !args.nocolor,
            args.threads,
        )),
        OutputFormat::Json => Box::new(JsonFormatter::new(out, args.threads)),
    }
}
