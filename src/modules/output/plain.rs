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


use std::io::Write;

use chrono::{Local, TimeZone};

use crate::modules::envelope::Envelope;
use crate::modules::output::Formatter;
use crate::modules::query::{MatchFlags, QueryMatch};

const COLOR_CYAN: &str = "\x1b[36m";
const COLOR_BLUE: &str = "\x1b[34m";
const COLOR_GREEN: &str = "\x1b[32m";
const COLOR_MAGENTA: &str = "\x1b[35m";
const COLOR_YELLOW: &str = "\x1b[33m";
const COLOR_RESET: &str = "\x1b[0m";

pub struct PlainFormatter<W: Write> {
    out: W,
    fields: String,
    color: bool,
    threads: bool,
}

impl<W: Write> PlainFormatter<W> {
    pub fn new(out: W, fields: String, color: bool, threads: bool) -> Self {
        Self {
            out,
            fields,
            color,
            threads,
        }
    }

    fn thread_indent(&mut self, item: &QueryMatch) {
        for _ in 1..item.thread_level {
            let _ = write!(self.out, "  ");
        }
        if !item.flags.contains(MatchFlags::ROOT) {
            let branch = if item.flags.contains(MatchFlags::FIRST) {
                "\\"
            } else if item.flags.contains(MatchFlags::LAST) {
                "/"
            } else {
                " "
            };
            let marker = if item.flags.contains(MatchFlags::ORPHAN) {
                "*> "
            } else if item.flags.contains(MatchFlags::DUPLICATE) {
                "=> "
            } else {
                "-> "
            };
            let _ = write!(self.out, "{}{}", branch, marker);
        }
    }
}

impl<W: Write> Formatter for PlainFormatter<W> {
    fn message(&mut self, item: &QueryMatch) {
        if self.threads {
            self.thread_indent(item);
        }
        let shortcuts: Vec<char> = self.fields.chars().collect();
        for shortcut in shortcuts {
            match display_field(&item.envelope, shortcut) {
                Some((value, color)) => {
                    if self.color {
                        let _ = write!(self.out, "{}{}{}", color, value, COLOR_RESET);
                    } else {
                        let _ = write!(self.out, "{}", value);
                    }
                }
                None => {
                    let _ = write!(self.out, "{}", shortcut);
                }
            }
        }
        let _ = writeln!(self.out);
    }
}

fn display_field(envelope: &Envelope, shortcut: char) -> Option<(String, &'static str)> {
    match shortcut {
        'd' => Some((format_date(envelope.date), COLOR_MAGENTA)),
        'f' => Some((envelope.from.clone(), COLOR_CYAN)),
        't' => Some((envelope.to.clone(), COLOR_BLUE)),
        'c' => Some((envelope.cc.clone(), COLOR_BLUE)),
        's' => Some((envelope.subject.clone(), COLOR_GREEN)),
        'z' => Some((format_size(envelope.size), COLOR_YELLOW)),
        'i' => Some((envelope.message_id.clone(), COLOR_YELLOW)),
        'l' => Some((envelope.path.clone(), COLOR_YELLOW)),
        'm' => Some((envelope.maildir.clone(), COLOR_YELLOW)),
        'g' => Some((envelope.flags.clone(), COLOR_YELLOW)),
        _ => None,
    }
}

fn format_date(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(date) => date.format("%a %b %e %H:%M:%S %Y").to_string(),
        None => String::new(),
    }
}

fn format_size(size: u64) -> String {
    if size >= 1024 * 1024 {
        format!("{:.1}M", size as f64 / (1024.0 * 1024.0))
    } else if size >= 1024 {
        format!("{:.1}K", size as f64 / 1024.0)
    } else {
        format!("{}B", size)
    }
}
