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

use serde_json::{json, Map, Value};

use crate::modules::output::Formatter;
use crate::modules::query::QueryMatch;

pub struct JsonFormatter<W: Write> {
    out: W,
    threads: bool,
}

impl<W: Write> JsonFormatter<W> {
    pub fn new(out: W, threads: bool) -> Self {
        Self { out, threads }
    }
}

impl<W: Write> Formatter for JsonFormatter<W> {
    fn header(&mut self) {
        let _ = writeln!(self.out, "[");
    }

    fn message(&mut self, item: &QueryMatch) {
        let envelope = &item.envelope;
        let mut map = Map::new();
        map.insert("docid".into(), json!(envelope.id));
        if !envelope.message_id.is_empty() {
            map.insert("message-id".into(), json!(envelope.message_id));
        }
        if !envelope.subject.is_empty() {
            map.insert("subject".into(), json!(envelope.subject));
        }
        if !envelope.from.is_empty() {
            map.insert("from".into(), json!(envelope.from));
        }
        if !envelope.to.is_empty() {
            map.insert("to".into(), json!(envelope.to));
        }
        if !envelope.cc.is_empty() {
            map.insert("cc".into(), json!(envelope.cc));
        }
        map.insert("date".into(), json!(envelope.date));
        map.insert("size".into(), json!(envelope.size));
        if !envelope.flags.is_empty() {
            map.insert("flags".into(), json!(envelope.flags));
        }
        map.insert("maildir".into(), json!(envelope.maildir));
        map.insert("path".into(), json!(envelope.path));
        if self.threads {
            map.insert(
                "thread".into(),
                json!({
                    "level": item.thread_level,
                    "path": item.thread_path,
                    "flags": item.flags.names(),
                }),
            );
        }
        let _ = writeln!(
            self.out,
            "{}{}",
            Value::Object(map),
            if item.is_last { "" } else { "," }
        );
    }

    fn footer(&mut self) {
        let _ = writeln!(self.out, "]");
    }
}
