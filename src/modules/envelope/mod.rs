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


use serde::{Deserialize, Serialize};
use tantivy::schema::Value;
use tantivy::TantivyDocument;

use crate::{
    modules::{
        error::{code::ErrorCode, PapillonResult},
        indexer::schema::SchemaTools,
        query::{SortField, SortValue},
    },
    raise_error,
};

pub mod extractor;

/// The indexed and stored view of one message file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Stable hash of the message path.
    pub id: u64,
    /// Message-Id header value, without angle brackets; empty when missing.
    pub message_id: String,
    /// Space-joined References identifiers, oldest first.
    pub references: String,
    pub in_reply_to: Option<String>,
    pub subject: String,
    pub from: String,
    pub to: String,
    pub cc: String,
    /// Message date as Unix timestamp (seconds).
    pub date: i64,
    /// Size of the message file in bytes.
    pub size: u64,
    /// Maildir flag characters, e.g. "FS" or "N".
    pub flags: String,
    /// Containing maildir, relative to the scan root.
    pub maildir: String,
    /// Absolute path of the message file.
    pub path: String,
    /// Attachment file names.
    pub attachments: Vec<String>,
    pub has_attachment: bool,
}

impl Envelope {
    /// Build the tantivy document for this envelope; `body` is the indexed
    /// (not stored) message text.
    pub fn to_document(&self, body: &str) -> TantivyDocument {
        let f = SchemaTools::message_fields();
        let mut doc = TantivyDocument::new();
        doc.add_u64(f.f_id, self.id);
        doc.add_text(f.f_message_id, &self.message_id);
        doc.add_text(f.f_references, &self.references);
        if let Some(in_reply_to) = &self.in_reply_to {
            doc.add_text(f.f_in_reply_to, in_reply_to);
        }
        doc.add_text(f.f_subject, &self.subject);
        doc.add_text(f.f_text, body);
        doc.add_text(f.f_from, &self.from);
        doc.add_text(f.f_to, &self.to);
        doc.add_text(f.f_cc, &self.cc);
        doc.add_i64(f.f_date, self.date);
        doc.add_u64(f.f_size, self.size);
        doc.add_text(f.f_flags, &self.flags);
        doc.add_text(f.f_maildir, &self.maildir);
        doc.add_text(f.f_path, &self.path);
        for name in &self.attachments {
            doc.add_text(f.f_attachments, name);
        }
        doc.add_bool(f.f_has_attachment, self.has_attachment);
        doc
    }

    pub fn from_document(doc: &TantivyDocument) -> PapillonResult<Envelope> {
        let f = SchemaTools::message_fields();
        Ok(Envelope {
            id: doc
                .get_first(f.f_id)
                .and_then(|v| v.as_u64())
                .ok_or_else(|| missing("id"))?,
            message_id: text(doc, f.f_message_id),
            references: text(doc, f.f_references),
            in_reply_to: doc
                .get_first(f.f_in_reply_to)
                .and_then(|v| v.as_str())
                .map(str::to_string),
            subject: text(doc, f.f_subject),
            from: text(doc, f.f_from),
            to: text(doc, f.f_to),
            cc: text(doc, f.f_cc),
            date: doc
                .get_first(f.f_date)
                .and_then(|v| v.as_i64())
                .ok_or_else(|| missing("date"))?,
            size: doc
                .get_first(f.f_size)
                .and_then(|v| v.as_u64())
                .unwrap_or_default(),
            flags: text(doc, f.f_flags),
            maildir: text(doc, f.f_maildir),
            path: text(doc, f.f_path),
            attachments: doc
                .get_all(f.f_attachments)
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect(),
            has_attachment: doc
                .get_first(f.f_has_attachment)
                .and_then(|v| v.as_bool())
                .unwrap_or_default(),
        })
    }

    /// The value this envelope sorts by under the given field.
    pub fn sort_value(&self, field: SortField) -> SortValue {
        match field {
            SortField::Date => SortValue::Integer(self.date),
            SortField::Size => SortValue::Integer(self.size as i64),
            SortField::Subject => SortValue::Text(self.subject.to_lowercase()),
            SortField::From => SortValue::Text(self.from.to_lowercase()),
            SortField::To => SortValue::Text(self.to.to_lowercase()),
            SortField::MessageId => SortValue::Text(self.message_id.clone()),
            SortField::Maildir => SortValue::Text(self.maildir.clone()),
        }
    }
}

fn text(doc: &TantivyDocument, field: tantivy::schema::Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn missing(name: &str) -> crate::modules::error::PapillonError {
    raise_error!(
        format!("missing '{}' field in tantivy document", name),
        ErrorCode::IndexError
    )
}
