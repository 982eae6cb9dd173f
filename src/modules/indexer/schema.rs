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


use std::sync::{Arc, LazyLock};

use crate::modules::indexer::fields::{MessageFields, *};
use tantivy::schema::{Field, INDEXED};
use tantivy::schema::{Schema, FAST, STORED, STRING, TEXT};

static MESSAGE_FIELDS: LazyLock<Arc<MessageFields>> = LazyLock::new(|| {
    let (_, fields) = SchemaTools::create_message_schema();
    Arc::new(fields)
});

pub struct SchemaTools;

impl SchemaTools {
    pub fn message_schema() -> Schema {
        let (schema, _) = Self::create_message_schema();
        schema
    }

    pub fn message_fields() -> &'static MessageFields {
        &MESSAGE_FIELDS
    }

    pub fn message_default_fields() -> Vec<Field> {
        let fields = Self::message_fields();
        vec![fields.f_subject, fields.f_text, fields.f_from]
    }

    pub fn create_message_schema() -> (Schema, MessageFields) {
        let mut builder = Schema::builder();
        // Document id: numeric, locate and upsert messages
        let f_id = builder.add_u64_field(F_ID, INDEXED | STORED | FAST);
        // Message-ID and reference chain: exact lookup, no tokenization
        let f_message_id = builder.add_text_field(F_MESSAGE_ID, STRING | STORED);
        let f_references = builder.add_text_field(F_REFERENCES, STORED);
        let f_in_reply_to = builder.add_text_field(F_IN_REPLY_TO, STORED);
        // Subject/body: tokenized for full-text search
        let f_subject = builder.add_text_field(F_SUBJECT, TEXT | STORED);
        let f_text = builder.add_text_field(F_TEXT, TEXT);
        // Addresses: tokenized so `from:alice` matches the local part
        let f_from = builder.add_text_field(F_FROM, TEXT | STORED);
        let f_to = builder.add_text_field(F_TO, TEXT | STORED);
        let f_cc = builder.add_text_field(F_CC, TEXT | STORED);
        // Date/size: numeric, range filtering and sorting
        let f_date = builder.add_i64_field(F_DATE, INDEXED | STORED | FAST);
        let f_size = builder.add_u64_field(F_SIZE, INDEXED | STORED | FAST);
        // Maildir metadata
        let f_flags = builder.add_text_field(F_FLAGS, STRING | STORED);
        let f_maildir = builder.add_text_field(F_MAILDIR, STRING | STORED);
        let f_path = builder.add_text_field(F_PATH, STRING | STORED);
        // Attachment names: exact-ish match search
        let f_attachments = builder.add_text_field(F_ATTACHMENTS, TEXT | STORED);
        let f_has_attachment = builder.add_bool_field(F_HAS_ATTACHMENT, INDEXED | STORED | FAST);
        let fields = MessageFields {
            f_id,
            f_message_id,
            f_references,
            f_in_reply_to,
            f_subject,
            f_text,
            f_from,
            f_to,
            f_cc,
            f_date,
            f_size,
            f_flags,
            f_maildir,
            f_path,
            f_attachments,
            f_has_attachment,
        };
        (builder.build(), fields)
    }
}
