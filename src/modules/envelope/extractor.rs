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


use std::path::Path;

use mail_parser::{Address, HeaderName, HeaderValue, MessageParser, MimeHeaders};

use crate::{
    modules::{
        common::AddrVec,
        envelope::Envelope,
        error::{code::ErrorCode, PapillonResult},
        utils::create_hash,
    },
    raise_error,
};

/// Parse a raw message file into an [`Envelope`] plus the body text used for
/// full-text indexing.
pub fn extract_envelope(
    bytes: &[u8],
    path: &Path,
    maildir: &str,
    flags: &str,
) -> PapillonResult<(Envelope, String)> {
    let message = MessageParser::default().parse(bytes).ok_or_else(|| {
        raise_error!(
            format!("failed to parse message file '{}'", path.display()),
            ErrorCode::InvalidParameter
        )
    })?;

    let mut references: Vec<String> = Vec::new();
    let mut in_reply_to: Option<String> = None;
    for header in message.root_part().headers() {
        match &header.name {
            HeaderName::References => push_ids(&header.value, &mut references),
            HeaderName::InReplyTo => {
                if in_reply_to.is_none() {
                    let mut ids = Vec::new();
                    push_ids(&header.value, &mut ids);
                    in_reply_to = ids.into_iter().next();
                }
            }
            _ => {}
        }
    }

    let attachments: Vec<String> = message
        .attachments()
        .filter_map(|part| part.attachment_name().map(str::to_string))
        .collect();

    let body = message
        .body_text(0)
        .map(|text| text.into_owned())
        .or_else(|| {
            message
                .body_html(0)
                .map(|html| html2text::from_read(html.as_bytes(), 80).unwrap_or_default())
        })
        .unwrap_or_default();

    let envelope = Envelope {
        id: create_hash(&path.to_string_lossy()),
        message_id: message.message_id().unwrap_or_default().to_string(),
        references: references.join(" "),
        in_reply_to,
        subject: message.subject().unwrap_or_default().to_string(),
        from: render_addresses(message.from()),
        to: render_addresses(message.to()),
        cc: render_addresses(message.cc()),
        date: message.date().map(|d| d.to_timestamp()).unwrap_or_default(),
        size: bytes.len() as u64,
        flags: flags.to_string(),
        maildir: maildir.to_string(),
        path: path.to_string_lossy().into_owned(),
        has_attachment: !attachments.is_empty(),
        attachments,
    };
    Ok((envelope, body))
}

fn push_ids(value: &HeaderValue, out: &mut Vec<String>) {
    match value {
        HeaderValue::Text(id) => out.push(id.to_string()),
        HeaderValue::TextList(ids) => out.extend(ids.iter().map(|id| id.to_string())),
        _ => {}
    }
}

fn render_addresses(address: Option<&Address>) -> String {
    address
        .map(|a| AddrVec::from(a).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"Message-ID: <reply-1@example.com>\r\n\
In-Reply-To: <root@example.com>\r\n\
References: <grandparent@example.com> <root@example.com>\r\n\
From: Alice Example <alice@example.com>\r\n\
To: Bob Example <bob@example.com>\r\n\
Subject: Re: quarterly planning\r\n\
Date: Thu, 1 Jan 2015 10:00:00 +0000\r\n\
\r\n\
Sounds good to me.\r\n";

    #[test]
    fn extracts_threading_headers() {
        let (envelope, body) = extract_envelope(
            SAMPLE,
            Path::new("/mail/inbox/cur/1:2,S"),
            "/inbox",
            "S",
        )
        .unwrap();
        assert_eq!(envelope.message_id, "reply-1@example.com");
        assert_eq!(
            envelope.references,
            "grandparent@example.com root@example.com"
        );
        assert_eq!(envelope.in_reply_to.as_deref(), Some("root@example.com"));
        assert_eq!(envelope.subject, "Re: quarterly planning");
        assert_eq!(envelope.from, "Alice Example <alice@example.com>");
        assert_eq!(envelope.date, 1420106400);
        assert_eq!(envelope.maildir, "/inbox");
        assert_eq!(envelope.flags, "S");
        assert!(!envelope.has_attachment);
        assert_eq!(body.trim(), "Sounds good to me.");
    }

    #[test]
    fn tolerates_messages_without_threading_headers() {
        let raw = b"From: carol@example.com\r\nSubject: hello\r\n\r\nhi\r\n";
        let (envelope, _) =
            extract_envelope(raw, Path::new("/mail/inbox/cur/2"), "/inbox", "").unwrap();
        assert!(envelope.message_id.is_empty());
        assert!(envelope.references.is_empty());
        assert!(envelope.in_reply_to.is_none());
        assert_eq!(envelope.date, 0);
    }

    #[test]
    fn rejects_unparsable_input() {
        assert!(extract_envelope(b"", Path::new("/mail/x"), "/", "").is_err());
    }
}
