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


use std::io::Cursor;

#[macro_export]
macro_rules! raise_error {
    ($message:expr, $code:expr) => {
        $crate::modules::error::PapillonError::Generic {
            message: $message,
            location: snafu::Location::default(),
            code: $code,
        }
    };
}

/// Stable 64-bit hash of a message path; identifies a document across runs.
pub fn create_hash(input: &str) -> u64 {
    let mut cursor = Cursor::new(input.as_bytes());
    murmur3::murmur3_x64_128(&mut cursor, 0)
        .map(|hash| hash as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_distinct() {
        let a = create_hash("/mail/inbox/cur/1");
        let b = create_hash("/mail/inbox/cur/2");
        assert_eq!(a, create_hash("/mail/inbox/cur/1"));
        assert_ne!(a, b);
    }
}
