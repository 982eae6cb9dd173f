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


#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCode {
    // Client-side errors (10000–10999)
    InvalidParameter = 10000,
    MissingConfiguration = 10020,

    // Resource errors (30000–30999)
    ResourceNotFound = 30000,
    NoMatches = 30010,

    // Index errors (50000–50999)
    IndexError = 50000,

    // Internal system errors (70000–70999)
    InternalError = 70000,
    IoError = 70020,
}

impl ErrorCode {
    /// Process exit code reported to the shell for this class of error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::InvalidParameter | ErrorCode::MissingConfiguration => 2,
            ErrorCode::ResourceNotFound => 3,
            ErrorCode::NoMatches => 4,
            ErrorCode::IoError => 5,
            ErrorCode::IndexError | ErrorCode::InternalError => 1,
        }
    }
}
