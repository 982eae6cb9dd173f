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


use std::path::{Path, PathBuf};

use crate::{
    modules::error::{code::ErrorCode, PapillonResult},
    raise_error,
};

/// Marker file that excludes a maildir (and everything below it) from indexing.
const NOINDEX_MARKER: &str = ".noindex";

/// A single message file found during a maildir scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFile {
    /// Absolute path of the message file.
    pub path: PathBuf,
    /// Path of the containing maildir relative to the scan root, `/`-prefixed.
    pub maildir: String,
    /// Maildir flag characters, plus `N` for messages in `new/`.
    pub flags: String,
}

/// Recursively collect the message files of every maildir under `root`.
///
/// A directory counts as a maildir when it has both a `cur` and a `new`
/// subdirectory; messages are taken from those two, never from `tmp`.
pub fn scan(root: &Path) -> PapillonResult<Vec<MessageFile>> {
    if !root.is_dir() {
        return Err(raise_error!(
            format!("'{}' is not a readable directory", root.display()),
            ErrorCode::ResourceNotFound
        ));
    }
    let mut files = Vec::new();
    walk(root, root, &mut files)?;
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

fn walk(root: &Path, dir: &Path, files: &mut Vec<MessageFile>) -> PapillonResult<()> {
    if dir.join(NOINDEX_MARKER).exists() {
        tracing::debug!("skipping '{}': found {}", dir.display(), NOINDEX_MARKER);
        return Ok(());
    }

    let cur = dir.join("cur");
    let new = dir.join("new");
    if cur.is_dir() && new.is_dir() {
        let maildir = maildir_name(root, dir);
        collect(&cur, &maildir, false, files)?;
        collect(&new, &maildir, true, files)?;
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if matches!(name.to_str(), Some("cur") | Some("new") | Some("tmp")) {
            continue;
        }
        walk(root, &entry.path(), files)?;
    }
    Ok(())
}

fn collect(
    dir: &Path,
    maildir: &str,
    new: bool,
    files: &mut Vec<MessageFile>,
) -> PapillonResult<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let flags = flags_from_path(&path, new);
        files.push(MessageFile {
            path,
            maildir: maildir.to_string(),
            flags,
        });
    }
    Ok(())
}

fn maildir_name(root: &Path, dir: &Path) -> String {
    match dir.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => "/".to_string(),
        Ok(rel) => format!("/{}", rel.to_string_lossy()),
        Err(_) => dir.to_string_lossy().into_owned(),
    }
}

/// Maildir flags encoded in the `:2,<flags>` filename suffix, in the order
/// they appear; `N` is added for messages living in `new/`.
pub fn flags_from_path(path: &Path, new: bool) -> String {
    let mut flags = String::new();
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if let Some(idx) = name.rfind(":2,") {
            for c in name[idx + 3..].chars() {
                if matches!(c, 'D' | 'F' | 'P' | 'R' | 'S' | 'T') && !flags.contains(c) {
                    flags.push(c);
                }
            }
        }
    }
    if new {
        flags.push('N');
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn make_maildir(root: &Path, name: &str) -> PathBuf {
        let dir = root.join(name);
        for sub in ["cur", "new", "tmp"] {
            fs::create_dir_all(dir.join(sub)).unwrap();
        }
        dir
    }

    #[test]
    fn scans_cur_and_new_but_not_tmp() {
        let tmp = tempdir().unwrap();
        let inbox = make_maildir(tmp.path(), "inbox");
        fs::write(inbox.join("cur/1618.abc:2,S"), "x").unwrap();
        fs::write(inbox.join("new/1619.def"), "x").unwrap();
        fs::write(inbox.join("tmp/1620.ghi"), "x").unwrap();

        let files = scan(tmp.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.maildir == "/inbox"));
        let cur = files.iter().find(|f| f.flags == "S").unwrap();
        assert!(cur.path.ends_with("cur/1618.abc:2,S"));
        let new = files.iter().find(|f| f.flags == "N").unwrap();
        assert!(new.path.ends_with("new/1619.def"));
    }

    #[test]
    fn noindex_marker_excludes_subtree() {
        let tmp = tempdir().unwrap();
        let inbox = make_maildir(tmp.path(), "inbox");
        fs::write(inbox.join("cur/1.msg"), "x").unwrap();
        let spam = make_maildir(tmp.path(), "spam");
        fs::write(spam.join("cur/2.msg"), "x").unwrap();
        fs::write(spam.join(".noindex"), "").unwrap();

        let files = scan(tmp.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].maildir, "/inbox");
    }

    #[test]
    fn nested_maildirs_are_found() {
        let tmp = tempdir().unwrap();
        let lists = make_maildir(tmp.path(), "lists/rust");
        fs::write(lists.join("cur/1.msg"), "x").unwrap();

        let files = scan(tmp.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].maildir, "/lists/rust");
    }

    #[test]
    fn filename_flags_are_parsed() {
        assert_eq!(flags_from_path(Path::new("a/cur/1:2,FRS"), false), "FRS");
        assert_eq!(flags_from_path(Path::new("a/cur/1:2,SXq"), false), "S");
        assert_eq!(flags_from_path(Path::new("a/new/1"), true), "N");
        assert_eq!(flags_from_path(Path::new("a/cur/1"), false), "");
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(scan(Path::new("/nonexistent/papillon-test")).is_err());
    }
}
