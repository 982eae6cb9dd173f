use std::fs;
use std::path::Path;

use tempfile::tempdir;

use crate::modules::indexer::manager::IndexManager;
use crate::modules::query::{
    run::run_query, MatchFlags, QueryFlags, SearchBackend, SortField,
};

fn message(
    message_id: &str,
    references: Option<&str>,
    subject: &str,
    date: &str,
    body: &str,
) -> String {
    let mut raw = String::new();
    raw.push_str(&format!("Message-ID: <{}>\r\n", message_id));
    if let Some(refs) = references {
        raw.push_str(&format!("References: {}\r\n", refs));
    }
    raw.push_str("From: Alice Example <alice@example.com>\r\n");
    raw.push_str("To: Bob Example <bob@example.com>\r\n");
    raw.push_str(&format!("Subject: {}\r\n", subject));
    raw.push_str(&format!("Date: {}\r\n", date));
    raw.push_str("\r\n");
    raw.push_str(body);
    raw.push_str("\r\n");
    raw
}

fn write_maildir(root: &Path) {
    let inbox = root.join("inbox");
    for sub in ["cur", "new", "tmp"] {
        fs::create_dir_all(inbox.join(sub)).unwrap();
    }
    fs::write(
        inbox.join("cur/1420106400.m1:2,S"),
        message(
            "root@example.com",
            None,
            "quarterly planning",
            "Thu, 1 Jan 2015 10:00:00 +0000",
            "kickoff agenda for project alpha",
        ),
    )
    .unwrap();
    fs::write(
        inbox.join("cur/1420110000.m2:2,S"),
        message(
            "reply-1@example.com",
            Some("<root@example.com>"),
            "Re: quarterly planning",
            "Thu, 1 Jan 2015 11:00:00 +0000",
            "sounds good to me",
        ),
    )
    .unwrap();
    fs::write(
        inbox.join("cur/1420113600.m3:2,RS"),
        message(
            "reply-2@example.com",
            Some("<root@example.com> <reply-1@example.com>"),
            "Re: quarterly planning",
            "Thu, 1 Jan 2015 12:00:00 +0000",
            "attaching the final numbers",
        ),
    )
    .unwrap();
    fs::write(
        inbox.join("new/1420102800.m4"),
        message(
            "lunch@example.com",
            None,
            "lunch tomorrow",
            "Thu, 1 Jan 2015 09:00:00 +0000",
            "same place as usual",
        ),
    )
    .unwrap();
}

#[tokio::test]
async fn index_and_search_roundtrip() {
    let temp_dir = tempdir().unwrap();
    let mail_root = temp_dir.path().join("mail");
    write_maildir(&mail_root);

    let manager = IndexManager::open(&temp_dir.path().join("index")).unwrap();
    let stats = manager.index_maildir(&mail_root).await.unwrap();
    assert_eq!(stats.indexed, 4);
    assert_eq!(stats.skipped, 0);
    assert_eq!(manager.total_messages().unwrap(), 4);

    let candidates = manager
        .search("subject:planning", SortField::Date, false)
        .unwrap();
    assert_eq!(candidates.len(), 3);
    let dates: Vec<i64> = candidates.iter().map(|c| c.envelope.date).collect();
    assert_eq!(dates, [1420106400, 1420110000, 1420113600]);
    assert_eq!(candidates[0].envelope.maildir, "/inbox");
    assert_eq!(candidates[0].envelope.flags, "S");

    let fetched = manager
        .fetch_by_identifier("root@example.com", SortField::Date)
        .unwrap();
    assert_eq!(
        fetched.unwrap().envelope.subject,
        "quarterly planning"
    );
    assert!(manager
        .fetch_by_identifier("nope@example.com", SortField::Date)
        .unwrap()
        .is_none());

    // messages in new/ carry the N flag
    let lunch = manager
        .fetch_by_identifier("lunch@example.com", SortField::Date)
        .unwrap()
        .unwrap();
    assert_eq!(lunch.envelope.flags, "N");
}

#[tokio::test]
async fn reindexing_is_an_upsert() {
    let temp_dir = tempdir().unwrap();
    let mail_root = temp_dir.path().join("mail");
    write_maildir(&mail_root);

    let manager = IndexManager::open(&temp_dir.path().join("index")).unwrap();
    manager.index_maildir(&mail_root).await.unwrap();
    manager.index_maildir(&mail_root).await.unwrap();
    assert_eq!(manager.total_messages().unwrap(), 4);
}

#[tokio::test]
async fn threaded_query_over_real_index() {
    let temp_dir = tempdir().unwrap();
    let mail_root = temp_dir.path().join("mail");
    write_maildir(&mail_root);

    let manager = IndexManager::open(&temp_dir.path().join("index")).unwrap();
    manager.index_maildir(&mail_root).await.unwrap();

    let matches = run_query(
        &manager,
        "subject:planning",
        "date",
        QueryFlags::THREADING,
        None,
    )
    .unwrap();
    let ids: Vec<&str> = matches
        .iter()
        .map(|m| m.envelope.message_id.as_str())
        .collect();
    assert_eq!(
        ids,
        ["root@example.com", "reply-1@example.com", "reply-2@example.com"]
    );
    assert_eq!(
        matches.iter().map(|m| m.thread_level).collect::<Vec<_>>(),
        [1, 2, 3]
    );
    assert!(matches[0].flags.contains(MatchFlags::ROOT));

    // only the leaf matches; related expansion completes the thread
    let matches = run_query(
        &manager,
        "final numbers",
        "date",
        QueryFlags::THREADING | QueryFlags::INCLUDE_RELATED,
        None,
    )
    .unwrap();
    let ids: Vec<&str> = matches
        .iter()
        .map(|m| m.envelope.message_id.as_str())
        .collect();
    assert_eq!(
        ids,
        ["root@example.com", "reply-1@example.com", "reply-2@example.com"]
    );
    assert!(matches[0].flags.contains(MatchFlags::RELATED));
    assert!(matches[1].flags.contains(MatchFlags::RELATED));
    assert!(!matches[2].flags.contains(MatchFlags::RELATED));

    // without relative inclusion the leaf is an orphaned root
    let matches = run_query(
        &manager,
        "final numbers",
        "date",
        QueryFlags::THREADING,
        None,
    )
    .unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].flags.contains(MatchFlags::ORPHAN));
}
