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

use tantivy::{
    collector::{DocSetCollector, TopDocs},
    indexer::UserOperation,
    query::{QueryParser, TermQuery},
    schema::IndexRecordOption,
    DocAddress, Index, IndexReader, IndexWriter, Searcher, TantivyDocument, Term,
};
use tokio::{sync::mpsc, task};
use tracing::warn;

use crate::{
    modules::{
        envelope::{extractor::extract_envelope, Envelope},
        error::{code::ErrorCode, PapillonResult},
        indexer::schema::SchemaTools,
        maildir,
        query::{Candidate, SearchBackend, SortField},
    },
    raise_error,
};

pub const WRITE_BATCH_SIZE: usize = 1000;
const WRITER_MEMORY_BUDGET: usize = 268_435_456;

pub enum WriteMessage {
    Document((u64, TantivyDocument)),
    Shutdown,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub indexed: u64,
    pub skipped: u64,
}

pub struct IndexManager {
    index: Index,
    reader: IndexReader,
    query_parser: QueryParser,
}

impl IndexManager {
    pub fn open(index_dir: &Path) -> PapillonResult<Self> {
        let index = Self::open_or_create_index(&index_dir.to_path_buf())?;
        let reader = index
            .reader()
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::IndexError))?;
        let mut query_parser = QueryParser::for_index(&index, SchemaTools::message_default_fields());
        query_parser.set_conjunction_by_default();
        Ok(Self {
            index,
            reader,
            query_parser,
        })
    }

    fn open_or_create_index(index_dir: &PathBuf) -> PapillonResult<Index> {
        if !index_dir.exists() {
            std::fs::create_dir_all(index_dir)?;
            Index::create_in_dir(index_dir, SchemaTools::message_schema()).map_err(|e| {
                raise_error!(
                    format!("failed to create index in {:?}: {}", index_dir, e),
                    ErrorCode::IndexError
                )
            })
        } else {
            Index::open_in_dir(index_dir).map_err(|e| {
                raise_error!(
                    format!("failed to open index in {:?}: {}", index_dir, e),
                    ErrorCode::IndexError
                )
            })
        }
    }

    /// Scan `root` for maildirs and (re)index every message file found.
    ///
    /// Parsing runs on a blocking task and feeds documents through a channel
    /// into a batching writer task; both are joined before returning, so the
    /// index is committed and the reader reloaded when this resolves.
    pub async fn index_maildir(&self, root: &Path) -> PapillonResult<IndexStats> {
        let files = maildir::scan(root)?;
        let writer = self
            .index
            .writer_with_num_threads(num_cpus::get().min(8), WRITER_MEMORY_BUDGET)
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::IndexError))?;

        let (sender, mut receiver) = mpsc::channel::<WriteMessage>(1000);
        let writer_task = task::spawn(async move {
            let mut writer = writer;
            let mut buffer: Vec<(u64, TantivyDocument)> = Vec::with_capacity(WRITE_BATCH_SIZE);
            loop {
                match receiver.recv().await {
                    Some(WriteMessage::Document((id, doc))) => {
                        buffer.push((id, doc));
                        if buffer.len() >= WRITE_BATCH_SIZE {
                            drain_and_commit(&mut writer, &mut buffer)?;
                        }
                    }
                    Some(WriteMessage::Shutdown) | None => {
                        drain_and_commit(&mut writer, &mut buffer)?;
                        break;
                    }
                }
            }
            Ok::<(), crate::modules::error::PapillonError>(())
        });

        let feeder = sender.clone();
        let parse_task = task::spawn_blocking(move || {
            let mut stats = IndexStats::default();
            for file in files {
                let bytes = match std::fs::read(&file.path) {
                    Ok(bytes) => bytes,
                    Err(error) => {
                        warn!("cannot read '{}': {}", file.path.display(), error);
                        stats.skipped += 1;
                        continue;
                    }
                };
                match extract_envelope(&bytes, &file.path, &file.maildir, &file.flags) {
                    Ok((envelope, body)) => {
                        let doc = envelope.to_document(&body);
                        if feeder
                            .blocking_send(WriteMessage::Document((envelope.id, doc)))
                            .is_err()
                        {
                            break;
                        }
                        stats.indexed += 1;
                    }
                    Err(error) => {
                        warn!("skipping '{}': {:?}", file.path.display(), error);
                        stats.skipped += 1;
                    }
                }
            }
            stats
        });

        let stats = parse_task
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))?;
        let _ = sender.send(WriteMessage::Shutdown).await;
        writer_task
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))??;

        self.reader
            .reload()
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::IndexError))?;
        Ok(stats)
    }

    pub fn total_messages(&self) -> PapillonResult<u64> {
        let searcher = self.create_searcher()?;
        Ok(searcher.num_docs())
    }

    fn create_searcher(&self) -> PapillonResult<Searcher> {
        self.reader
            .reload()
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::IndexError))?;
        Ok(self.reader.searcher())
    }

    fn load_envelope(
        searcher: &Searcher,
        address: DocAddress,
    ) -> PapillonResult<Envelope> {
        let doc: TantivyDocument = searcher
            .doc(address)
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::IndexError))?;
        Envelope::from_document(&doc)
    }
}

impl SearchBackend for IndexManager {
    fn search(
        &self,
        expr: &str,
        sort_field: SortField,
        descending: bool,
    ) -> PapillonResult<Vec<Candidate>> {
        let query = self
            .query_parser
            .parse_query(expr)
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InvalidParameter))?;
        let searcher = self.create_searcher()?;
        let addresses = searcher
            .search(&query, &DocSetCollector)
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::IndexError))?;

        // The collector yields a set; fix the order so repeated queries over
        // an unchanged index return an identical sequence.
        let mut addresses: Vec<DocAddress> = addresses.into_iter().collect();
        addresses.sort_unstable_by_key(|a| (a.segment_ord, a.doc_id));

        let mut candidates = Vec::with_capacity(addresses.len());
        for address in addresses {
            let envelope = Self::load_envelope(&searcher, address)?;
            candidates.push(Candidate::new(envelope, sort_field));
        }
        candidates.sort_by(|a, b| {
            let ordering = a.sort_key.cmp(&b.sort_key);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        Ok(candidates)
    }

    fn fetch_by_identifier(
        &self,
        id: &str,
        sort_field: SortField,
    ) -> PapillonResult<Option<Candidate>> {
        let fields = SchemaTools::message_fields();
        let term = Term::from_field_text(fields.f_message_id, id);
        let query = TermQuery::new(term, IndexRecordOption::Basic);
        let searcher = self.create_searcher()?;
        let docs = searcher
            .search(&query, &TopDocs::with_limit(1))
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::IndexError))?;
        match docs.first() {
            Some((_, address)) => {
                let envelope = Self::load_envelope(&searcher, *address)?;
                Ok(Some(Candidate::new(envelope, sort_field)))
            }
            None => Ok(None),
        }
    }
}

fn drain_and_commit(
    writer: &mut IndexWriter,
    buffer: &mut Vec<(u64, TantivyDocument)>,
) -> PapillonResult<()> {
    if buffer.is_empty() {
        return Ok(());
    }
    let fields = SchemaTools::message_fields();
    let mut operations = Vec::with_capacity(buffer.len() * 2);
    for (id, doc) in buffer.drain(..) {
        // delete-then-add, so re-indexing an unchanged maildir stays an upsert
        operations.push(UserOperation::Delete(Term::from_field_u64(
            fields.f_id,
            id,
        )));
        operations.push(UserOperation::Add(doc));
    }
    writer
        .run(operations)
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::IndexError))?;
    writer
        .commit()
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::IndexError))?;
    Ok(())
}
