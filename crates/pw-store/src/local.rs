//! DuckDB-backed local document store
//!
//! Holds a dataset export (NDJSON) in a single `documents` table so a
//! migration can be rehearsed end to end without touching the hosted
//! dataset. Filters are evaluated in-process; the table only narrows by
//! document type.

use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;
use async_trait::async_trait;
use duckdb::{Connection, OptionalExt};
use pw_core::{Document, PatchOp, Query};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS documents (
    id       VARCHAR PRIMARY KEY,
    doc_type VARCHAR NOT NULL,
    rev      VARCHAR NOT NULL,
    body     VARCHAR NOT NULL
)";

/// Local document store on DuckDB
pub struct LocalStore {
    conn: Mutex<Connection>,
}

impl LocalStore {
    /// Create a new in-memory store
    pub fn in_memory() -> StoreResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        Self::init(conn)
    }

    /// Open (or create) a store file
    pub fn from_path(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        Self::init(conn)
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> StoreResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| StoreError::ConnectionError(format!("failed to create schema: {e}")))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::MutexPoisoned(e.to_string()))
    }

    /// Insert or replace a document. Documents without a revision get one.
    pub fn insert(&self, doc: &Document) -> StoreResult<()> {
        let conn = self.lock()?;
        upsert(&conn, doc)
    }

    /// Load a single document by ID
    pub fn get(&self, id: &str) -> StoreResult<Option<Document>> {
        let conn = self.lock()?;
        load(&conn, id)
    }

    pub fn count(&self) -> StoreResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Load an NDJSON dataset export in one transaction. Blank lines are
    /// ignored; any malformed line aborts the whole import.
    pub fn import_ndjson<R: BufRead>(&self, reader: R) -> StoreResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut imported = 0;

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| StoreError::DecodeError(format!("line {}: {e}", index + 1)))?;
            if line.trim().is_empty() {
                continue;
            }
            let value: serde_json::Value = serde_json::from_str(&line)
                .map_err(|e| StoreError::DecodeError(format!("line {}: {e}", index + 1)))?;
            let doc = Document::from_value(value)
                .map_err(|e| StoreError::DecodeError(format!("line {}: {e}", index + 1)))?;
            upsert(&tx, &doc)?;
            imported += 1;
        }

        tx.commit()?;
        log::debug!("Imported {imported} documents");
        Ok(imported)
    }

    /// Write every document as NDJSON, ordered by ID
    pub fn export_ndjson<W: Write>(&self, mut writer: W) -> StoreResult<usize> {
        let docs = {
            let conn = self.lock()?;
            select_bodies(&conn, None)?
        };
        for doc in &docs {
            let line = serde_json::to_string(doc)
                .map_err(|e| StoreError::Internal(e.to_string()))?;
            writeln!(writer, "{line}").map_err(|e| StoreError::Internal(e.to_string()))?;
        }
        Ok(docs.len())
    }
}

fn new_revision() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn upsert(conn: &Connection, doc: &Document) -> StoreResult<()> {
    let mut stored = doc.clone();
    let rev = stored.rev.get_or_insert_with(new_revision).clone();
    let body = serde_json::to_string(&stored).map_err(|e| StoreError::Internal(e.to_string()))?;
    conn.execute(
        "INSERT OR REPLACE INTO documents (id, doc_type, rev, body) VALUES (?, ?, ?, ?)",
        duckdb::params![stored.id.as_str(), stored.doc_type.as_str(), rev, body],
    )?;
    Ok(())
}

fn load(conn: &Connection, id: &str) -> StoreResult<Option<Document>> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM documents WHERE id = ?",
            duckdb::params![id],
            |row| row.get(0),
        )
        .optional()?;
    body.map(|b| decode(&b)).transpose()
}

fn decode(body: &str) -> StoreResult<Document> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| StoreError::DecodeError(e.to_string()))?;
    Ok(Document::from_value(value)?)
}

fn select_bodies(conn: &Connection, doc_type: Option<&str>) -> StoreResult<Vec<Document>> {
    let (sql, params): (&str, Vec<&str>) = match doc_type {
        Some(t) => (
            "SELECT body FROM documents WHERE doc_type = ? ORDER BY id",
            vec![t],
        ),
        None => ("SELECT body FROM documents ORDER BY id", Vec::new()),
    };

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(duckdb::params_from_iter(params), |row| {
        row.get::<_, String>(0)
    })?;

    let mut docs = Vec::new();
    for body in rows {
        docs.push(decode(&body?)?);
    }
    Ok(docs)
}

/// Apply one patch inside an open transaction.
fn apply_patch(conn: &Connection, op: &PatchOp) -> StoreResult<()> {
    let id = op.document_id.as_str();
    let mut doc = load(conn, id)?.ok_or_else(|| StoreError::DocumentNotFound(id.to_string()))?;

    if let Some(expected) = &op.if_revision {
        let found = doc.rev.clone().unwrap_or_default();
        if *expected != found {
            return Err(StoreError::RevisionConflict {
                document_id: id.to_string(),
                expected: expected.clone(),
                found,
            });
        }
    }

    op.apply_to(&mut doc)
        .map_err(|e| StoreError::PatchRejected {
            document_id: id.to_string(),
            message: e.to_string(),
        })?;
    doc.rev = Some(new_revision());
    upsert(conn, &doc)
}

#[async_trait]
impl DocumentStore for LocalStore {
    async fn fetch(&self, query: &Query) -> StoreResult<Vec<Document>> {
        let conn = self.lock()?;
        let doc_type = query.filter.required_type().map(|t| t.as_str());
        let docs = select_bodies(&conn, doc_type)
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        Ok(docs.into_iter().filter(|doc| query.matches(doc)).collect())
    }

    async fn patch(&self, op: &PatchOp) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        apply_patch(&tx, op)?;
        tx.commit()?;
        Ok(())
    }

    async fn commit(&self, transaction_id: &str, ops: &[PatchOp]) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for op in ops {
            // Dropping `tx` without commit rolls back everything applied so far
            apply_patch(&tx, op).map_err(|e| StoreError::TransactionRejected {
                transaction_id: transaction_id.to_string(),
                message: e.to_string(),
            })?;
        }
        tx.commit()
            .map_err(|e| StoreError::TransactionRejected {
                transaction_id: transaction_id.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn store_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "local_test.rs"]
mod tests;
