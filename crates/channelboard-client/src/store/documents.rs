use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};
use ulid::Ulid;

use crate::setup::SetupContext;
use crate::state::{map_sqlite_error, now_timestamp, open_connection};
use crate::{ClientError, ClientResult};

const MAX_COLLECTION_NAME_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    pub collection: String,
    pub fields: Map<String, Value>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub name: String,
    pub documents: i64,
}

/// JSON documents grouped into named collections, backed by the board
/// database.
pub struct DocumentStore {
    connection: Connection,
    db_path: PathBuf,
}

impl DocumentStore {
    pub fn open(setup: &SetupContext) -> ClientResult<Self> {
        Self::open_at(&setup.db_path)
    }

    pub(crate) fn open_at(db_path: &Path) -> ClientResult<Self> {
        let connection = open_connection(db_path)?;
        Ok(Self {
            connection,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn add(&self, collection: &str, fields: Map<String, Value>) -> ClientResult<Document> {
        validate_collection_name(collection)?;
        let doc_id = format!("doc_{}", Ulid::new());
        let timestamp = now_timestamp();
        let body = encode_body(&fields)?;

        self.connection
            .execute(
                "INSERT INTO internal_documents (doc_id, collection, body, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![&doc_id, collection, &body, &timestamp],
            )
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        info!(collection, doc_id = %doc_id, "document added");
        Ok(Document {
            id: doc_id,
            collection: collection.to_string(),
            fields,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        })
    }

    pub fn list(&self, collection: &str) -> ClientResult<Vec<Document>> {
        validate_collection_name(collection)?;
        let mut statement = self
            .connection
            .prepare(
                "SELECT doc_id, collection, body, created_at, updated_at
                 FROM internal_documents
                 WHERE collection = ?1
                 ORDER BY seq ASC",
            )
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        let rows_iter = statement
            .query_map([collection], read_stored_row)
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        let mut documents = Vec::new();
        for row in rows_iter {
            let stored = row.map_err(|error| map_sqlite_error(&self.db_path, &error))?;
            documents.push(stored.into_document(&self.db_path)?);
        }

        debug!(collection, count = documents.len(), "listed documents");
        Ok(documents)
    }

    pub fn get(&self, collection: &str, doc_id: &str) -> ClientResult<Document> {
        validate_collection_name(collection)?;
        find_document(&self.connection, &self.db_path, collection, doc_id)?
            .ok_or_else(|| ClientError::document_not_found(collection, doc_id))
    }

    /// Shallow merge: keys in `set` overwrite, keys in `unset` are removed.
    pub fn update(
        &mut self,
        collection: &str,
        doc_id: &str,
        set: Map<String, Value>,
        unset: &[String],
    ) -> ClientResult<Document> {
        validate_collection_name(collection)?;
        let db_path = self.db_path.clone();
        let transaction = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|error| map_sqlite_error(&db_path, &error))?;

        let mut document = find_document(&transaction, &db_path, collection, doc_id)?
            .ok_or_else(|| ClientError::document_not_found(collection, doc_id))?;

        for key in unset {
            document.fields.remove(key);
        }
        for (key, value) in set {
            document.fields.insert(key, value);
        }
        document.updated_at = now_timestamp();

        let body = encode_body(&document.fields)?;
        transaction
            .execute(
                "UPDATE internal_documents SET body = ?1, updated_at = ?2
                 WHERE collection = ?3 AND doc_id = ?4",
                params![&body, &document.updated_at, collection, doc_id],
            )
            .map_err(|error| map_sqlite_error(&db_path, &error))?;
        transaction
            .commit()
            .map_err(|error| map_sqlite_error(&db_path, &error))?;

        info!(collection, doc_id, "document updated");
        Ok(document)
    }

    pub fn delete(&self, collection: &str, doc_id: &str) -> ClientResult<()> {
        validate_collection_name(collection)?;
        let deleted = self
            .connection
            .execute(
                "DELETE FROM internal_documents WHERE collection = ?1 AND doc_id = ?2",
                params![collection, doc_id],
            )
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        if deleted == 0 {
            return Err(ClientError::document_not_found(collection, doc_id));
        }

        info!(collection, doc_id, "document deleted");
        Ok(())
    }

    pub fn collections(&self) -> ClientResult<Vec<CollectionSummary>> {
        let mut statement = self
            .connection
            .prepare(
                "SELECT collection, COUNT(*)
                 FROM internal_documents
                 GROUP BY collection
                 ORDER BY collection ASC",
            )
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        let rows_iter = statement
            .query_map([], |row| {
                Ok(CollectionSummary {
                    name: row.get(0)?,
                    documents: row.get(1)?,
                })
            })
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        let mut collections = Vec::new();
        for row in rows_iter {
            collections.push(row.map_err(|error| map_sqlite_error(&self.db_path, &error))?);
        }
        Ok(collections)
    }
}

pub fn validate_collection_name(name: &str) -> ClientResult<()> {
    let valid_chars = name
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if name.is_empty() || name.len() > MAX_COLLECTION_NAME_LEN || !valid_chars {
        return Err(ClientError::invalid_argument_with_recovery(
            &format!("Collection name `{name}` is not valid."),
            vec![
                "Use 1-64 characters from letters, digits, `_` and `-`.".to_string(),
                "Run `channelboard record collections` to see existing collections.".to_string(),
            ],
        ));
    }
    Ok(())
}

struct StoredRow {
    doc_id: String,
    collection: String,
    body: String,
    created_at: String,
    updated_at: String,
}

impl StoredRow {
    fn into_document(self, db_path: &Path) -> ClientResult<Document> {
        let parsed = serde_json::from_str::<Value>(&self.body)
            .map_err(|_| ClientError::store_corrupt(db_path))?;
        let Value::Object(fields) = parsed else {
            return Err(ClientError::store_corrupt(db_path));
        };

        Ok(Document {
            id: self.doc_id,
            collection: self.collection,
            fields,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn read_stored_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredRow> {
    Ok(StoredRow {
        doc_id: row.get(0)?,
        collection: row.get(1)?,
        body: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn find_document(
    connection: &Connection,
    db_path: &Path,
    collection: &str,
    doc_id: &str,
) -> ClientResult<Option<Document>> {
    let stored = connection
        .query_row(
            "SELECT doc_id, collection, body, created_at, updated_at
             FROM internal_documents
             WHERE collection = ?1 AND doc_id = ?2
             LIMIT 1",
            params![collection, doc_id],
            read_stored_row,
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    stored
        .map(|row| row.into_document(db_path))
        .transpose()
}

fn encode_body(fields: &Map<String, Value>) -> ClientResult<String> {
    serde_json::to_string(fields)
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))
}
