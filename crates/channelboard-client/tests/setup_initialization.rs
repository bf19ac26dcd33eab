use std::fs;

use channelboard_client::setup::ensure_initialized_at;
use rusqlite::Connection;
use tempfile::tempdir;

fn object_exists(connection: &Connection, object_type: &str, object_name: &str) -> bool {
    connection
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2",
            [object_type, object_name],
            |_row| Ok(()),
        )
        .is_ok()
}

fn meta_value(connection: &Connection, key: &str) -> Option<String> {
    connection
        .query_row(
            "SELECT value FROM internal_meta WHERE key = ?1 LIMIT 1",
            [key],
            |row| row.get::<_, String>(0),
        )
        .ok()
}

fn user_version(connection: &Connection) -> Option<i64> {
    connection
        .query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))
        .ok()
}

#[test]
fn setup_creates_board_db_and_objects_dir_at_home_override() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("board-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            assert!(setup_context.db_path.ends_with("board.db"));
            assert_eq!(setup_context.schema_version, "v1");
            assert!(home.join("board.db").exists());
            assert!(home.join("objects").is_dir());
        }
    }
}

#[test]
fn setup_is_idempotent_and_migrates_once() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("board-home");

        let first = ensure_initialized_at(&home);
        let second = ensure_initialized_at(&home);
        assert!(first.is_ok());
        assert!(second.is_ok());

        if let (Ok(first_context), Ok(second_context)) = (first, second) {
            assert_eq!(first_context.db_path, second_context.db_path);
            let connection = Connection::open(&second_context.db_path);
            assert!(connection.is_ok());
            if let Ok(conn) = connection {
                assert_eq!(user_version(&conn), Some(1));
                assert!(object_exists(&conn, "table", "internal_documents"));
            }
        }
    }
}

#[test]
fn setup_repairs_missing_meta_key_and_index() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("board-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            let connection = Connection::open(&setup_context.db_path);
            assert!(connection.is_ok());
            if let Ok(conn) = connection {
                assert!(
                    conn.execute(
                        "DELETE FROM internal_meta WHERE key = ?1",
                        ["document_contract_version"],
                    )
                    .is_ok()
                );
                assert!(
                    conn.execute_batch("DROP INDEX idx_internal_documents_collection_seq;")
                        .is_ok()
                );
            }

            assert!(ensure_initialized_at(&home).is_ok());

            let verify_connection = Connection::open(&setup_context.db_path);
            assert!(verify_connection.is_ok());
            if let Ok(conn) = verify_connection {
                assert_eq!(
                    meta_value(&conn, "document_contract_version"),
                    Some("v1".to_string())
                );
                assert!(object_exists(
                    &conn,
                    "index",
                    "idx_internal_documents_collection_seq"
                ));
            }
        }
    }
}

#[test]
fn setup_fails_when_meta_value_drifts() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("board-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            let connection = Connection::open(&setup_context.db_path);
            assert!(connection.is_ok());
            if let Ok(conn) = connection {
                assert!(
                    conn.execute(
                        "UPDATE internal_meta SET value = 'v9' WHERE key = 'schema_version'",
                        [],
                    )
                    .is_ok()
                );
            }

            let failed = ensure_initialized_at(&home);
            assert!(failed.is_err());
            if let Err(error) = failed {
                assert_eq!(error.code, "store_corrupt");
            }
        }
    }
}

#[test]
fn setup_fails_when_core_table_missing() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("board-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            let connection = Connection::open(&setup_context.db_path);
            assert!(connection.is_ok());
            if let Ok(conn) = connection {
                assert!(conn.execute_batch("DROP TABLE internal_documents;").is_ok());
            }

            let failed = ensure_initialized_at(&home);
            assert!(failed.is_err());
            if let Err(error) = failed {
                assert_eq!(error.code, "store_corrupt");
                assert!(error.is_internal());
            }
        }
    }
}

#[test]
fn setup_maps_locked_database_to_store_locked() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("board-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            let connection = Connection::open(&setup_context.db_path);
            assert!(connection.is_ok());
            if let Ok(conn) = connection {
                assert!(conn.execute_batch("BEGIN EXCLUSIVE;").is_ok());

                let locked_error = ensure_initialized_at(&home);
                assert!(locked_error.is_err());
                if let Err(error) = locked_error {
                    assert_eq!(error.code, "store_locked");
                }

                assert!(conn.execute_batch("ROLLBACK;").is_ok());
            }
        }
    }
}

#[test]
fn setup_maps_corrupt_database_to_store_corrupt() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("board-home");
        assert!(fs::create_dir_all(&home).is_ok());
        assert!(fs::write(home.join("board.db"), "not-a-sqlite-database").is_ok());

        let result = ensure_initialized_at(&home);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "store_corrupt");
        }
    }
}
