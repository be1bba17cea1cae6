//! Integration tests against the SQLite backend
//!
//! These exercise the full stack — session, scope guards, statement glue,
//! driver — against real SQLite databases, checking that lifecycle behavior
//! is observable in the stored data: commits persist, rollbacks don't, and
//! connections live exactly as long as their outermost scope.

#![cfg(feature = "sqlite")]

use dbscope::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn file_engine(dir: &TempDir, name: &str) -> Engine {
    let path = dir.path().join(name);
    engine_for(&path)
}

fn engine_for(path: &Path) -> Engine {
    init_tracing();
    Engine::new(
        SqliteDriver::new(),
        ConnectConfig::new().database(path.to_string_lossy()),
    )
}

fn create_users_table(session: &Session) {
    session
        .update(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, active INTEGER)",
            &[],
        )
        .expect("Failed to create table");
}

#[test]
fn test_crud_roundtrip() {
    let dir = TempDir::new().unwrap();
    let session = file_engine(&dir, "crud.db").session();
    create_users_table(&session);

    let affected = session
        .insert(
            "users",
            &[
                ("id", Value::Int(1)),
                ("name", Value::from("alice")),
                ("active", Value::Int(1)),
            ],
        )
        .expect("Failed to insert");
    assert_eq!(affected, 1);

    session
        .insert(
            "users",
            &[
                ("id", Value::Int(2)),
                ("name", Value::from("bob")),
                ("active", Value::Int(0)),
            ],
        )
        .expect("Failed to insert");

    let rows = session
        .select("SELECT id, name FROM users ORDER BY id", &[])
        .expect("Failed to select");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("name").unwrap(), &Value::Text("alice".into()));
    assert_eq!(rows[1].get("id").unwrap(), &Value::Int(2));

    let row = session
        .select_one("SELECT name FROM users WHERE id = ?", &[Value::Int(2)])
        .expect("Failed to select_one")
        .expect("Expected a row");
    assert_eq!(row.get("name").unwrap(), &Value::Text("bob".into()));

    let count = session
        .select_scalar("SELECT COUNT(*) FROM users WHERE active = ?", &[Value::Int(1)])
        .expect("Failed to select_scalar");
    assert_eq!(count, Value::Int(1));

    let affected = session
        .update("UPDATE users SET active = ? WHERE id = ?", &[Value::Int(1), Value::Int(2)])
        .expect("Failed to update");
    assert_eq!(affected, 1);
}

#[test]
fn test_select_shapes_on_empty_results() {
    let dir = TempDir::new().unwrap();
    let session = file_engine(&dir, "empty.db").session();
    create_users_table(&session);

    let rows = session.select("SELECT * FROM users", &[]).unwrap();
    assert!(rows.is_empty());

    let row = session.select_one("SELECT * FROM users", &[]).unwrap();
    assert!(row.is_none());

    let err = session
        .select_scalar("SELECT id FROM users", &[])
        .unwrap_err();
    assert!(matches!(err, DbError::NoRows));

    // width checks happen before value extraction
    session
        .insert("users", &[("id", Value::Int(1)), ("name", Value::from("a"))])
        .unwrap();
    let err = session
        .select_scalar("SELECT id, name FROM users", &[])
        .unwrap_err();
    assert!(matches!(err, DbError::MultiColumn { count: 2 }));
}

#[test]
fn test_record_lookup_is_checked() {
    let dir = TempDir::new().unwrap();
    let session = file_engine(&dir, "lookup.db").session();
    create_users_table(&session);
    session
        .insert("users", &[("id", Value::Int(1)), ("name", Value::from("a"))])
        .unwrap();

    let row = session
        .select_one("SELECT id, name FROM users", &[])
        .unwrap()
        .unwrap();
    assert_eq!(row.columns(), &["id", "name"]);
    let err = row.get("email").unwrap_err();
    assert!(matches!(err, DbError::ColumnNotFound(ref c) if c == "email"));
}

#[test]
fn test_transaction_commit_is_visible_afterwards() {
    let dir = TempDir::new().unwrap();
    let engine = file_engine(&dir, "commit.db");
    let session = engine.session();
    create_users_table(&session);

    session
        .with_transaction(|s| {
            s.insert("users", &[("id", Value::Int(1)), ("name", Value::from("a"))])?;
            s.insert("users", &[("id", Value::Int(2)), ("name", Value::from("b"))])?;
            Ok(())
        })
        .expect("Transaction failed");

    // a fresh session sees the committed rows
    let other = engine.session();
    let count = other
        .select_scalar("SELECT COUNT(*) FROM users", &[])
        .unwrap();
    assert_eq!(count, Value::Int(2));
}

#[test]
fn test_transaction_rollback_discards_everything() {
    let dir = TempDir::new().unwrap();
    let engine = file_engine(&dir, "rollback.db");
    let session = engine.session();
    create_users_table(&session);

    let err = session
        .with_transaction::<(), _>(|s| {
            s.insert("users", &[("id", Value::Int(1)), ("name", Value::from("a"))])?;
            Err(DbError::configuration("forced failure"))
        })
        .unwrap_err();
    assert!(matches!(err, DbError::Configuration(_)));

    let count = session
        .select_scalar("SELECT COUNT(*) FROM users", &[])
        .unwrap();
    assert_eq!(count, Value::Int(0));
}

#[test]
fn test_nested_scopes_commit_together() {
    let dir = TempDir::new().unwrap();
    let engine = file_engine(&dir, "nested.db");
    let session = engine.session();
    create_users_table(&session);

    session
        .with_transaction(|s| {
            s.insert("users", &[("id", Value::Int(1)), ("name", Value::from("outer"))])?;
            s.with_transaction(|inner| {
                assert_eq!(inner.transaction_depth(), 2);
                inner.insert("users", &[("id", Value::Int(2)), ("name", Value::from("inner"))])
            })?;
            Ok(())
        })
        .expect("Transaction failed");

    let count = session
        .select_scalar("SELECT COUNT(*) FROM users", &[])
        .unwrap();
    assert_eq!(count, Value::Int(2));
}

#[test]
fn test_inner_failure_rolls_back_outer_statements() {
    let dir = TempDir::new().unwrap();
    let engine = file_engine(&dir, "inner_fail.db");
    let session = engine.session();
    create_users_table(&session);

    let result = session.with_transaction::<(), _>(|s| {
        s.insert("users", &[("id", Value::Int(1)), ("name", Value::from("outer"))])?;
        s.with_transaction::<(), _>(|_| Err(DbError::configuration("inner failure")))
    });
    assert!(result.is_err());

    // the outer insert was part of the same composite transaction
    let count = session
        .select_scalar("SELECT COUNT(*) FROM users", &[])
        .unwrap();
    assert_eq!(count, Value::Int(0));
}

#[test]
fn test_connection_scope_bounds_the_connection() {
    // in-memory databases live exactly as long as their connection
    init_tracing();
    let engine = Engine::new(SqliteDriver::new(), ConnectConfig::new().database(":memory:"));
    let session = engine.session();

    session
        .with_connection(|s| {
            s.update("CREATE TABLE scratch (id INTEGER)", &[])?;
            s.update("INSERT INTO scratch (id) VALUES (?)", &[Value::Int(1)])?;
            let count = s.select_scalar("SELECT COUNT(*) FROM scratch", &[])?;
            assert_eq!(count, Value::Int(1));
            Ok(())
        })
        .expect("Scoped work failed");

    // the scope exit closed the connection, so the table is gone
    let err = session.select("SELECT * FROM scratch", &[]).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

#[test]
fn test_independent_units_have_independent_state() {
    let dir = TempDir::new().unwrap();
    let engine_a = file_engine(&dir, "unit_a.db");
    let engine_b = file_engine(&dir, "unit_b.db");

    let handles = [
        std::thread::spawn(move || {
            let session = engine_a.session();
            create_users_table(&session);
            session.with_transaction(|s| {
                s.insert("users", &[("id", Value::Int(1)), ("name", Value::from("a"))])
            })?;
            session.select_scalar("SELECT COUNT(*) FROM users", &[])
        }),
        std::thread::spawn(move || {
            let session = engine_b.session();
            create_users_table(&session);
            session.with_transaction(|s| {
                s.insert("users", &[("id", Value::Int(1)), ("name", Value::from("b"))])?;
                s.insert("users", &[("id", Value::Int(2)), ("name", Value::from("c"))])
            })?;
            session.select_scalar("SELECT COUNT(*) FROM users", &[])
        }),
    ];

    let counts: Vec<Value> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    assert_eq!(counts, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_update_outside_transaction_is_immediately_durable() {
    let dir = TempDir::new().unwrap();
    let engine = file_engine(&dir, "autocommit.db");

    let session = engine.session();
    create_users_table(&session);
    session
        .insert("users", &[("id", Value::Int(1)), ("name", Value::from("a"))])
        .unwrap();

    // a completely separate session (new physical connection) sees the row
    let other = engine.session();
    let count = other
        .select_scalar("SELECT COUNT(*) FROM users", &[])
        .unwrap();
    assert_eq!(count, Value::Int(1));
}
