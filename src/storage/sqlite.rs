//! SQLite-backed student storage.
//!
//! # Invariants
//! - The `students` table exists before any handle is returned.
//! - Statements are prepared per call and dropped at scope end on every path.
//! - Writes go through one connection; reads round-robin over a pool of
//!   read-only connections, so readers never queue behind a writer.
//! - File databases run in WAL mode; SQLite alone orders concurrent access.
//! - In-memory databases cannot be shared across connections and read
//!   through the write connection.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use tracing::{debug, error, info};

use super::errors::{StorageError, StorageResult};
use super::StudentStorage;
use crate::model::{Student, StudentId, StudentInput};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    email TEXT,
    age INTEGER
)";

const STUDENT_SELECT_SQL: &str = "SELECT id, name, email, age FROM students";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Read-only connections opened next to the writer for file databases.
const READ_POOL_SIZE: usize = 4;

/// Student storage over one write connection and a read pool.
#[derive(Clone)]
pub struct SqliteStorage {
    write_connection: Arc<Mutex<Connection>>,
    read_connections: Arc<Vec<Mutex<Connection>>>,
    next_reader: Arc<AtomicUsize>,
}

impl SqliteStorage {
    /// Open (creating if needed) a database file and ensure the schema.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();
        info!(path = %path.display(), "opening student storage");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::Unavailable(format!(
                    "failed to create storage directory `{}`: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let conn = Connection::open(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to open storage");
            StorageError::Unavailable(e.to_string())
        })?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        let write_connection = bootstrap(conn)?;

        let read_connections = (0..READ_POOL_SIZE)
            .map(|_| open_reader(path))
            .collect::<StorageResult<Vec<_>>>()?;

        info!(
            path = %path.display(),
            readers = read_connections.len(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "student storage ready"
        );
        Ok(Self::from_parts(write_connection, read_connections))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(Self::from_parts(bootstrap(conn)?, Vec::new()))
    }

    fn from_parts(write_connection: Connection, read_connections: Vec<Connection>) -> Self {
        Self {
            write_connection: Arc::new(Mutex::new(write_connection)),
            read_connections: Arc::new(read_connections.into_iter().map(Mutex::new).collect()),
            next_reader: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn read_connection(&self) -> &Mutex<Connection> {
        if self.read_connections.is_empty() {
            return &self.write_connection;
        }
        let index = self.next_reader.fetch_add(1, Ordering::Relaxed) % self.read_connections.len();
        &self.read_connections[index]
    }

    /// Number of rows in the table.
    pub fn count(&self) -> StorageResult<i64> {
        let conn = lock(self.read_connection())?;
        conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
            .map_err(StorageError::query)
    }
}

fn bootstrap(conn: Connection) -> StorageResult<Connection> {
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
    conn.execute_batch(CREATE_TABLE_SQL)
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
    Ok(conn)
}

fn open_reader(path: &Path) -> StorageResult<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags)
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
    Ok(conn)
}

fn lock(conn: &Mutex<Connection>) -> StorageResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| StorageError::Unavailable("connection mutex poisoned".to_string()))
}

fn select_by_id(conn: &Connection, id: StudentId) -> StorageResult<Student> {
    let mut stmt = conn
        .prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1 LIMIT 1"))
        .map_err(StorageError::query)?;

    stmt.query_row(params![id], parse_student_row)
        .optional()
        .map_err(StorageError::query)?
        .ok_or(StorageError::NotFound(id))
}

fn parse_student_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        age: row.get("age")?,
    })
}

impl StudentStorage for SqliteStorage {
    fn create(&self, input: &StudentInput) -> StorageResult<StudentId> {
        let conn = lock(&self.write_connection)?;
        let mut stmt = conn
            .prepare("INSERT INTO students (name, email, age) VALUES (?1, ?2, ?3)")
            .map_err(StorageError::write)?;

        let id = stmt
            .insert(params![input.name, input.email, input.age])
            .map_err(StorageError::write)?;

        debug!(id, "inserted student row");
        Ok(id)
    }

    fn get_by_id(&self, id: StudentId) -> StorageResult<Student> {
        let conn = lock(self.read_connection())?;
        select_by_id(&conn, id)
    }

    fn get_all(&self) -> StorageResult<Vec<Student>> {
        let conn = lock(self.read_connection())?;
        let mut stmt = conn
            .prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY id ASC"))
            .map_err(StorageError::query)?;

        let rows = stmt
            .query_map([], parse_student_row)
            .map_err(StorageError::query)?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StorageError::query)
    }

    fn update_by_id(&self, id: StudentId, input: &StudentInput) -> StorageResult<Student> {
        let conn = lock(&self.write_connection)?;
        let changed = {
            let mut stmt = conn
                .prepare("UPDATE students SET name = ?1, email = ?2, age = ?3 WHERE id = ?4")
                .map_err(StorageError::write)?;
            stmt.execute(params![input.name, input.email, input.age, id])
                .map_err(StorageError::write)?
        };

        if changed == 0 {
            return Err(StorageError::NotFound(id));
        }

        select_by_id(&conn, id)
    }

    fn delete_by_id(&self, id: StudentId) -> StorageResult<bool> {
        let conn = lock(&self.write_connection)?;
        let mut stmt = conn
            .prepare("DELETE FROM students WHERE id = ?1")
            .map_err(StorageError::write)?;

        let removed = stmt.execute(params![id]).map_err(StorageError::write)?;
        Ok(removed > 0)
    }
}
