//! Shared request state.

use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// State handed to every handler.
///
/// SQLite access is serialized behind a mutex-guarded connection; handlers
/// hold the guard only for synchronous repository calls and never across an
/// await point. Authentication is resolved per request from this state and
/// passed into handlers explicitly, never kept as ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub conn: Arc<Mutex<Connection>>,
    pub media_dir: PathBuf,
}

impl AppState {
    pub fn new(conn: Connection, media_dir: PathBuf) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            media_dir,
        }
    }
}
