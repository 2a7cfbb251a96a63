use super::{Entrant, EntrantStore, NewEntrant};
use crate::error::{Result, WaitlistError};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Full row as it would sit in `waiting_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntrant {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub interest: Option<String>,
    pub message: Option<String>,
}

/// In-process stand-in for PostgreSQL with the same uniqueness rule on `email`.
pub struct MemoryEntrantStore {
    rows: Mutex<Vec<StoredEntrant>>,
    schema_ready: AtomicBool,
    schema_creations: AtomicUsize,
    available: AtomicBool,
}

impl MemoryEntrantStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            schema_ready: AtomicBool::new(false),
            schema_creations: AtomicUsize::new(0),
            available: AtomicBool::new(true),
        }
    }

    /// A store whose table already exists.
    pub fn ready() -> Self {
        let store = Self::new();
        store.schema_ready.store(true, Ordering::SeqCst);
        store
    }

    /// Simulate the database going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<StoredEntrant> {
        self.rows.lock().unwrap().clone()
    }

    /// How many times the table was actually created.
    pub fn schema_creations(&self) -> usize {
        self.schema_creations.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(WaitlistError::StorageUnavailable {
                cause: "connection refused".to_string(),
            })
        }
    }
}

#[async_trait]
impl EntrantStore for MemoryEntrantStore {
    async fn ensure_schema(&self) -> Result<()> {
        self.check_available()?;

        // CREATE TABLE IF NOT EXISTS
        if self
            .schema_ready
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            self.schema_creations.fetch_add(1, Ordering::SeqCst);
        }

        Ok(())
    }

    async fn register_entrant(&self, entry: NewEntrant) -> Result<Entrant> {
        self.check_available()?;

        if !self.schema_ready.load(Ordering::SeqCst) {
            return Err(WaitlistError::StorageUnavailable {
                cause: "relation \"waiting_list\" does not exist".to_string(),
            });
        }

        let mut rows = self.rows.lock().unwrap();

        if rows.iter().any(|row| row.email == entry.email) {
            return Err(WaitlistError::DuplicateEmail { email: entry.email });
        }

        let id = rows.len() as i32 + 1;
        rows.push(StoredEntrant {
            id,
            email: entry.email.clone(),
            name: entry.name.clone(),
            interest: entry.interest,
            message: entry.message,
        });

        Ok(Entrant {
            id,
            email: entry.email,
            name: entry.name,
            created_at: Utc::now().naive_utc(),
        })
    }

    async fn ping(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}
