use super::{Entrant, EntrantStore, NewEntrant};
use crate::error::{Result, WaitlistError};
use async_trait::async_trait;
use deadpool_postgres::{Object, Pool};
use tokio_postgres::error::SqlState;
use tracing::{debug, warn};

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS waiting_list (
        id SERIAL PRIMARY KEY,
        email VARCHAR(255) UNIQUE NOT NULL,
        name VARCHAR(255) NOT NULL,
        interest VARCHAR(100),
        message TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

const INSERT_ENTRANT_SQL: &str = r#"
    INSERT INTO waiting_list (email, name, interest, message)
    VALUES ($1, $2, $3, $4)
    RETURNING id, email, name, created_at
"#;

pub struct PgEntrantStore {
    pool: Pool,
}

impl PgEntrantStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn client(&self) -> Result<Object> {
        self.pool.get().await.map_err(WaitlistError::from)
    }
}

#[async_trait]
impl EntrantStore for PgEntrantStore {
    async fn ensure_schema(&self) -> Result<()> {
        let client = self.client().await?;

        match client.batch_execute(CREATE_TABLE_SQL).await {
            Ok(()) => Ok(()),
            // Two sessions racing on IF NOT EXISTS: the loser sees a catalog
            // conflict even though the table now exists.
            Err(e) if is_concurrent_create_conflict(e.code()) => {
                debug!("waiting_list created by a concurrent session: {}", e);
                Ok(())
            }
            Err(e) => Err(WaitlistError::StorageUnavailable {
                cause: format!("Failed to create waiting_list: {}", e),
            }),
        }
    }

    async fn register_entrant(&self, entry: NewEntrant) -> Result<Entrant> {
        let client = self.client().await?;

        let row = client
            .query_one(
                INSERT_ENTRANT_SQL,
                &[&entry.email, &entry.name, &entry.interest, &entry.message],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(e.code()) {
                    WaitlistError::DuplicateEmail {
                        email: entry.email.clone(),
                    }
                } else {
                    WaitlistError::from(e)
                }
            })?;

        Ok(Entrant {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
        })
    }

    async fn ping(&self) -> bool {
        let client = match self.client().await {
            Ok(client) => client,
            Err(e) => {
                warn!("Health check could not reach database: {}", e);
                return false;
            }
        };

        client.execute("SELECT 1", &[]).await.is_ok()
    }
}

fn is_unique_violation(code: Option<&SqlState>) -> bool {
    code == Some(&SqlState::UNIQUE_VIOLATION)
}

fn is_concurrent_create_conflict(code: Option<&SqlState>) -> bool {
    matches!(code, Some(c) if *c == SqlState::UNIQUE_VIOLATION || *c == SqlState::DUPLICATE_TABLE)
}
