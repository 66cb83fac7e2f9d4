use std::sync::Arc;

use chrono::Utc;
use futures_util::future::BoxFuture;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    config::Config,
    db,
    error::GreetingError,
    models::greeting::{GreetingRecord, GreetingRow, GreetingSubmission, SendResult},
    services::greeting_api::HttpGreetingClient,
};

/// Read side of the greeting backend.
pub trait GreetingReader: Send + Sync {
    /// All greetings, oldest first.
    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<GreetingRecord>, GreetingError>>;
}

/// Write side of the greeting backend.
pub trait GreetingWriter: Send + Sync {
    fn submit<'a>(
        &'a self,
        greeting: &'a GreetingSubmission,
    ) -> BoxFuture<'a, Result<SendResult, GreetingError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Postgres,
    Remote,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BackendKind::Memory => "memory",
            BackendKind::Postgres => "postgres",
            BackendKind::Remote => "remote",
        };
        write!(f, "{s}")
    }
}

/// The reader/writer pair the site runs on, picked at startup.
#[derive(Clone)]
pub struct GreetingBackend {
    pub kind: BackendKind,
    pub reader: Arc<dyn GreetingReader>,
    pub writer: Arc<dyn GreetingWriter>,
    pub db: Option<PgPool>,
}

impl GreetingBackend {
    pub fn memory() -> Self {
        let store = Arc::new(MemoryGreetingStore::default());
        Self {
            kind: BackendKind::Memory,
            reader: store.clone(),
            writer: store,
            db: None,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgGreetingStore::new(pool.clone()));
        Self {
            kind: BackendKind::Postgres,
            reader: store.clone(),
            writer: store,
            db: Some(pool),
        }
    }

    pub fn remote(base_url: &str) -> Self {
        let client = Arc::new(HttpGreetingClient::new(base_url));
        Self {
            kind: BackendKind::Remote,
            reader: client.clone(),
            writer: client,
            db: None,
        }
    }

    /// A remote API wins over a local database; with neither, greetings live in memory.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        if let Some(url) = &config.greetings_api_url {
            return Ok(Self::remote(url));
        }
        if let Some(database_url) = &config.database_url {
            let pool = db::create_pool(database_url).await?;
            db::run_migrations(&pool).await?;
            return Ok(Self::postgres(pool));
        }
        tracing::warn!(
            "Neither GREETINGS_API_URL nor DATABASE_URL set; greetings are kept in memory"
        );
        Ok(Self::memory())
    }

    pub fn with_writer(mut self, writer: Arc<dyn GreetingWriter>) -> Self {
        self.writer = writer;
        self
    }
}

/// Process-local store for development and tests.
#[derive(Debug, Default)]
pub struct MemoryGreetingStore {
    rows: RwLock<Vec<GreetingRow>>,
}

impl GreetingReader for MemoryGreetingStore {
    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<GreetingRecord>, GreetingError>> {
        Box::pin(async move {
            let rows = self.rows.read().await;
            let records = rows.iter().cloned().map(GreetingRecord::from).collect();
            Ok(records)
        })
    }
}

impl GreetingWriter for MemoryGreetingStore {
    fn submit<'a>(
        &'a self,
        greeting: &'a GreetingSubmission,
    ) -> BoxFuture<'a, Result<SendResult, GreetingError>> {
        Box::pin(async move {
            self.rows.write().await.push(GreetingRow {
                id: Uuid::new_v4(),
                name: greeting.name.clone(),
                phone: greeting.phone.clone(),
                message: greeting.message.clone(),
                present: greeting.present,
                created_at: Utc::now(),
            });
            Ok(SendResult::ACCEPTED)
        })
    }
}

pub struct PgGreetingStore {
    pool: PgPool,
}

impl PgGreetingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_greeting(
        pool: &PgPool,
        greeting: &GreetingSubmission,
    ) -> Result<GreetingRow, sqlx::Error> {
        sqlx::query_as::<_, GreetingRow>(
            "INSERT INTO greetings (id, name, phone, message, present)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, phone, message, present, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&greeting.name)
        .bind(&greeting.phone)
        .bind(&greeting.message)
        .bind(greeting.present)
        .fetch_one(pool)
        .await
    }

    /// Every greeting including the contact column, for exports.
    pub async fn list_with_contacts(
        pool: &PgPool,
        attending_only: bool,
    ) -> anyhow::Result<Vec<GreetingRow>> {
        let rows = sqlx::query_as::<_, GreetingRow>(
            "SELECT id, name, phone, message, present, created_at
             FROM greetings
             WHERE present OR NOT $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(attending_only)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

impl GreetingReader for PgGreetingStore {
    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<GreetingRecord>, GreetingError>> {
        Box::pin(async move {
            let rows = sqlx::query_as::<_, GreetingRow>(
                "SELECT id, name, phone, message, present, created_at
                 FROM greetings
                 ORDER BY created_at ASC, id ASC",
            )
            .fetch_all(&self.pool)
            .await?;

            Ok(rows.into_iter().map(GreetingRecord::from).collect())
        })
    }
}

impl GreetingWriter for PgGreetingStore {
    fn submit<'a>(
        &'a self,
        greeting: &'a GreetingSubmission,
    ) -> BoxFuture<'a, Result<SendResult, GreetingError>> {
        Box::pin(async move {
            let row = Self::create_greeting(&self.pool, greeting).await?;
            tracing::debug!("Stored greeting {}", row.id);
            Ok(SendResult::ACCEPTED)
        })
    }
}
