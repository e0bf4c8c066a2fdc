use sqlx::{Connection, Row, SqliteConnection};

use crate::domain::request::ApiRequest;
use crate::history::HistoryLog;

/// Fixed storage key; the whole log lives in one row under it.
pub const HISTORY_KEY: &str = "request_history";
pub const DEFAULT_DB_URL: &str = "sqlite:diff_detective.sqlite?mode=rwc";

pub struct HistoryDb {
    pub connection: SqliteConnection,
}

impl HistoryDb {
    pub async fn connect(db_url: &str) -> anyhow::Result<Self> {
        log::info!("acquiring sqlite connection to {}", db_url);
        let mut connection = SqliteConnection::connect(db_url).await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS request_history (
                key TEXT PRIMARY KEY,
                entries TEXT NOT NULL
            )
            "#,
        )
        .execute(&mut connection)
        .await?;
        Ok(HistoryDb { connection })
    }

    /// Loads the stored log. A missing row or an unparseable blob yields
    /// the empty log rather than an error.
    pub async fn load(&mut self) -> anyhow::Result<HistoryLog> {
        let row = sqlx::query("SELECT entries FROM request_history WHERE key = $1")
            .bind(HISTORY_KEY)
            .fetch_optional(&mut self.connection)
            .await?;
        let Some(row) = row else {
            return Ok(HistoryLog::default());
        };
        let raw: String = row.get("entries");
        match serde_json::from_str::<Vec<ApiRequest>>(&raw) {
            Ok(entries) => Ok(HistoryLog::new(entries)),
            Err(e) => {
                log::warn!("stored history is not valid JSON ({}), starting empty", e);
                Ok(HistoryLog::default())
            }
        }
    }

    /// Rewrites the full log as one JSON array under the fixed key.
    pub async fn persist(&mut self, history: &HistoryLog) -> anyhow::Result<()> {
        let entries_json = serde_json::to_string(history.entries())?;
        let mut transaction = self.connection.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO request_history (key, entries)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET entries = $2
            "#,
        )
        .bind(HISTORY_KEY)
        .bind(&entries_json)
        .execute(&mut *transaction)
        .await?;
        transaction.commit().await?;
        log::debug!("history persisted ({} entries)", history.len());
        Ok(())
    }

    /// Raw stored blob, mainly for inspecting the durable copy.
    pub async fn raw_entries(&mut self) -> anyhow::Result<Option<String>> {
        let row = sqlx::query("SELECT entries FROM request_history WHERE key = $1")
            .bind(HISTORY_KEY)
            .fetch_optional(&mut self.connection)
            .await?;
        Ok(row.map(|r| r.get("entries")))
    }
}
