//! Module-contributed schema migrations.

use crate::{Database, DbError, DbResult};

/// Migration definition for modules
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

const CREATE_LEDGER: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    )
"#;

impl Database {
    /// Apply every migration not yet recorded in `_migrations`, in the order given.
    ///
    /// Each migration runs in its own transaction together with its ledger row.
    /// Returns the number of migrations applied.
    pub async fn migrate(&self, migrations: &[(String, Migration)]) -> DbResult<usize> {
        sqlx::raw_sql(CREATE_LEDGER).execute(self.pool()).await?;

        let mut applied = 0;
        for (module, migration) in migrations {
            let seen: Option<i64> =
                sqlx::query_scalar("SELECT 1 FROM _migrations WHERE module = ? AND id = ?")
                    .bind(module)
                    .bind(migration.id)
                    .fetch_optional(self.pool())
                    .await?;
            if seen.is_some() {
                tracing::debug!(target: "shelf-db", module, id = migration.id, "migration already applied");
                continue;
            }

            let mut tx = self.pool().begin().await?;
            sqlx::raw_sql(migration.up)
                .execute(&mut *tx)
                .await
                .map_err(|source| DbError::Migration {
                    module: module.clone(),
                    id: migration.id,
                    source,
                })?;
            sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
                .bind(module)
                .bind(migration.id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            tracing::info!(target: "shelf-db", module, id = migration.id, "migration applied");
            applied += 1;
        }

        Ok(applied)
    }
}
