//! Shelf application library
//!
//! Wires the authors and books modules onto the shelf kernel, database and
//! HTTP crates. Everything is constructed explicitly in [`Application::connect`].

#![recursion_limit = "256"]

pub mod modules;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use axum::Router;
use shelf_db::Database;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// A connected application: settings, database pool and registered modules.
pub struct Application {
    settings: Settings,
    db: Database,
    registry: ModuleRegistry,
}

impl Application {
    /// Open the database and register every module against it.
    pub async fn connect(settings: Settings) -> anyhow::Result<Self> {
        let db = Database::connect(&settings.database.url, settings.database.max_connections)
            .await
            .with_context(|| format!("failed to connect to database '{}'", settings.database.url))?;

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &db);

        Ok(Self {
            settings,
            db,
            registry,
        })
    }

    /// Apply pending module migrations; returns how many ran.
    pub async fn migrate(&self) -> anyhow::Result<usize> {
        let migrations = self.registry.collect_migrations();
        let applied = self
            .db
            .migrate(&migrations)
            .await
            .context("failed to apply migrations")?;
        tracing::info!(applied, total = migrations.len(), "migrations complete");
        Ok(applied)
    }

    /// The full HTTP router, as served.
    pub fn router(&self) -> Router {
        shelf_http::build_router(&self.registry, &self.settings, &self.db)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Initialize and start modules, serve until `shutdown`, then tear down.
    pub async fn serve(
        self,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let ctx = InitCtx {
            settings: &self.settings,
            db: &self.db,
        };
        self.registry.init_modules(&ctx).await?;
        self.registry.start_modules(&ctx).await?;

        let served =
            shelf_http::start_server(&self.registry, &self.settings, &self.db, shutdown).await;

        let stopped = self.registry.stop_modules().await;
        self.db.close().await;
        served.and(stopped)
    }
}

/// Connect, migrate and serve until Ctrl-C or SIGTERM.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "shelf bootstrap starting"
    );

    let app = Application::connect(settings).await?;
    app.migrate().await?;
    app.serve(shelf_http::shutdown_signal()).await
}

/// Connect and apply pending migrations only.
pub async fn migrate(settings: Settings) -> anyhow::Result<usize> {
    let app = Application::connect(settings).await?;
    let applied = app.migrate().await?;
    app.database().close().await;
    Ok(applied)
}
