//! Migration Path Registrar
//!
//! Every module's migration directory is registered at boot, whether or not
//! it exists yet. Directories are only checked when migrations actually run.

use std::path::{Path, PathBuf};

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};

use crate::bootstrap::routes::ModuleDefinition;

/// Ordered, de-duplicated list of migration directories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationPaths(Vec<PathBuf>);

impl MigrationPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory; registering the same path twice is a no-op
    pub fn register(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.0.contains(&path) {
            tracing::debug!(path = %path.display(), "Registered migration path");
            self.0.push(path);
        }
    }

    pub fn register_all<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for path in paths {
            self.register(path);
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Migration directory of every module, in definition order
pub fn module_migration_paths(
    modules_root: &Path,
    definitions: &[ModuleDefinition],
) -> Vec<PathBuf> {
    definitions
        .iter()
        .map(|module| module.migrations_dir(modules_root))
        .collect()
}

/// Run every registered directory against `pool`, in registration order
///
/// Directories that do not exist are skipped. All directories share one
/// `_sqlx_migrations` table, so each migrator ignores versions applied from
/// the other directories.
pub async fn run_migrations(pool: &PgPool, paths: &MigrationPaths) -> Result<(), MigrateError> {
    for path in paths.paths() {
        if !path.is_dir() {
            tracing::debug!(path = %path.display(), "Migration path does not exist, skipping");
            continue;
        }

        let mut migrator = Migrator::new(path.as_path()).await?;
        migrator.set_ignore_missing(true);
        migrator.run(pool).await?;

        tracing::info!(
            path = %path.display(),
            migrations = migrator.iter().count(),
            "Migrations completed"
        );
    }

    Ok(())
}
