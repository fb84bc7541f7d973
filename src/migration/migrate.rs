//! Migration runner.

use rusqlite::Connection;

use super::schema::{create_latest, has_table};
use super::steps::{LATEST_VERSION, MIGRATIONS, Migration};

/// Why a database could not be brought to the requested version.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("sqlite error during migration: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The database was written by a newer build.
    #[error("database schema version {found} is newer than supported version {supported}")]
    NewerThanSupported { found: u32, supported: u32 },

    /// No registered step starts at `from`.
    #[error("no migration registered from version {from} (target {target})")]
    MissingStep { from: u32, target: u32 },

    /// A `todos` table exists but the version stamp is 0.
    #[error("database has a todos table but no schema version")]
    Unversioned,
}

/// Read `PRAGMA user_version`.
pub fn read_user_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

/// Bring a database to `target` using the given steps.
///
/// Each step runs in its own transaction together with its version stamp.
/// Returns the resulting version.
pub fn migrate_with(
    conn: &mut Connection,
    steps: &[Migration],
    target: u32,
) -> Result<u32, MigrationError> {
    let mut version = read_user_version(conn)?;
    if version > target {
        return Err(MigrationError::NewerThanSupported {
            found: version,
            supported: target,
        });
    }

    while version < target {
        let step = steps
            .iter()
            .find(|s| s.from == version)
            .ok_or(MigrationError::MissingStep {
                from: version,
                target,
            })?;

        let tx = conn.transaction()?;
        (step.apply)(&tx)?;
        tx.pragma_update(None, "user_version", step.to)?;
        tx.commit()?;

        tracing::info!(
            from = step.from,
            to = step.to,
            "applied migration: {}",
            step.description
        );
        version = step.to;
    }

    Ok(version)
}

/// Apply the registered steps up to `target`.
pub fn migrate_to(conn: &mut Connection, target: u32) -> Result<u32, MigrationError> {
    migrate_with(conn, &MIGRATIONS, target)
}

/// Apply every registered step.
pub fn migrate_to_latest(conn: &mut Connection) -> Result<u32, MigrationError> {
    migrate_to(conn, LATEST_VERSION)
}

/// Prepare a connection for use: create the latest schema on an empty database,
/// otherwise migrate what is there.
pub fn open_or_create(conn: &mut Connection) -> Result<u32, MigrationError> {
    let version = read_user_version(conn)?;
    if version == 0 {
        if has_table(conn, "todos")? {
            return Err(MigrationError::Unversioned);
        }
        let tx = conn.transaction()?;
        create_latest(&tx)?;
        tx.pragma_update(None, "user_version", LATEST_VERSION)?;
        tx.commit()?;
        tracing::info!(version = LATEST_VERSION, "created task database");
        return Ok(LATEST_VERSION);
    }

    let migrated = migrate_to_latest(conn)?;
    if migrated != version {
        tracing::info!(from = version, to = migrated, "task database migrated");
    }
    Ok(migrated)
}
