//! Schema migrations for the task database
//!
//! The schema version lives in `PRAGMA user_version`. Each step moves the schema
//! from version N to N+1 inside its own transaction, so a failed step leaves the
//! database at N. A new database is created at the latest version directly.
//!
//! ## Adding a version
//!
//! 1. Add a step function in `steps.rs` and append it to `MIGRATIONS`
//! 2. Bump `LATEST_VERSION`
//! 3. Update `schema::create_latest` so fresh databases match the migrated shape
//! 4. Extend the migration tests with a seed row for the new shape
//!
//! ## Versions
//!
//! - **1**: `todos` with `description` and a stored `isCompleted` flag
//! - **2**: daily task columns (`isDaily`, `dailyTime`, `lastCompletedDate`)
//! - **3**: `dailyEndDate`
//! - **4**: `dueTime`
//! - **5**: `description` dropped (table rebuild)
//! - **6**: `completedAt`
//! - **7**: legacy `isCompleted` / `lastCompletedDate` dropped (table rebuild)
//! - **8**: `idx_todos_due` index

mod migrate;
mod schema;
mod steps;

pub use migrate::{
    MigrationError, migrate_to, migrate_to_latest, migrate_with, open_or_create,
    read_user_version,
};
pub use schema::{create_latest, has_table, index_names, table_columns};
pub use steps::{LATEST_VERSION, MIGRATIONS, Migration};
