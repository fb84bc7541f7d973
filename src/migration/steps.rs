//! Individual schema steps, one function per version bump.

use rusqlite::Transaction;

use super::schema::{DUE_INDEX_SQL, TODOS_TABLE_SQL};

/// Schema version produced by the last registered step.
pub const LATEST_VERSION: u32 = 8;

/// One schema step from `from` to `to`.
#[derive(Clone, Copy)]
pub struct Migration {
    pub from: u32,
    pub to: u32,
    pub description: &'static str,
    pub apply: fn(&Transaction<'_>) -> rusqlite::Result<()>,
}

impl std::fmt::Debug for Migration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("description", &self.description)
            .finish()
    }
}

/// Every step, in order.
pub static MIGRATIONS: [Migration; 8] = [
    Migration {
        from: 0,
        to: 1,
        description: "create todos",
        apply: create_todos_v1,
    },
    Migration {
        from: 1,
        to: 2,
        description: "add daily task columns",
        apply: add_daily_columns,
    },
    Migration {
        from: 2,
        to: 3,
        description: "add dailyEndDate",
        apply: add_daily_end_date,
    },
    Migration {
        from: 3,
        to: 4,
        description: "add dueTime",
        apply: add_due_time,
    },
    Migration {
        from: 4,
        to: 5,
        description: "drop description",
        apply: drop_description,
    },
    Migration {
        from: 5,
        to: 6,
        description: "add completedAt",
        apply: add_completed_at,
    },
    Migration {
        from: 6,
        to: 7,
        description: "drop stored completion flag",
        apply: drop_completion_flag,
    },
    Migration {
        from: 7,
        to: 8,
        description: "index due date and time",
        apply: add_due_index,
    },
];

fn create_todos_v1(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch(
        r#"
CREATE TABLE todos (
    id          INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    priority    TEXT NOT NULL,
    isCompleted INTEGER NOT NULL DEFAULT 0,
    createdAt   INTEGER NOT NULL,
    dueDate     INTEGER
);
"#,
    )
}

fn add_daily_columns(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch(
        "ALTER TABLE todos ADD COLUMN isDaily INTEGER NOT NULL DEFAULT 0;
         ALTER TABLE todos ADD COLUMN dailyTime TEXT;
         ALTER TABLE todos ADD COLUMN lastCompletedDate INTEGER;",
    )
}

fn add_daily_end_date(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch("ALTER TABLE todos ADD COLUMN dailyEndDate INTEGER;")
}

fn add_due_time(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch("ALTER TABLE todos ADD COLUMN dueTime TEXT;")
}

// SQLite cannot drop a column in place here: rebuild, copy, swap.
fn drop_description(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch(
        r#"
CREATE TABLE todos_new (
    id                INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    title             TEXT NOT NULL,
    priority          TEXT NOT NULL,
    isCompleted       INTEGER NOT NULL DEFAULT 0,
    createdAt         INTEGER NOT NULL,
    dueDate           INTEGER,
    dueTime           TEXT,
    isDaily           INTEGER NOT NULL DEFAULT 0,
    dailyTime         TEXT,
    dailyEndDate      INTEGER,
    lastCompletedDate INTEGER
);

INSERT INTO todos_new (id, title, priority, isCompleted, createdAt, dueDate, dueTime,
                       isDaily, dailyTime, dailyEndDate, lastCompletedDate)
SELECT id, title, priority, isCompleted, createdAt, dueDate, dueTime,
       isDaily, dailyTime, dailyEndDate, lastCompletedDate
FROM todos;

DROP TABLE todos;
ALTER TABLE todos_new RENAME TO todos;
"#,
    )
}

fn add_completed_at(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch("ALTER TABLE todos ADD COLUMN completedAt INTEGER;")
}

// One-shot tasks keep their completion; daily rows are left alone because the
// old flag said nothing about which day they were completed on.
fn drop_completion_flag(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute(
        "UPDATE todos SET completedAt = COALESCE(lastCompletedDate, createdAt) \
         WHERE isCompleted = 1 AND isDaily = 0 AND completedAt IS NULL",
        [],
    )?;

    tx.execute_batch(&TODOS_TABLE_SQL.replace("CREATE TABLE todos", "CREATE TABLE todos_new"))?;
    tx.execute_batch(
        r#"
INSERT INTO todos_new (id, title, priority, createdAt, dueDate, dueTime,
                       isDaily, dailyTime, dailyEndDate, completedAt)
SELECT id, title, priority, createdAt, dueDate, dueTime,
       isDaily, dailyTime, dailyEndDate, completedAt
FROM todos;

DROP TABLE todos;
ALTER TABLE todos_new RENAME TO todos;
"#,
    )
}

fn add_due_index(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch(DUE_INDEX_SQL)
}
