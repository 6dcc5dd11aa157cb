//! Database schema and migrations for Portier.
//!
//! Migrations are applied in order when the database is opened. The
//! `schema_version` table records which ones have run.

/// Database migrations.
///
/// Statements use `IF NOT EXISTS` so a database created by an earlier
/// deployment without version tracking is adopted as-is.
pub const MIGRATIONS: &[&str] = &[
    // v1: users table
    r#"
CREATE TABLE IF NOT EXISTS users (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    fullname TEXT NOT NULL,
    email    TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
);
"#,
];
