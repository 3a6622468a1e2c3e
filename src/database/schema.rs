use sqlx::PgPool;
use tracing::info;

use super::manager::DatabaseError;

/// Idempotent DDL for the three tables the service owns.
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id          UUID PRIMARY KEY,
        username    TEXT NOT NULL,
        email       TEXT NOT NULL DEFAULT '',
        password    TEXT NOT NULL,
        role        TEXT NOT NULL DEFAULT 'USER'
                    CHECK (role IN ('USER', 'MODERATOR', 'ADMIN')),
        pets        UUID[] NOT NULL DEFAULT '{}',
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT users_username_key UNIQUE (username)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS pets (
        id          UUID PRIMARY KEY,
        name        TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        species     TEXT NOT NULL DEFAULT '',
        age         INTEGER CHECK (age IS NULL OR age >= 0),
        gender      TEXT NOT NULL DEFAULT '',
        profile_img TEXT NOT NULL DEFAULT '',
        address     JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "CREATE INDEX IF NOT EXISTS pets_name_idx ON pets (name)",
    "CREATE INDEX IF NOT EXISTS pets_created_at_idx ON pets (created_at, id)",
    r#"CREATE TABLE IF NOT EXISTS sessions (
        token_hash  TEXT PRIMARY KEY,
        user_id     UUID NOT NULL,
        data        JSONB NOT NULL,
        expires_at  TIMESTAMPTZ NOT NULL
    )"#,
    "CREATE INDEX IF NOT EXISTS sessions_user_id_idx ON sessions (user_id)",
    "CREATE INDEX IF NOT EXISTS sessions_expires_at_idx ON sessions (expires_at)",
];

/// Applies the schema. Safe to run repeatedly.
pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    info!("Applied schema ({} statements)", SCHEMA_STATEMENTS.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_statement_is_idempotent() {
        for statement in SCHEMA_STATEMENTS {
            assert!(statement.contains("IF NOT EXISTS"), "not idempotent: {}", statement);
        }
    }

    #[test]
    fn username_constraint_name_maps_to_username_field() {
        let users = SCHEMA_STATEMENTS[0];
        assert!(users.contains("users_username_key UNIQUE (username)"));
    }
}
