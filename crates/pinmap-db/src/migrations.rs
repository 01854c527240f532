use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                name        TEXT NOT NULL,
                role        TEXT NOT NULL DEFAULT 'user',
                created_at  TEXT NOT NULL
            );

            CREATE TABLE maps (
                id                    TEXT PRIMARY KEY,
                map_id                TEXT NOT NULL UNIQUE,
                title                 TEXT NOT NULL,
                description           TEXT NOT NULL DEFAULT '',
                user_id               TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                is_publicly_editable  INTEGER NOT NULL DEFAULT 0,
                created_at            TEXT NOT NULL,
                updated_at            TEXT NOT NULL
            );

            CREATE INDEX idx_maps_user ON maps(user_id, created_at);

            CREATE TABLE floors (
                id            TEXT PRIMARY KEY,
                map_id        TEXT NOT NULL REFERENCES maps(id) ON DELETE CASCADE,
                floor_number  INTEGER NOT NULL,
                name          TEXT NOT NULL,
                image_url     TEXT NOT NULL DEFAULT '',
                created_at    TEXT NOT NULL,
                updated_at    TEXT NOT NULL
            );

            CREATE INDEX idx_floors_map ON floors(map_id, floor_number);

            CREATE TABLE pins (
                id               TEXT PRIMARY KEY,
                floor_id         TEXT NOT NULL REFERENCES floors(id) ON DELETE CASCADE,
                title            TEXT NOT NULL,
                description      TEXT NOT NULL DEFAULT '',
                x_position       REAL NOT NULL,
                y_position       REAL NOT NULL,
                image_url        TEXT NOT NULL DEFAULT '',
                editor_id        TEXT NOT NULL,
                editor_nickname  TEXT NOT NULL DEFAULT '',
                created_at       TEXT NOT NULL,
                updated_at       TEXT NOT NULL
            );

            CREATE INDEX idx_pins_floor ON pins(floor_id, created_at);

            CREATE TABLE public_editors (
                id            TEXT PRIMARY KEY,
                map_id        TEXT NOT NULL REFERENCES maps(id) ON DELETE CASCADE,
                nickname      TEXT NOT NULL,
                token_sha256  TEXT NOT NULL,
                created_at    TEXT NOT NULL,
                last_active   TEXT NOT NULL
            );

            CREATE INDEX idx_public_editors_map ON public_editors(map_id);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
