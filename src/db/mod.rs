use std::str::FromStr;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub async fn init_db(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// In-memory database on a single pooled connection, used by the test
/// suites. A multi-connection pool would hand each connection its own
/// empty memory database.
pub async fn init_memory_db() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS photos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            author_id INTEGER NOT NULL,
            image_url TEXT NOT NULL,
            caption TEXT NULL,
            likes_count INTEGER NOT NULL DEFAULT 0,
            comments_count INTEGER NOT NULL DEFAULT 0,
            created_at DATETIME NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_photos_author_created
            ON photos (author_id, created_at)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            photo_id INTEGER NOT NULL,
            author_id INTEGER NOT NULL,
            parent_comment_id INTEGER NULL,
            content TEXT NOT NULL,
            likes_count INTEGER NOT NULL DEFAULT 0,
            is_edited BOOLEAN NOT NULL DEFAULT FALSE,
            edited_at DATETIME NULL,
            is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
            deleted_at DATETIME NULL,
            created_at DATETIME NOT NULL,
            CONSTRAINT fk_comments_photo_id
                FOREIGN KEY (photo_id) REFERENCES photos(id) ON DELETE CASCADE,
            CONSTRAINT fk_comments_parent_comment_id
                FOREIGN KEY (parent_comment_id) REFERENCES comments(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_comments_photo_created
            ON comments (photo_id, created_at)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_comments_parent_comment_id
            ON comments (parent_comment_id)
        "#,
    )
    .execute(pool)
    .await?;

    // The parent's reply set. The composite primary key gives set
    // semantics: a reply can be linked to its parent at most once.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comment_replies (
            parent_id INTEGER NOT NULL,
            reply_id INTEGER NOT NULL,
            PRIMARY KEY (parent_id, reply_id),
            CONSTRAINT fk_comment_replies_parent_id
                FOREIGN KEY (parent_id) REFERENCES comments(id) ON DELETE CASCADE,
            CONSTRAINT fk_comment_replies_reply_id
                FOREIGN KEY (reply_id) REFERENCES comments(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // The unique index is what closes the find-then-act race in the like
    // toggle: a duplicate insert from a concurrent request fails instead
    // of producing a second like for the same triple.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS likes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            target_type TEXT NOT NULL CHECK (target_type IN ('photo', 'comment')),
            target_id INTEGER NOT NULL,
            photo_id INTEGER NULL,
            created_at DATETIME NOT NULL,
            CONSTRAINT uq_likes_user_target UNIQUE (user_id, target_type, target_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_likes_target
            ON likes (target_type, target_id)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_likes_user_created
            ON likes (user_id, created_at)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_likes_photo_id
            ON likes (photo_id)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
