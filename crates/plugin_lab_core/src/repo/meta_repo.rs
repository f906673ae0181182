//! Post metadata contract and SQLite implementation.
//!
//! One value per `(post_id, meta_key)`; writes overwrite.

use crate::model::post::PostId;
use crate::repo::post_repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value attachment keyed by post identity.
pub trait MetaRepository {
    fn get_meta(&self, post_id: PostId, key: &str) -> RepoResult<Option<String>>;
    /// Upserts the value, replacing any previous one.
    fn set_meta(&self, post_id: PostId, key: &str, value: &str) -> RepoResult<()>;
    /// Returns `false` when nothing was stored under `key`.
    fn delete_meta(&self, post_id: PostId, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed metadata repository.
pub struct SqliteMetaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMetaRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MetaRepository for SqliteMetaRepository<'_> {
    fn get_meta(&self, post_id: PostId, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT meta_value FROM post_meta WHERE post_id = ?1 AND meta_key = ?2;",
                params![post_id, key],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;
        Ok(value.flatten())
    }

    fn set_meta(&self, post_id: PostId, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO post_meta (post_id, meta_key, meta_value)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (post_id, meta_key) DO UPDATE SET meta_value = excluded.meta_value;",
            params![post_id, key, value],
        )?;
        Ok(())
    }

    fn delete_meta(&self, post_id: PostId, key: &str) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM post_meta WHERE post_id = ?1 AND meta_key = ?2;",
            params![post_id, key],
        )?;
        Ok(changed > 0)
    }
}
