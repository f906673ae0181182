//! Post repository contract and SQLite implementation.

use crate::db::DbError;
use crate::model::post::{Post, PostId, PostStatus, PostValidationError};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const POST_SELECT_SQL: &str = "SELECT
    id,
    post_type,
    post_status,
    post_name,
    post_parent,
    post_title,
    post_content
FROM posts";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error shared by the post and meta repositories.
#[derive(Debug)]
pub enum RepoError {
    Validation(PostValidationError),
    Db(DbError),
    NotFound(PostId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "post not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted post data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<PostValidationError> for RepoError {
    fn from(value: PostValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Per-status totals for one post type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PostStatusCounts {
    pub publish: u64,
    pub draft: u64,
    pub private: u64,
}

impl PostStatusCounts {
    pub fn total(&self) -> u64 {
        self.publish + self.draft + self.private
    }
}

/// Record store used by the analyzer and the post-count endpoint.
pub trait PostRepository {
    /// Inserts `post` and returns the assigned id. `post.id` is ignored.
    fn insert_post(&self, post: &Post) -> RepoResult<PostId>;
    fn update_post(&self, post: &Post) -> RepoResult<()>;
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    fn count_posts(&self, post_type: &str) -> RepoResult<PostStatusCounts>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn insert_post(&self, post: &Post) -> RepoResult<PostId> {
        post.validate()?;

        self.conn.execute(
            "INSERT INTO posts (
                post_type,
                post_status,
                post_name,
                post_parent,
                post_title,
                post_content
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                post.post_type.as_str(),
                post.status.as_str(),
                post.name.as_str(),
                post.parent,
                post.title.as_str(),
                post.content.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_post(&self, post: &Post) -> RepoResult<()> {
        post.validate()?;

        let changed = self.conn.execute(
            "UPDATE posts
             SET
                post_type = ?1,
                post_status = ?2,
                post_name = ?3,
                post_parent = ?4,
                post_title = ?5,
                post_content = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?7;",
            params![
                post.post_type.as_str(),
                post.status.as_str(),
                post.name.as_str(),
                post.parent,
                post.title.as_str(),
                post.content.as_str(),
                post.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(post.id));
        }
        Ok(())
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_post_row(row)?)),
            None => Ok(None),
        }
    }

    fn count_posts(&self, post_type: &str) -> RepoResult<PostStatusCounts> {
        let mut stmt = self.conn.prepare(
            "SELECT post_status, COUNT(*)
             FROM posts
             WHERE post_type = ?1
             GROUP BY post_status;",
        )?;
        let mut rows = stmt.query([post_type])?;
        let mut counts = PostStatusCounts::default();

        while let Some(row) = rows.next()? {
            let status: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            let count = u64::try_from(count).unwrap_or_default();
            match PostStatus::parse(&status) {
                Some(PostStatus::Publish) => counts.publish = count,
                Some(PostStatus::Draft) => counts.draft = count,
                Some(PostStatus::Private) => counts.private = count,
                Some(_) => {}
                None => {
                    return Err(RepoError::InvalidData(format!(
                        "invalid status `{status}` in posts.post_status"
                    )));
                }
            }
        }

        Ok(counts)
    }
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let status_text: String = row.get("post_status")?;
    let status = PostStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in posts.post_status"
        ))
    })?;

    let post = Post {
        id: row.get("id")?,
        post_type: row.get("post_type")?,
        status,
        name: row.get("post_name")?,
        parent: row.get("post_parent")?,
        title: row.get("post_title")?,
        content: row.get("post_content")?,
    };
    post.validate()?;
    Ok(post)
}
