use plugin_lab_core::db::open_db_in_memory;
use plugin_lab_core::{
    KeywordAnalyzer, KeywordMatcher, MetaRepository, Post, PostId, PostRepository,
    PostStatusCounts, RepoResult, SqliteMetaRepository, SqlitePostRepository,
    KEYWORD_COUNT_META_KEY,
};
use rusqlite::Connection;
use std::cell::Cell;

const SAMPLE_TITLE: &str = "WordPressの使い方ガイド";
const SAMPLE_BODY: &str = "WordPressは素晴らしいCMSです。wordpress開発を学習しましょう。";

fn insert(conn: &Connection, title: &str, body: &str) -> PostId {
    SqlitePostRepository::new(conn)
        .insert_post(&Post::entry(title, body))
        .unwrap()
}

#[test]
fn counts_and_stores_sample_post() {
    let conn = open_db_in_memory().unwrap();
    let posts = SqlitePostRepository::new(&conn);
    let meta = SqliteMetaRepository::new(&conn);
    let analyzer = KeywordAnalyzer::new(&posts, &meta);

    let id = insert(&conn, SAMPLE_TITLE, SAMPLE_BODY);
    assert_eq!(analyzer.count_keyword(Some(id)).unwrap(), 3);
    assert_eq!(
        meta.get_meta(id, KEYWORD_COUNT_META_KEY).unwrap().as_deref(),
        Some("3")
    );
    assert_eq!(analyzer.read_keyword_count(Some(id)).unwrap(), 3);
}

#[test]
fn empty_post_counts_zero_and_zero_is_present() {
    let conn = open_db_in_memory().unwrap();
    let posts = SqlitePostRepository::new(&conn);
    let meta = SqliteMetaRepository::new(&conn);
    let analyzer = KeywordAnalyzer::new(&posts, &meta);

    let id = insert(&conn, "", "");
    assert_eq!(analyzer.count_keyword(Some(id)).unwrap(), 0);
    assert!(analyzer.has_count(id).unwrap());
    assert_eq!(analyzer.read_keyword_count(Some(id)).unwrap(), 0);
}

#[test]
fn title_and_body_are_joined_with_a_space() {
    let conn = open_db_in_memory().unwrap();
    let posts = SqlitePostRepository::new(&conn);
    let meta = SqliteMetaRepository::new(&conn);
    let analyzer = KeywordAnalyzer::new(&posts, &meta);

    // "Word" + " " + "Press" must not match across the boundary.
    let id = insert(&conn, "Word", "Press");
    assert_eq!(analyzer.count_keyword(Some(id)).unwrap(), 0);
}

#[test]
fn recount_is_idempotent_and_overwrites() {
    let conn = open_db_in_memory().unwrap();
    let posts = SqlitePostRepository::new(&conn);
    let meta = SqliteMetaRepository::new(&conn);
    let analyzer = KeywordAnalyzer::new(&posts, &meta);

    let id = insert(&conn, "WordPress", "wordpress WORDPRESS");
    assert_eq!(analyzer.count_keyword(Some(id)).unwrap(), 3);
    assert_eq!(analyzer.count_keyword(Some(id)).unwrap(), 3);
    assert_eq!(analyzer.read_keyword_count(Some(id)).unwrap(), 3);

    meta.set_meta(id, KEYWORD_COUNT_META_KEY, "99").unwrap();
    assert_eq!(analyzer.count_keyword(Some(id)).unwrap(), 3);
    assert_eq!(analyzer.read_keyword_count(Some(id)).unwrap(), 3);
}

#[test]
fn missing_post_returns_zero_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let posts = SqlitePostRepository::new(&conn);
    let meta = SqliteMetaRepository::new(&conn);
    let analyzer = KeywordAnalyzer::new(&posts, &meta);

    assert_eq!(analyzer.count_keyword(Some(12345)).unwrap(), 0);
    assert!(!analyzer.has_count(12345).unwrap());
}

#[test]
fn clear_removes_count() {
    let conn = open_db_in_memory().unwrap();
    let posts = SqlitePostRepository::new(&conn);
    let meta = SqliteMetaRepository::new(&conn);
    let analyzer = KeywordAnalyzer::new(&posts, &meta);

    let id = insert(&conn, SAMPLE_TITLE, SAMPLE_BODY);
    assert!(analyzer.recalculate(Some(id)).unwrap());
    assert!(analyzer.has_count(id).unwrap());

    assert!(analyzer.clear(id).unwrap());
    assert!(!analyzer.has_count(id).unwrap());
    assert_eq!(analyzer.read_keyword_count(Some(id)).unwrap(), 0);
    assert!(!analyzer.clear(id).unwrap());
}

#[test]
fn read_falls_back_to_current_post() {
    let conn = open_db_in_memory().unwrap();
    let posts = SqlitePostRepository::new(&conn);
    let meta = SqliteMetaRepository::new(&conn);

    let id = insert(&conn, "wordpress", "wordpress");
    KeywordAnalyzer::new(&posts, &meta)
        .count_keyword(Some(id))
        .unwrap();

    let without_context = KeywordAnalyzer::new(&posts, &meta);
    assert_eq!(without_context.read_keyword_count(None).unwrap(), 0);
    assert_eq!(without_context.read_keyword_count(Some(0)).unwrap(), 0);

    let with_context = KeywordAnalyzer::new(&posts, &meta).with_current_post(id);
    assert_eq!(with_context.read_keyword_count(None).unwrap(), 2);
    assert_eq!(with_context.read_keyword_count(Some(0)).unwrap(), 2);
}

#[test]
fn custom_keyword_is_supported() {
    let conn = open_db_in_memory().unwrap();
    let posts = SqlitePostRepository::new(&conn);
    let meta = SqliteMetaRepository::new(&conn);
    let analyzer = KeywordAnalyzer::new(&posts, &meta)
        .with_matcher(KeywordMatcher::new("Rust").unwrap());

    let id = insert(&conn, "rust and RUST", "Rustacean wordpress");
    assert_eq!(analyzer.keyword(), "Rust");
    assert_eq!(analyzer.count_keyword(Some(id)).unwrap(), 3);
}

/// Record store that counts lookups and never holds any post.
#[derive(Default)]
struct CountingPosts {
    lookups: Cell<u32>,
}

impl PostRepository for CountingPosts {
    fn insert_post(&self, _: &Post) -> RepoResult<PostId> {
        unreachable!("analyzer never inserts")
    }

    fn update_post(&self, _: &Post) -> RepoResult<()> {
        unreachable!("analyzer never updates")
    }

    fn get_post(&self, _: PostId) -> RepoResult<Option<Post>> {
        self.lookups.set(self.lookups.get() + 1);
        Ok(None)
    }

    fn count_posts(&self, _: &str) -> RepoResult<PostStatusCounts> {
        Ok(PostStatusCounts::default())
    }
}

/// Metadata store that counts every call.
#[derive(Default)]
struct CountingMeta {
    calls: Cell<u32>,
}

impl MetaRepository for CountingMeta {
    fn get_meta(&self, _: PostId, _: &str) -> RepoResult<Option<String>> {
        self.calls.set(self.calls.get() + 1);
        Ok(None)
    }

    fn set_meta(&self, _: PostId, _: &str, _: &str) -> RepoResult<()> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }

    fn delete_meta(&self, _: PostId, _: &str) -> RepoResult<bool> {
        self.calls.set(self.calls.get() + 1);
        Ok(false)
    }
}

#[test]
fn falsy_id_skips_both_stores() {
    let posts = CountingPosts::default();
    let meta = CountingMeta::default();
    let analyzer = KeywordAnalyzer::new(&posts, &meta);

    assert_eq!(analyzer.count_keyword(None).unwrap(), 0);
    assert_eq!(analyzer.count_keyword(Some(0)).unwrap(), 0);
    assert_eq!(analyzer.read_keyword_count(None).unwrap(), 0);
    assert_eq!(posts.lookups.get(), 0);
    assert_eq!(meta.calls.get(), 0);

    assert_eq!(analyzer.count_keyword(Some(5)).unwrap(), 0);
    assert_eq!(posts.lookups.get(), 1);
    assert_eq!(meta.calls.get(), 0);
}
