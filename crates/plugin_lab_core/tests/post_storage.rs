use plugin_lab_core::db::open_db_in_memory;
use plugin_lab_core::{
    MetaRepository, Post, PostRepository, PostStatus, RepoError, SqliteMetaRepository,
    SqlitePostRepository,
};

#[test]
fn insert_assigns_ids_and_get_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::new(&conn);

    let first = repo.insert_post(&Post::entry("Hello", "<p>Body</p>")).unwrap();
    let second = repo.insert_post(&Post::entry("Again", "")).unwrap();
    assert!(first > 0);
    assert_ne!(first, second);

    let loaded = repo.get_post(first).unwrap().unwrap();
    assert_eq!(loaded.id, first);
    assert_eq!(loaded.title, "Hello");
    assert_eq!(loaded.content, "<p>Body</p>");
    assert_eq!(loaded.status, PostStatus::Draft);
    assert_eq!(loaded.post_type, "post");
}

#[test]
fn get_missing_post_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::new(&conn);
    assert!(repo.get_post(404).unwrap().is_none());
}

#[test]
fn update_replaces_fields_and_reports_missing_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::new(&conn);

    let id = repo.insert_post(&Post::entry("Draft", "v1")).unwrap();
    let mut post = repo.get_post(id).unwrap().unwrap();
    post.content = "v2".to_string();
    post.status = PostStatus::Publish;
    repo.update_post(&post).unwrap();

    let loaded = repo.get_post(id).unwrap().unwrap();
    assert_eq!(loaded.content, "v2");
    assert_eq!(loaded.status, PostStatus::Publish);

    let mut missing = Post::entry("ghost", "");
    missing.id = 999;
    assert!(matches!(
        repo.update_post(&missing).unwrap_err(),
        RepoError::NotFound(999)
    ));
}

#[test]
fn invalid_posts_are_not_written() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::new(&conn);

    let err = repo.insert_post(&Post::new("", "t", "c")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn count_posts_groups_by_status_per_type() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::new(&conn);

    for status in [
        PostStatus::Publish,
        PostStatus::Publish,
        PostStatus::Draft,
        PostStatus::Private,
        PostStatus::Trash,
    ] {
        repo.insert_post(&Post::entry("t", "c").with_status(status))
            .unwrap();
    }
    repo.insert_post(&Post::new("page", "About", "").with_status(PostStatus::Publish))
        .unwrap();

    let counts = repo.count_posts("post").unwrap();
    assert_eq!(counts.publish, 2);
    assert_eq!(counts.draft, 1);
    assert_eq!(counts.private, 1);
    assert_eq!(counts.total(), 4);

    let pages = repo.count_posts("page").unwrap();
    assert_eq!(pages.publish, 1);
    assert_eq!(pages.total(), 1);

    assert_eq!(repo.count_posts("product").unwrap().total(), 0);
}

#[test]
fn meta_set_overwrites_and_delete_reports_presence() {
    let conn = open_db_in_memory().unwrap();
    let posts = SqlitePostRepository::new(&conn);
    let meta = SqliteMetaRepository::new(&conn);
    let id = posts.insert_post(&Post::entry("t", "c")).unwrap();

    assert_eq!(meta.get_meta(id, "key").unwrap(), None);

    meta.set_meta(id, "key", "1").unwrap();
    meta.set_meta(id, "key", "2").unwrap();
    assert_eq!(meta.get_meta(id, "key").unwrap().as_deref(), Some("2"));

    assert!(meta.delete_meta(id, "key").unwrap());
    assert!(!meta.delete_meta(id, "key").unwrap());
    assert_eq!(meta.get_meta(id, "key").unwrap(), None);
}
