use snapfeed::db_helpers::*;
use snapfeed::{
    connect_db, CreateCommentRequest, CreatePostRequest, RegisterRequest, RequestError,
    UpdateSettingsRequest,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn test_pool() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite://{}", dir.path().join("test.db").display());
    let pool = connect_db(&db_url).await.unwrap();
    (dir, pool)
}

async fn create_user(pool: &SqlitePool, username: &str, display_name: &str) -> i64 {
    let user = insert_user(
        pool,
        &RegisterRequest {
            username: username.to_owned(),
            password: "not-a-real-hash".to_owned(),
            display_name: display_name.to_owned(),
        },
    )
    .await
    .unwrap();
    user.id
}

async fn create_post(
    pool: &SqlitePool,
    author_id: i64,
    caption: &str,
    image_urls: &[&str],
    hashtags: &[&str],
) -> i64 {
    let post = create_post_in_db(
        pool,
        author_id,
        CreatePostRequest {
            caption: caption.to_owned(),
            location: None,
            image_urls: image_urls.iter().map(|url| url.to_string()).collect(),
            hashtags: hashtags.iter().map(|tag| tag.to_string()).collect(),
        },
    )
    .await
    .unwrap();
    post.id
}

#[tokio::test]
async fn toggle_like_pair_restores_original_state() {
    let (_dir, pool) = test_pool().await;
    let author = create_user(&pool, "author", "Author").await;
    let liker = create_user(&pool, "liker", "Liker").await;
    let post_id = create_post(&pool, author, "sunset", &[], &[]).await;

    let (liked, notified_author) = toggle_post_like_in_db(&pool, post_id, liker).await.unwrap();
    assert!(liked);
    assert_eq!(notified_author, author);
    assert!(is_post_liked_in_db(&pool, post_id, liker).await.unwrap());

    let (liked, _) = toggle_post_like_in_db(&pool, post_id, liker).await.unwrap();
    assert!(!liked);
    assert!(!is_post_liked_in_db(&pool, post_id, liker).await.unwrap());
}

#[tokio::test]
async fn toggle_save_pair_restores_original_state() {
    let (_dir, pool) = test_pool().await;
    let author = create_user(&pool, "author", "Author").await;
    let reader = create_user(&pool, "reader", "Reader").await;
    let post_id = create_post(&pool, author, "breakfast", &[], &[]).await;

    assert!(toggle_save_post_in_db(&pool, post_id, reader).await.unwrap());
    assert!(is_post_saved_in_db(&pool, post_id, reader).await.unwrap());
    let saved = list_saved_posts_in_db(&pool, reader, 10, 0).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, post_id);

    assert!(!toggle_save_post_in_db(&pool, post_id, reader).await.unwrap());
    assert!(!is_post_saved_in_db(&pool, post_id, reader).await.unwrap());
}

#[tokio::test]
async fn toggle_follow_pair_restores_original_state() {
    let (_dir, pool) = test_pool().await;
    let follower = create_user(&pool, "follower", "Follower").await;
    let followed = create_user(&pool, "followed", "Followed").await;

    assert!(toggle_follow_in_db(&pool, follower, followed).await.unwrap());
    assert!(is_following_in_db(&pool, follower, followed).await.unwrap());

    assert!(!toggle_follow_in_db(&pool, follower, followed).await.unwrap());
    assert!(!is_following_in_db(&pool, follower, followed).await.unwrap());
}

#[tokio::test]
async fn liking_a_missing_post_is_not_found() {
    let (_dir, pool) = test_pool().await;
    let user = create_user(&pool, "somebody", "Somebody").await;

    let result = toggle_post_like_in_db(&pool, 999, user).await;
    assert!(matches!(result, Err(RequestError::NotFound(_))));
}

#[tokio::test]
async fn created_post_keeps_images_in_upload_order() {
    let (_dir, pool) = test_pool().await;
    let author = create_user(&pool, "author", "Author").await;
    let post_id = create_post(
        &pool,
        author,
        "three shots",
        &["a.jpg", "b.jpg", "c.jpg"],
        &["travel"],
    )
    .await;

    let post = get_post_in_db(&pool, None, post_id).await.unwrap().unwrap();
    assert_eq!(post.caption, "three shots");

    let images = fetch_images_for_posts(&pool, &[post_id]).await.unwrap();
    assert_eq!(images[&post_id], vec!["a.jpg", "b.jpg", "c.jpg"]);

    let hashtags = fetch_hashtags_for_posts(&pool, &[post_id]).await.unwrap();
    assert_eq!(hashtags[&post_id], vec!["travel"]);
}

#[tokio::test]
async fn hashtags_are_shared_between_posts() {
    let (_dir, pool) = test_pool().await;
    let author = create_user(&pool, "author", "Author").await;
    create_post(&pool, author, "first", &[], &["seoul"]).await;
    create_post(&pool, author, "second", &[], &["seoul", "food"]).await;

    let trending = trending_hashtags_in_db(&pool, 10).await.unwrap();
    assert_eq!(trending[0].name, "seoul");
    assert_eq!(trending[0].post_count, 2);

    let tagged = list_posts_by_hashtag_in_db(&pool, None, "seoul", 30)
        .await
        .unwrap();
    assert_eq!(tagged.len(), 2);
}

#[tokio::test]
async fn feed_reports_counts_and_viewer_flags() {
    let (_dir, pool) = test_pool().await;
    let author = create_user(&pool, "author", "Author").await;
    let viewer = create_user(&pool, "viewer", "Viewer").await;
    let plain_id = create_post(&pool, author, "plain", &[], &[]).await;
    let liked_id = create_post(&pool, author, "popular", &[], &[]).await;

    toggle_post_like_in_db(&pool, liked_id, viewer).await.unwrap();
    create_comment_in_db(&pool, viewer, liked_id, "nice", None)
        .await
        .unwrap();

    let feed = list_feed_in_db(&pool, Some(viewer), 10, 0).await.unwrap();
    assert_eq!(feed.len(), 2);

    let popular = feed.iter().find(|post| post.id == liked_id).unwrap();
    assert_eq!(popular.like_count, 1);
    assert_eq!(popular.comment_count, 1);
    assert!(popular.liked);

    let plain = feed.iter().find(|post| post.id == plain_id).unwrap();
    assert_eq!(plain.like_count, 0);
    assert!(!plain.liked);
}

#[tokio::test]
async fn only_the_author_can_delete_a_post() {
    let (_dir, pool) = test_pool().await;
    let author = create_user(&pool, "author", "Author").await;
    let stranger = create_user(&pool, "stranger", "Stranger").await;
    let post_id = create_post(&pool, author, "mine", &[], &[]).await;

    let result = delete_post_in_db(&pool, stranger, post_id).await;
    assert!(matches!(result, Err(RequestError::Forbidden)));

    delete_post_in_db(&pool, author, post_id).await.unwrap();
    assert!(get_post_in_db(&pool, None, post_id).await.unwrap().is_none());
}

#[tokio::test]
async fn conversation_lookup_ignores_argument_order() {
    let (_dir, pool) = test_pool().await;
    let mina = create_user(&pool, "mina", "Mina").await;
    let juno = create_user(&pool, "juno", "Juno").await;

    let (first_id, is_new) = find_or_create_conversation_in_db(&pool, mina, juno)
        .await
        .unwrap();
    assert!(is_new);

    let (second_id, is_new) = find_or_create_conversation_in_db(&pool, juno, mina)
        .await
        .unwrap();
    assert!(!is_new);
    assert_eq!(first_id, second_id);
}

#[tokio::test]
async fn messages_round_trip_and_read_state() {
    let (_dir, pool) = test_pool().await;
    let mina = create_user(&pool, "mina", "Mina").await;
    let juno = create_user(&pool, "juno", "Juno").await;
    let (conversation_id, _) = find_or_create_conversation_in_db(&pool, mina, juno)
        .await
        .unwrap();

    append_message_in_db(&pool, mina, conversation_id, "hello", None)
        .await
        .unwrap();
    append_message_in_db(&pool, mina, conversation_id, "are you there?", None)
        .await
        .unwrap();

    // Oldest first for display.
    let messages = list_messages_in_db(&pool, juno, conversation_id, 50, 0)
        .await
        .unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "hello");
    assert_eq!(messages[1].content, "are you there?");

    let conversations = list_conversations_in_db(&pool, juno).await.unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].unread_count, 2);
    assert_eq!(
        conversations[0].last_content.as_deref(),
        Some("are you there?")
    );
    assert_eq!(conversations[0].other_username, "mina");

    mark_conversation_read_in_db(&pool, juno, conversation_id)
        .await
        .unwrap();
    let conversations = list_conversations_in_db(&pool, juno).await.unwrap();
    assert_eq!(conversations[0].unread_count, 0);
}

#[tokio::test]
async fn outsiders_cannot_read_a_conversation() {
    let (_dir, pool) = test_pool().await;
    let mina = create_user(&pool, "mina", "Mina").await;
    let juno = create_user(&pool, "juno", "Juno").await;
    let nosy = create_user(&pool, "nosy", "Nosy").await;
    let (conversation_id, _) = find_or_create_conversation_in_db(&pool, mina, juno)
        .await
        .unwrap();

    let result = list_messages_in_db(&pool, nosy, conversation_id, 50, 0).await;
    assert!(matches!(result, Err(RequestError::Forbidden)));

    let result = append_message_in_db(&pool, nosy, conversation_id, "hi", None).await;
    assert!(matches!(result, Err(RequestError::Forbidden)));
}

#[tokio::test]
async fn self_notification_is_suppressed() {
    let (_dir, pool) = test_pool().await;
    let user = create_user(&pool, "loner", "Loner").await;

    notify_in_db(&pool, user, user, NotificationKind::Like, None, None)
        .await
        .unwrap();

    assert_eq!(
        unread_notification_count_in_db(&pool, user).await.unwrap(),
        0
    );
    assert!(list_notifications_in_db(&pool, user, 50)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn notification_settings_gate_each_kind() {
    let (_dir, pool) = test_pool().await;
    let recipient = create_user(&pool, "recipient", "Recipient").await;
    let actor = create_user(&pool, "actor", "Actor").await;

    update_settings_in_db(
        &pool,
        recipient,
        UpdateSettingsRequest {
            likes_enabled: Some(false),
            ..UpdateSettingsRequest::default()
        },
    )
    .await
    .unwrap();

    notify_in_db(&pool, recipient, actor, NotificationKind::Like, None, None)
        .await
        .unwrap();
    assert_eq!(
        unread_notification_count_in_db(&pool, recipient)
            .await
            .unwrap(),
        0
    );

    notify_in_db(&pool, recipient, actor, NotificationKind::Follow, None, None)
        .await
        .unwrap();
    assert_eq!(
        unread_notification_count_in_db(&pool, recipient)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn settings_lazy_initialization_is_stable() {
    let (_dir, pool) = test_pool().await;
    let user = create_user(&pool, "settings", "Settings").await;

    let first = get_or_create_settings_in_db(&pool, user).await.unwrap();
    assert!(first.likes_enabled);
    assert!(first.comments_enabled);
    assert!(first.follows_enabled);

    let second = get_or_create_settings_in_db(&pool, user).await.unwrap();
    assert_eq!(second.user_id, first.user_id);
    assert_eq!(second.likes_enabled, first.likes_enabled);
}

#[tokio::test]
async fn marking_notifications_read_clears_the_count() {
    let (_dir, pool) = test_pool().await;
    let recipient = create_user(&pool, "recipient", "Recipient").await;
    let actor = create_user(&pool, "actor", "Actor").await;

    notify_in_db(&pool, recipient, actor, NotificationKind::Follow, None, None)
        .await
        .unwrap();
    notify_in_db(&pool, recipient, actor, NotificationKind::Like, None, None)
        .await
        .unwrap();
    assert_eq!(
        unread_notification_count_in_db(&pool, recipient)
            .await
            .unwrap(),
        2
    );

    let notifications = list_notifications_in_db(&pool, recipient, 50).await.unwrap();
    mark_notification_read_in_db(&pool, recipient, notifications[0].id)
        .await
        .unwrap();
    assert_eq!(
        unread_notification_count_in_db(&pool, recipient)
            .await
            .unwrap(),
        1
    );

    mark_all_notifications_read_in_db(&pool, recipient)
        .await
        .unwrap();
    assert_eq!(
        unread_notification_count_in_db(&pool, recipient)
            .await
            .unwrap(),
        0
    );

    // Another user cannot touch someone else's notification.
    let result = mark_notification_read_in_db(&pool, actor, notifications[0].id).await;
    assert!(matches!(result, Err(RequestError::NotFound(_))));
}

#[tokio::test]
async fn blocking_severs_follow_edges_in_both_directions() {
    let (_dir, pool) = test_pool().await;
    let mina = create_user(&pool, "mina", "Mina").await;
    let juno = create_user(&pool, "juno", "Juno").await;

    toggle_follow_in_db(&pool, mina, juno).await.unwrap();
    toggle_follow_in_db(&pool, juno, mina).await.unwrap();
    assert!(is_following_in_db(&pool, mina, juno).await.unwrap());
    assert!(is_following_in_db(&pool, juno, mina).await.unwrap());

    assert!(toggle_block_in_db(&pool, mina, juno).await.unwrap());
    assert!(is_blocked_in_db(&pool, mina, juno).await.unwrap());
    assert!(!is_following_in_db(&pool, mina, juno).await.unwrap());
    assert!(!is_following_in_db(&pool, juno, mina).await.unwrap());

    // Unblocking does not resurrect the follows.
    assert!(!toggle_block_in_db(&pool, mina, juno).await.unwrap());
    assert!(!is_following_in_db(&pool, mina, juno).await.unwrap());
}

#[tokio::test]
async fn search_matches_substrings_case_insensitively() {
    let (_dir, pool) = test_pool().await;
    let kim = create_user(&pool, "minsu", "kim minsu").await;
    create_user(&pool, "other", "Somebody Else").await;
    create_post(&pool, kim, "Kimchi for dinner", &[], &["kimchi"]).await;

    let users = search_users_in_db(&pool, "KIM", 20).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].display_name, "kim minsu");

    let (users, posts, hashtags) = search_all_in_db(&pool, None, "KIM").await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].caption, "Kimchi for dinner");
    assert_eq!(hashtags.len(), 1);
    assert_eq!(hashtags[0].name, "kimchi");
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let (_dir, pool) = test_pool().await;
    create_user(&pool, "taken", "First").await;

    let result = insert_user(
        &pool,
        &RegisterRequest {
            username: "taken".to_owned(),
            password: "hash".to_owned(),
            display_name: "Second".to_owned(),
        },
    )
    .await;
    assert!(matches!(result, Err(RequestError::Conflict(_))));
}

#[tokio::test]
async fn replies_nest_exactly_one_level() {
    let (_dir, pool) = test_pool().await;
    let author = create_user(&pool, "author", "Author").await;
    let commenter = create_user(&pool, "commenter", "Commenter").await;
    let post_id = create_post(&pool, author, "thread me", &[], &[]).await;

    let (top, _) = create_comment_in_db(&pool, commenter, post_id, "first!", None)
        .await
        .unwrap();
    let (reply, _) = create_comment_in_db(&pool, author, post_id, "thanks", Some(top.id))
        .await
        .unwrap();

    let result = create_comment_in_db(&pool, commenter, post_id, "too deep", Some(reply.id)).await;
    assert!(matches!(result, Err(RequestError::RunTimeError(_))));

    let (top_level, replies) = list_comments_in_db(&pool, post_id).await.unwrap();
    assert_eq!(top_level.len(), 1);
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].parent_id, Some(top.id));

    let result = create_comment_in_db(&pool, commenter, 999, "ghost", None).await;
    assert!(matches!(result, Err(RequestError::NotFound(_))));
}

#[tokio::test]
async fn deleting_an_account_cascades() {
    let (_dir, pool) = test_pool().await;
    let leaver = create_user(&pool, "leaver", "Leaver").await;
    let friend = create_user(&pool, "friend", "Friend").await;
    let post_id = create_post(&pool, leaver, "goodbye", &["last.jpg"], &[]).await;
    toggle_follow_in_db(&pool, friend, leaver).await.unwrap();

    delete_account_in_db(&pool, leaver).await.unwrap();

    assert!(get_user_by_id(&pool, leaver).await.unwrap().is_none());
    assert!(get_post_in_db(&pool, None, post_id).await.unwrap().is_none());
    assert!(!is_following_in_db(&pool, friend, leaver).await.unwrap());
}

#[tokio::test]
async fn create_comment_request_accepts_missing_parent() {
    // The reply field is optional on the wire.
    let request: CreateCommentRequest = serde_json::from_str(r#"{"content": "hi"}"#).unwrap();
    assert_eq!(request.content, "hi");
    assert_eq!(request.parent_id, None);
}
