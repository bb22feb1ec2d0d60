use chrono::NaiveDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub profile_image: Option<String>,
    pub is_online: bool,
    pub last_active_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// The slice of a user that rides along on posts, comments, messages and
/// follower/like listings.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub profile_image: Option<String>,
}

/// A post row joined with its author and interaction counts. Image URLs
/// and hashtag names are attached separately, one query per page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub caption: String,
    pub location: Option<String>,
    pub created_at: NaiveDateTime,
    pub author_username: String,
    pub author_display_name: String,
    pub author_image: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked: bool,
    pub saved: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostImage {
    pub post_id: i64,
    pub image_url: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostHashtag {
    pub post_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
    pub parent_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub author_username: String,
    pub author_display_name: String,
    pub author_image: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Hashtag {
    pub id: i64,
    pub name: String,
    pub post_count: i64,
}

/// One entry of a user's conversation list: the other participant, the
/// latest message preview and how many inbound messages are unread.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConversationEntry {
    pub id: i64,
    pub updated_at: NaiveDateTime,
    pub other_id: i64,
    pub other_username: String,
    pub other_display_name: String,
    pub other_image: Option<String>,
    pub other_is_online: bool,
    pub last_content: Option<String>,
    pub last_sent_at: Option<NaiveDateTime>,
    pub unread_count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub image_url: Option<String>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
    pub sender_username: String,
    pub sender_display_name: String,
    pub sender_image: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Notification {
    pub id: i64,
    pub recipient_id: i64,
    pub actor_id: i64,
    pub kind: String,
    pub post_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
    pub actor_username: String,
    pub actor_display_name: String,
    pub actor_image: Option<String>,
    pub post_thumbnail: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationSettings {
    pub user_id: i64,
    pub likes_enabled: bool,
    pub comments_enabled: bool,
    pub follows_enabled: bool,
    pub updated_at: NaiveDateTime,
}
