use serde::{Deserialize, Serialize};

use crate::models::{
    Comment, ConversationEntry, Hashtag, Message, Notification, NotificationSettings, Post, User,
    UserSummary,
};

#[derive(Deserialize, Serialize, Debug)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub profile_image: Option<String>,
    pub token: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UserSummaryResponse {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub profile_image: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ProfileResponse {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub profile_image: Option<String>,
    pub is_online: bool,
    pub post_count: i64,
    pub follower_count: i64,
    pub following_count: i64,
    pub following: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PostResponse {
    pub id: i64,
    pub caption: String,
    pub location: Option<String>,
    pub created_at: String,
    pub author: UserSummaryResponse,
    pub images: Vec<String>,
    pub hashtags: Vec<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked: bool,
    pub saved: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    pub created_at: String,
    pub author: UserSummaryResponse,
    pub replies: Vec<CommentResponse>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ConversationResponse {
    pub id: i64,
    pub updated_at: String,
    pub other_user: ConversationUserResponse,
    pub last_message: Option<LastMessageResponse>,
    pub unread_count: i64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ConversationUserResponse {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub profile_image: Option<String>,
    pub is_online: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LastMessageResponse {
    pub content: String,
    pub sent_at: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ConversationStartedResponse {
    pub id: i64,
    pub is_new: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct MessageResponse {
    pub id: i64,
    pub conversation_id: i64,
    pub content: String,
    pub image_url: Option<String>,
    pub is_read: bool,
    pub created_at: String,
    pub sender: UserSummaryResponse,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct NotificationResponse {
    pub id: i64,
    pub kind: String,
    pub post_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub post_thumbnail: Option<String>,
    pub is_read: bool,
    pub created_at: String,
    pub actor: UserSummaryResponse,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct SettingsResponse {
    pub likes_enabled: bool,
    pub comments_enabled: bool,
    pub follows_enabled: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct HashtagResponse {
    pub id: i64,
    pub name: String,
    pub post_count: i64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct UnreadCountResponse {
    pub count: i64,
}

// Toggle outcomes mirror the shape the view layer expects: a single
// boolean naming the resulting state.
#[derive(Deserialize, Serialize, Debug)]
pub struct LikeStatusResponse {
    pub liked: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct FollowStatusResponse {
    pub following: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct BlockStatusResponse {
    pub blocked: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct SaveStatusResponse {
    pub saved: bool,
}

impl UserResponse {
    pub fn new(
        User {
            id,
            username,
            display_name,
            profile_image,
            ..
        }: User,
        token: String,
    ) -> Self {
        UserResponse {
            id,
            username,
            display_name,
            profile_image,
            token,
        }
    }
}

impl UserSummaryResponse {
    pub fn new(
        UserSummary {
            id,
            username,
            display_name,
            profile_image,
        }: UserSummary,
    ) -> Self {
        UserSummaryResponse {
            id,
            username,
            display_name,
            profile_image,
        }
    }
}

impl PostResponse {
    pub fn new(post: Post, images: Vec<String>, hashtags: Vec<String>) -> Self {
        PostResponse {
            id: post.id,
            caption: post.caption,
            location: post.location,
            created_at: post.created_at.to_string(),
            author: UserSummaryResponse {
                id: post.author_id,
                username: post.author_username,
                display_name: post.author_display_name,
                profile_image: post.author_image,
            },
            images,
            hashtags,
            like_count: post.like_count,
            comment_count: post.comment_count,
            liked: post.liked,
            saved: post.saved,
        }
    }
}

impl CommentResponse {
    pub fn new(comment: Comment, replies: Vec<CommentResponse>) -> Self {
        CommentResponse {
            id: comment.id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            content: comment.content,
            created_at: comment.created_at.to_string(),
            author: UserSummaryResponse {
                id: comment.author_id,
                username: comment.author_username,
                display_name: comment.author_display_name,
                profile_image: comment.author_image,
            },
            replies,
        }
    }
}

impl ConversationResponse {
    pub fn new(entry: ConversationEntry) -> Self {
        let last_message = match (entry.last_content, entry.last_sent_at) {
            (Some(content), Some(sent_at)) => Some(LastMessageResponse {
                content,
                sent_at: sent_at.to_string(),
            }),
            _ => None,
        };
        ConversationResponse {
            id: entry.id,
            updated_at: entry.updated_at.to_string(),
            other_user: ConversationUserResponse {
                id: entry.other_id,
                username: entry.other_username,
                display_name: entry.other_display_name,
                profile_image: entry.other_image,
                is_online: entry.other_is_online,
            },
            last_message,
            unread_count: entry.unread_count,
        }
    }
}

impl MessageResponse {
    pub fn new(message: Message) -> Self {
        MessageResponse {
            id: message.id,
            conversation_id: message.conversation_id,
            content: message.content,
            image_url: message.image_url,
            is_read: message.is_read,
            created_at: message.created_at.to_string(),
            sender: UserSummaryResponse {
                id: message.sender_id,
                username: message.sender_username,
                display_name: message.sender_display_name,
                profile_image: message.sender_image,
            },
        }
    }
}

impl NotificationResponse {
    pub fn new(notification: Notification) -> Self {
        NotificationResponse {
            id: notification.id,
            kind: notification.kind,
            post_id: notification.post_id,
            comment_id: notification.comment_id,
            post_thumbnail: notification.post_thumbnail,
            is_read: notification.is_read,
            created_at: notification.created_at.to_string(),
            actor: UserSummaryResponse {
                id: notification.actor_id,
                username: notification.actor_username,
                display_name: notification.actor_display_name,
                profile_image: notification.actor_image,
            },
        }
    }
}

impl SettingsResponse {
    pub fn new(settings: NotificationSettings) -> Self {
        SettingsResponse {
            likes_enabled: settings.likes_enabled,
            comments_enabled: settings.comments_enabled,
            follows_enabled: settings.follows_enabled,
        }
    }
}

impl HashtagResponse {
    pub fn new(Hashtag { id, name, post_count }: Hashtag) -> Self {
        HashtagResponse {
            id,
            name,
            post_count,
        }
    }
}
