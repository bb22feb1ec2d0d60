use serde::{Deserialize, Serialize};

use super::response::{
    CommentResponse, ConversationResponse, HashtagResponse, MessageResponse, NotificationResponse,
    PostResponse, ProfileResponse, SettingsResponse, UserSummaryResponse,
};

#[derive(Debug, Deserialize, Serialize)]
pub struct UserWrapper<T> {
    pub user: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProfileWrapper {
    pub profile: ProfileResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostWrapper {
    pub post: PostResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultiplePostsWrapper {
    pub posts: Vec<PostResponse>,
    pub posts_count: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CommentWrapper {
    pub comment: CommentResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleCommentsWrapper {
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleUsersWrapper {
    pub users: Vec<UserSummaryResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleConversationsWrapper {
    pub conversations: Vec<ConversationResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MessageWrapper {
    pub message: MessageResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleMessagesWrapper {
    pub messages: Vec<MessageResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleNotificationsWrapper {
    pub notifications: Vec<NotificationResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SettingsWrapper {
    pub settings: SettingsResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleHashtagsWrapper {
    pub hashtags: Vec<HashtagResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SearchResultsWrapper {
    pub users: Vec<UserSummaryResponse>,
    pub posts: Vec<PostResponse>,
    pub hashtags: Vec<HashtagResponse>,
}

impl<T> UserWrapper<T> {
    pub fn wrap_with_user_data(request: T) -> UserWrapper<T> {
        UserWrapper { user: request }
    }
}
