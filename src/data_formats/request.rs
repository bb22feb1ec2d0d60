use serde::{Deserialize, Serialize};

// ----------------- User Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct DeleteAccountRequest {
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct OnlineStatusRequest {
    pub is_online: bool,
}

// ----------------- Post Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdatePostRequest {
    pub caption: Option<String>,
    pub location: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CreateCommentRequest {
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

// ----------------- Message Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct StartConversationRequest {
    pub user_id: i64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct SendMessageRequest {
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

// ----------------- Notification Requests -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateSettingsRequest {
    pub likes_enabled: Option<bool>,
    pub comments_enabled: Option<bool>,
    pub follows_enabled: Option<bool>,
}
