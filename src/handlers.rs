use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query},
    http::{StatusCode, Uri},
    Extension, Json,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    authentication::{
        get_jwt_token, hash_password_argon2, verify_password_argon2, AuthUser, MaybeUser,
    },
    db_helpers::*,
    errors::RequestError,
    models::Post,
    BlockStatusResponse, BrowseQueryParams, ChangePasswordRequest, CommentResponse, CommentWrapper,
    ConversationResponse, ConversationStartedResponse, CreateCommentRequest, CreatePostRequest,
    DeleteAccountRequest, FeedQueryParams, FollowStatusResponse, HashtagResponse, LikeStatusResponse,
    LoginRequest, MessageQueryParams, MessageResponse, MessageWrapper, MultipleCommentsWrapper,
    MultipleConversationsWrapper, MultipleHashtagsWrapper, MultipleMessagesWrapper,
    MultipleNotificationsWrapper, MultiplePostsWrapper, MultipleUsersWrapper,
    NotificationQueryParams, NotificationResponse, OnlineStatusRequest, PostResponse, PostWrapper,
    ProfileResponse, ProfileWrapper, RegisterRequest, SaveStatusResponse, SearchQueryParams,
    SearchResultsWrapper, SendMessageRequest, SettingsResponse, SettingsWrapper,
    StartConversationRequest, TrendingQueryParams, UnreadCountResponse, UpdatePostRequest,
    UpdateProfileRequest, UpdateSettingsRequest, UserResponse, UserSummaryResponse, UserWrapper,
};

type JsonResult<T> = Result<Json<T>, RequestError>;

// ----------------- Helper Handlers -----------------

pub async fn check_health(
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<serde_json::Value> {
    read_health_check_in_db(&pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}

/// Attaches the ordered image URLs and hashtag names to a page of posts,
/// one query each for the whole page.
async fn hydrate_posts(
    pool: &SqlitePool,
    posts: Vec<Post>,
) -> Result<Vec<PostResponse>, RequestError> {
    let post_ids: Vec<i64> = posts.iter().map(|post| post.id).collect();
    let mut images = fetch_images_for_posts(pool, &post_ids).await?;
    let mut hashtags = fetch_hashtags_for_posts(pool, &post_ids).await?;
    Ok(posts
        .into_iter()
        .map(|post| {
            let post_images = images.remove(&post.id).unwrap_or_default();
            let post_hashtags = hashtags.remove(&post.id).unwrap_or_default();
            PostResponse::new(post, post_images, post_hashtags)
        })
        .collect())
}

async fn hydrate_post(pool: &SqlitePool, post: Post) -> Result<PostResponse, RequestError> {
    let mut posts = hydrate_posts(pool, vec![post]).await?;
    posts.pop().ok_or(RequestError::ServerError)
}

// ----------------- User Handlers -----------------

pub async fn register_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(UserWrapper { mut user }): Json<UserWrapper<RegisterRequest>>,
) -> JsonResult<UserWrapper<UserResponse>> {
    user.password = hash_password_argon2(user.password)
        .await
        .map_err(|_| RequestError::ServerError)?;

    let user = insert_user(&pool, &user).await?;
    let token = get_jwt_token(user.id).map_err(|_| RequestError::ServerError)?;

    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn login_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(UserWrapper { user: request }): Json<UserWrapper<LoginRequest>>,
) -> JsonResult<UserWrapper<UserResponse>> {
    let user = match get_user_by_username(&pool, &request.username).await? {
        Some(user) => user,
        // Wrong username and wrong password look the same to the caller.
        None => return Err(RequestError::NotAuthorized("Invalid username or password")),
    };

    let is_password_correct = verify_password_argon2(request.password, &user.password)
        .await
        .map_err(|_| RequestError::ServerError)?;
    if !is_password_correct {
        return Err(RequestError::NotAuthorized("Invalid username or password"));
    }

    let token = get_jwt_token(user.id).map_err(|_| RequestError::ServerError)?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn get_current_user(
    AuthUser { id, token }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<UserWrapper<UserResponse>> {
    let user = match get_user_by_id(&pool, id).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn update_profile(
    AuthUser { id, token }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(UserWrapper { user }): Json<UserWrapper<UpdateProfileRequest>>,
) -> JsonResult<UserWrapper<UserResponse>> {
    let user = update_profile_in_db(&pool, id, user).await?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn change_password(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, RequestError> {
    let user = match get_user_by_id(&pool, id).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };

    let is_password_correct = verify_password_argon2(request.current_password, &user.password)
        .await
        .map_err(|_| RequestError::ServerError)?;
    if !is_password_correct {
        return Err(RequestError::RunTimeError(
            "Current password does not match",
        ));
    }

    let hashed_password = hash_password_argon2(request.new_password)
        .await
        .map_err(|_| RequestError::ServerError)?;
    change_password_in_db(&pool, id, &hashed_password).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_account(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<DeleteAccountRequest>,
) -> Result<StatusCode, RequestError> {
    let user = match get_user_by_id(&pool, id).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };

    let is_password_correct = verify_password_argon2(request.password, &user.password)
        .await
        .map_err(|_| RequestError::ServerError)?;
    if !is_password_correct {
        return Err(RequestError::RunTimeError("Password does not match"));
    }

    delete_account_in_db(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_online_status(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<OnlineStatusRequest>,
) -> Result<StatusCode, RequestError> {
    set_online_status_in_db(&pool, id, request.is_online).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_saved_posts(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<FeedQueryParams>,
) -> JsonResult<MultiplePostsWrapper> {
    let posts =
        list_saved_posts_in_db(&pool, id, params.limit.into(), params.offset.into()).await?;
    let posts = hydrate_posts(&pool, posts).await?;
    Ok(Json(MultiplePostsWrapper {
        posts_count: posts.len(),
        posts,
    }))
}

pub async fn list_blocked_users(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<MultipleUsersWrapper> {
    let users = list_blocked_users_in_db(&pool, id).await?;
    Ok(Json(MultipleUsersWrapper {
        users: users.into_iter().map(UserSummaryResponse::new).collect(),
    }))
}

// ----------------- Profile Handlers -----------------

pub async fn get_profile(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(username): Path<String>,
) -> JsonResult<ProfileWrapper> {
    let (user, stats, following) =
        get_profile_in_db(&pool, maybe_user.get_id(), &username).await?;
    Ok(Json(ProfileWrapper {
        profile: ProfileResponse {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            profile_image: user.profile_image,
            is_online: user.is_online,
            post_count: stats.post_count,
            follower_count: stats.follower_count,
            following_count: stats.following_count,
            following,
        },
    }))
}

pub async fn toggle_follow(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(username): Path<String>,
) -> JsonResult<FollowStatusResponse> {
    let target = match get_user_by_username(&pool, &username).await? {
        Some(target) => target,
        None => return Err(RequestError::NotFound("User not found")),
    };

    let following = with_transient_retry(|| toggle_follow_in_db(&pool, id, target.id)).await?;
    if following {
        if let Err(error) =
            notify_in_db(&pool, target.id, id, NotificationKind::Follow, None, None).await
        {
            eprintln!("Failed to record follow notification: {:?}", error);
        }
    }
    Ok(Json(FollowStatusResponse { following }))
}

pub async fn toggle_block(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(username): Path<String>,
) -> JsonResult<BlockStatusResponse> {
    let target = match get_user_by_username(&pool, &username).await? {
        Some(target) => target,
        None => return Err(RequestError::NotFound("User not found")),
    };

    let blocked = with_transient_retry(|| toggle_block_in_db(&pool, id, target.id)).await?;
    Ok(Json(BlockStatusResponse { blocked }))
}

pub async fn list_followers(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(username): Path<String>,
) -> JsonResult<MultipleUsersWrapper> {
    let user = match get_user_by_username(&pool, &username).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };
    let users = list_followers_in_db(&pool, user.id).await?;
    Ok(Json(MultipleUsersWrapper {
        users: users.into_iter().map(UserSummaryResponse::new).collect(),
    }))
}

pub async fn list_following(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(username): Path<String>,
) -> JsonResult<MultipleUsersWrapper> {
    let user = match get_user_by_username(&pool, &username).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };
    let users = list_following_in_db(&pool, user.id).await?;
    Ok(Json(MultipleUsersWrapper {
        users: users.into_iter().map(UserSummaryResponse::new).collect(),
    }))
}

pub async fn list_profile_posts(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(username): Path<String>,
    Query(params): Query<FeedQueryParams>,
) -> JsonResult<MultiplePostsWrapper> {
    let user = match get_user_by_username(&pool, &username).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };
    let posts = list_posts_by_author_in_db(
        &pool,
        maybe_user.get_id(),
        user.id,
        params.limit.into(),
        params.offset.into(),
    )
    .await?;
    let posts = hydrate_posts(&pool, posts).await?;
    Ok(Json(MultiplePostsWrapper {
        posts_count: posts.len(),
        posts,
    }))
}

// ----------------- Post Handlers -----------------

pub async fn list_feed(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<FeedQueryParams>,
) -> JsonResult<MultiplePostsWrapper> {
    let posts = list_feed_in_db(
        &pool,
        maybe_user.get_id(),
        params.limit.into(),
        params.offset.into(),
    )
    .await?;
    let posts = hydrate_posts(&pool, posts).await?;
    Ok(Json(MultiplePostsWrapper {
        posts_count: posts.len(),
        posts,
    }))
}

pub async fn list_explore_posts(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<BrowseQueryParams>,
) -> JsonResult<MultiplePostsWrapper> {
    let posts = list_feed_in_db(&pool, maybe_user.get_id(), params.limit.into(), 0).await?;
    let posts = hydrate_posts(&pool, posts).await?;
    Ok(Json(MultiplePostsWrapper {
        posts_count: posts.len(),
        posts,
    }))
}

pub async fn create_post(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<CreatePostRequest>,
) -> JsonResult<PostWrapper> {
    let post = create_post_in_db(&pool, id, request).await?;
    let post = hydrate_post(&pool, post).await?;
    Ok(Json(PostWrapper { post }))
}

pub async fn get_post(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
) -> JsonResult<PostWrapper> {
    let post = match get_post_in_db(&pool, maybe_user.get_id(), post_id).await? {
        Some(post) => post,
        None => return Err(RequestError::NotFound("Post not found")),
    };
    let post = hydrate_post(&pool, post).await?;
    Ok(Json(PostWrapper { post }))
}

pub async fn update_post(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
    Json(request): Json<UpdatePostRequest>,
) -> JsonResult<PostWrapper> {
    let post = update_post_in_db(&pool, id, post_id, request).await?;
    let post = hydrate_post(&pool, post).await?;
    Ok(Json(PostWrapper { post }))
}

pub async fn delete_post(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    delete_post_in_db(&pool, id, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_post_like(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
) -> JsonResult<LikeStatusResponse> {
    let (liked, author_id) =
        with_transient_retry(|| toggle_post_like_in_db(&pool, post_id, id)).await?;
    if liked {
        if let Err(error) = notify_in_db(
            &pool,
            author_id,
            id,
            NotificationKind::Like,
            Some(post_id),
            None,
        )
        .await
        {
            eprintln!("Failed to record like notification: {:?}", error);
        }
    }
    Ok(Json(LikeStatusResponse { liked }))
}

pub async fn toggle_save_post(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
) -> JsonResult<SaveStatusResponse> {
    let saved = with_transient_retry(|| toggle_save_post_in_db(&pool, post_id, id)).await?;
    Ok(Json(SaveStatusResponse { saved }))
}

pub async fn list_post_likers(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
) -> JsonResult<MultipleUsersWrapper> {
    let users = list_liked_users_in_db(&pool, post_id).await?;
    Ok(Json(MultipleUsersWrapper {
        users: users.into_iter().map(UserSummaryResponse::new).collect(),
    }))
}

// ----------------- Comment Handlers -----------------

pub async fn list_post_comments(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
) -> JsonResult<MultipleCommentsWrapper> {
    let (top_level, replies) = list_comments_in_db(&pool, post_id).await?;

    let mut replies_by_parent: HashMap<i64, Vec<CommentResponse>> = HashMap::new();
    for reply in replies {
        let parent_id = reply.parent_id.unwrap_or_default();
        replies_by_parent
            .entry(parent_id)
            .or_default()
            .push(CommentResponse::new(reply, Vec::new()));
    }

    let comments = top_level
        .into_iter()
        .map(|comment| {
            let replies = replies_by_parent.remove(&comment.id).unwrap_or_default();
            CommentResponse::new(comment, replies)
        })
        .collect();

    Ok(Json(MultipleCommentsWrapper { comments }))
}

pub async fn create_post_comment(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(post_id): Path<i64>,
    Json(request): Json<CreateCommentRequest>,
) -> JsonResult<CommentWrapper> {
    let (comment, post_author) =
        create_comment_in_db(&pool, id, post_id, &request.content, request.parent_id).await?;

    if let Err(error) = notify_in_db(
        &pool,
        post_author,
        id,
        NotificationKind::Comment,
        Some(post_id),
        Some(comment.id),
    )
    .await
    {
        eprintln!("Failed to record comment notification: {:?}", error);
    }

    Ok(Json(CommentWrapper {
        comment: CommentResponse::new(comment, Vec::new()),
    }))
}

pub async fn delete_comment(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(comment_id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    delete_comment_in_db(&pool, id, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_comment_like(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(comment_id): Path<i64>,
) -> JsonResult<LikeStatusResponse> {
    let (liked, author_id, post_id) =
        with_transient_retry(|| toggle_comment_like_in_db(&pool, comment_id, id)).await?;
    if liked {
        if let Err(error) = notify_in_db(
            &pool,
            author_id,
            id,
            NotificationKind::Like,
            Some(post_id),
            Some(comment_id),
        )
        .await
        {
            eprintln!("Failed to record like notification: {:?}", error);
        }
    }
    Ok(Json(LikeStatusResponse { liked }))
}

// ----------------- Message Handlers -----------------

pub async fn list_conversations(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<MultipleConversationsWrapper> {
    let conversations = list_conversations_in_db(&pool, id).await?;
    Ok(Json(MultipleConversationsWrapper {
        conversations: conversations
            .into_iter()
            .map(ConversationResponse::new)
            .collect(),
    }))
}

pub async fn start_conversation(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<StartConversationRequest>,
) -> JsonResult<ConversationStartedResponse> {
    if get_user_by_id(&pool, request.user_id).await?.is_none() {
        return Err(RequestError::NotFound("User not found"));
    }
    let (conversation_id, is_new) =
        find_or_create_conversation_in_db(&pool, id, request.user_id).await?;
    Ok(Json(ConversationStartedResponse {
        id: conversation_id,
        is_new,
    }))
}

pub async fn list_conversation_messages(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(conversation_id): Path<i64>,
    Query(params): Query<MessageQueryParams>,
) -> JsonResult<MultipleMessagesWrapper> {
    let messages = list_messages_in_db(
        &pool,
        id,
        conversation_id,
        params.limit.into(),
        params.offset.into(),
    )
    .await?;
    Ok(Json(MultipleMessagesWrapper {
        messages: messages.into_iter().map(MessageResponse::new).collect(),
    }))
}

pub async fn send_conversation_message(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(conversation_id): Path<i64>,
    Json(request): Json<SendMessageRequest>,
) -> JsonResult<MessageWrapper> {
    let message = with_transient_retry(|| {
        append_message_in_db(
            &pool,
            id,
            conversation_id,
            &request.content,
            request.image_url.as_deref(),
        )
    })
    .await?;
    Ok(Json(MessageWrapper {
        message: MessageResponse::new(message),
    }))
}

pub async fn mark_conversation_read(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(conversation_id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    mark_conversation_read_in_db(&pool, id, conversation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------- Notification Handlers -----------------

pub async fn list_notifications(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<NotificationQueryParams>,
) -> JsonResult<MultipleNotificationsWrapper> {
    let notifications = list_notifications_in_db(&pool, id, params.limit.into()).await?;
    Ok(Json(MultipleNotificationsWrapper {
        notifications: notifications
            .into_iter()
            .map(NotificationResponse::new)
            .collect(),
    }))
}

pub async fn unread_notification_count(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<UnreadCountResponse> {
    let count = unread_notification_count_in_db(&pool, id).await?;
    Ok(Json(UnreadCountResponse { count }))
}

pub async fn mark_notification_read(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(notification_id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    mark_notification_read_in_db(&pool, id, notification_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_notifications_read(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> Result<StatusCode, RequestError> {
    mark_all_notifications_read_in_db(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_notification_settings(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<SettingsWrapper> {
    let settings = get_or_create_settings_in_db(&pool, id).await?;
    Ok(Json(SettingsWrapper {
        settings: SettingsResponse::new(settings),
    }))
}

pub async fn update_notification_settings(
    AuthUser { id, .. }: AuthUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<UpdateSettingsRequest>,
) -> JsonResult<SettingsWrapper> {
    let settings = update_settings_in_db(&pool, id, request).await?;
    Ok(Json(SettingsWrapper {
        settings: SettingsResponse::new(settings),
    }))
}

// ----------------- Search Handlers -----------------

pub async fn search_all(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<SearchQueryParams>,
) -> JsonResult<SearchResultsWrapper> {
    let (users, posts, hashtags) =
        search_all_in_db(&pool, maybe_user.get_id(), &params.q).await?;
    let posts = hydrate_posts(&pool, posts).await?;
    Ok(Json(SearchResultsWrapper {
        users: users.into_iter().map(UserSummaryResponse::new).collect(),
        posts,
        hashtags: hashtags.into_iter().map(HashtagResponse::new).collect(),
    }))
}

pub async fn search_users(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<SearchQueryParams>,
) -> JsonResult<MultipleUsersWrapper> {
    let users = search_users_in_db(&pool, &params.q, params.limit.into()).await?;
    Ok(Json(MultipleUsersWrapper {
        users: users.into_iter().map(UserSummaryResponse::new).collect(),
    }))
}

pub async fn search_posts(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<SearchQueryParams>,
) -> JsonResult<MultiplePostsWrapper> {
    let posts =
        search_posts_in_db(&pool, maybe_user.get_id(), &params.q, params.limit.into()).await?;
    let posts = hydrate_posts(&pool, posts).await?;
    Ok(Json(MultiplePostsWrapper {
        posts_count: posts.len(),
        posts,
    }))
}

pub async fn search_hashtags(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<SearchQueryParams>,
) -> JsonResult<MultipleHashtagsWrapper> {
    let hashtags = search_hashtags_in_db(&pool, &params.q, params.limit.into()).await?;
    Ok(Json(MultipleHashtagsWrapper {
        hashtags: hashtags.into_iter().map(HashtagResponse::new).collect(),
    }))
}

pub async fn trending_hashtags(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<TrendingQueryParams>,
) -> JsonResult<MultipleHashtagsWrapper> {
    let hashtags = trending_hashtags_in_db(&pool, params.limit.into()).await?;
    Ok(Json(MultipleHashtagsWrapper {
        hashtags: hashtags.into_iter().map(HashtagResponse::new).collect(),
    }))
}

pub async fn list_hashtag_posts(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(name): Path<String>,
    Query(params): Query<BrowseQueryParams>,
) -> JsonResult<MultiplePostsWrapper> {
    let posts =
        list_posts_by_hashtag_in_db(&pool, maybe_user.get_id(), &name, params.limit.into()).await?;
    let posts = hydrate_posts(&pool, posts).await?;
    Ok(Json(MultiplePostsWrapper {
        posts_count: posts.len(),
        posts,
    }))
}
