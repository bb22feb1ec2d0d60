use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::UpdateSettingsRequest;
use crate::errors::RequestError;
use crate::models::{Notification, NotificationSettings};

const NOTIFICATION_QUERY: &str = r#"
            SELECT notifications.id           AS "id",
                   notifications.recipient_id AS "recipient_id",
                   notifications.actor_id     AS "actor_id",
                   notifications.kind         AS "kind",
                   notifications.post_id      AS "post_id",
                   notifications.comment_id   AS "comment_id",
                   notifications.is_read      AS "is_read",
                   notifications.created_at   AS "created_at",
                   users.username             AS "actor_username",
                   users.display_name         AS "actor_display_name",
                   users.profile_image        AS "actor_image",
                   (SELECT image_url
                    FROM   post_images
                    WHERE  post_images.post_id = notifications.post_id
                    ORDER  BY post_images.order_index
                    LIMIT  1) AS "post_thumbnail"
            FROM   notifications
                JOIN users
                    ON users.id = notifications.actor_id
            WHERE  notifications.recipient_id = $1
            ORDER  BY notifications.created_at DESC, notifications.id DESC
            LIMIT  $2
     "#;

#[derive(Debug, Clone, Copy)]
pub enum NotificationKind {
    Like,
    Follow,
    Comment,
}

impl NotificationKind {
    fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Follow => "follow",
            NotificationKind::Comment => "comment",
        }
    }
}

/// Records that an actor did something to a recipient. Self-actions are
/// silently dropped, as are kinds the recipient has switched off.
pub async fn notify_in_db(
    pool: &SqlitePool,
    recipient_id: i64,
    actor_id: i64,
    kind: NotificationKind,
    post_id: Option<i64>,
    comment_id: Option<i64>,
) -> Result<(), RequestError> {
    if recipient_id == actor_id {
        return Ok(());
    }

    let settings = get_or_create_settings_in_db(pool, recipient_id).await?;
    let enabled = match kind {
        NotificationKind::Like => settings.likes_enabled,
        NotificationKind::Comment => settings.comments_enabled,
        NotificationKind::Follow => settings.follows_enabled,
    };
    if !enabled {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO notifications (recipient_id, actor_id, kind, post_id, comment_id)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(recipient_id)
    .bind(actor_id)
    .bind(kind.as_str())
    .bind(post_id)
    .bind(comment_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_notifications_in_db(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> Result<Vec<Notification>, RequestError> {
    let notifications = sqlx::query_as::<Sqlite, Notification>(NOTIFICATION_QUERY)
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(notifications)
}

pub async fn unread_notification_count_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<i64, RequestError> {
    let count = sqlx::query_scalar::<Sqlite, i64>(
        "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = FALSE",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn mark_notification_read_in_db(
    pool: &SqlitePool,
    user_id: i64,
    notification_id: i64,
) -> Result<(), RequestError> {
    let result =
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND recipient_id = $2")
            .bind(notification_id)
            .bind(user_id)
            .execute(pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Notification not found"));
    }
    Ok(())
}

pub async fn mark_all_notifications_read_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<(), RequestError> {
    sqlx::query(
        "UPDATE notifications SET is_read = TRUE WHERE recipient_id = $1 AND is_read = FALSE",
    )
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Lazy initialization that leans on the primary key: insert-if-absent,
/// then re-read. Two racing first-reads converge on the same row.
pub async fn get_or_create_settings_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<NotificationSettings, RequestError> {
    sqlx::query("INSERT INTO notification_settings (user_id) VALUES ($1) ON CONFLICT DO NOTHING")
        .bind(user_id)
        .execute(pool)
        .await?;

    let settings = sqlx::query_as::<Sqlite, NotificationSettings>(
        r#"
        SELECT user_id, likes_enabled, comments_enabled, follows_enabled, updated_at
        FROM notification_settings
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(settings)
}

pub async fn update_settings_in_db(
    pool: &SqlitePool,
    user_id: i64,
    UpdateSettingsRequest {
        likes_enabled,
        comments_enabled,
        follows_enabled,
    }: UpdateSettingsRequest,
) -> Result<NotificationSettings, RequestError> {
    // Make sure the row exists before the partial update touches it.
    get_or_create_settings_in_db(pool, user_id).await?;

    sqlx::query(
        r#"
        UPDATE notification_settings
        SET likes_enabled    = COALESCE($1, likes_enabled),
            comments_enabled = COALESCE($2, comments_enabled),
            follows_enabled  = COALESCE($3, follows_enabled),
            updated_at       = CURRENT_TIMESTAMP
        WHERE user_id = $4
        "#,
    )
    .bind(likes_enabled)
    .bind(comments_enabled)
    .bind(follows_enabled)
    .bind(user_id)
    .execute(pool)
    .await?;

    get_or_create_settings_in_db(pool, user_id).await
}
