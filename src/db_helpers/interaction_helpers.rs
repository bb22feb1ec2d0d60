use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::UserSummary;

use super::USER_SUMMARY_COLUMNS;

/// Toggles run as a single transaction: an insert guarded by the unique
/// index, and a delete when the insert found the row already there. Two
/// toggles in a row always restore the original state.
pub async fn toggle_post_like_in_db(
    pool: &SqlitePool,
    post_id: i64,
    user_id: i64,
) -> Result<(bool, i64), RequestError> {
    let author_id =
        sqlx::query_scalar::<Sqlite, i64>("SELECT author_id FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(pool)
            .await?;
    let author_id = match author_id {
        Some(author_id) => author_id,
        None => return Err(RequestError::NotFound("Post not found")),
    };

    let mut tx = pool.begin().await?;
    let inserted = sqlx::query(
        r#"
        INSERT INTO likes (post_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .execute(&mut tx)
    .await?
    .rows_affected();

    let liked = if inserted == 0 {
        sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut tx)
            .await?;
        false
    } else {
        true
    };
    tx.commit().await?;

    Ok((liked, author_id))
}

/// Returns the new state plus the comment's author and post, so the
/// caller can fan out a notification without re-reading.
pub async fn toggle_comment_like_in_db(
    pool: &SqlitePool,
    comment_id: i64,
    user_id: i64,
) -> Result<(bool, i64, i64), RequestError> {
    let comment = sqlx::query_as::<Sqlite, (i64, i64)>(
        "SELECT author_id, post_id FROM comments WHERE id = $1",
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await?;
    let (author_id, post_id) = match comment {
        Some(comment) => comment,
        None => return Err(RequestError::NotFound("Comment not found")),
    };

    let mut tx = pool.begin().await?;
    let inserted = sqlx::query(
        r#"
        INSERT INTO likes (comment_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(comment_id)
    .bind(user_id)
    .execute(&mut tx)
    .await?
    .rows_affected();

    let liked = if inserted == 0 {
        sqlx::query("DELETE FROM likes WHERE comment_id = $1 AND user_id = $2")
            .bind(comment_id)
            .bind(user_id)
            .execute(&mut tx)
            .await?;
        false
    } else {
        true
    };
    tx.commit().await?;

    Ok((liked, author_id, post_id))
}

pub async fn is_post_liked_in_db(
    pool: &SqlitePool,
    post_id: i64,
    user_id: i64,
) -> Result<bool, RequestError> {
    let liked = sqlx::query_scalar::<Sqlite, bool>(
        "SELECT EXISTS (SELECT 1 FROM likes WHERE post_id = $1 AND user_id = $2)",
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(liked)
}

pub async fn list_liked_users_in_db(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<UserSummary>, RequestError> {
    let query = format!(
        r#"
        SELECT {}
        FROM users
            JOIN likes ON likes.user_id = users.id
        WHERE likes.post_id = $1
        ORDER BY likes.created_at DESC
        "#,
        USER_SUMMARY_COLUMNS
    );
    let users = sqlx::query_as::<Sqlite, UserSummary>(&query)
        .bind(post_id)
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn toggle_save_post_in_db(
    pool: &SqlitePool,
    post_id: i64,
    user_id: i64,
) -> Result<bool, RequestError> {
    let exists = sqlx::query_scalar::<Sqlite, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1)")
        .bind(post_id)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Err(RequestError::NotFound("Post not found"));
    }

    let mut tx = pool.begin().await?;
    let inserted = sqlx::query(
        r#"
        INSERT INTO saved_posts (post_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .execute(&mut tx)
    .await?
    .rows_affected();

    let saved = if inserted == 0 {
        sqlx::query("DELETE FROM saved_posts WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut tx)
            .await?;
        false
    } else {
        true
    };
    tx.commit().await?;

    Ok(saved)
}

pub async fn is_post_saved_in_db(
    pool: &SqlitePool,
    post_id: i64,
    user_id: i64,
) -> Result<bool, RequestError> {
    let saved = sqlx::query_scalar::<Sqlite, bool>(
        "SELECT EXISTS (SELECT 1 FROM saved_posts WHERE post_id = $1 AND user_id = $2)",
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(saved)
}
