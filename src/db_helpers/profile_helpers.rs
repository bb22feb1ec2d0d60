use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::{User, UserSummary};

use super::{get_user_by_username, USER_SUMMARY_COLUMNS};

#[derive(Debug, Clone, Copy)]
pub struct ProfileStats {
    pub post_count: i64,
    pub follower_count: i64,
    pub following_count: i64,
}

/// A profile page: the user, their counts and whether the viewer already
/// follows them. The three counts are independent reads issued
/// concurrently and settled together.
pub async fn get_profile_in_db(
    pool: &SqlitePool,
    viewer_id: Option<i64>,
    username: &str,
) -> Result<(User, ProfileStats, bool), RequestError> {
    let user = match get_user_by_username(pool, username).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };

    let stats = get_user_stats_in_db(pool, user.id).await?;

    let following = match viewer_id {
        Some(viewer_id) => is_following_in_db(pool, viewer_id, user.id).await?,
        None => false,
    };

    Ok((user, stats, following))
}

pub async fn get_user_stats_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<ProfileStats, RequestError> {
    let posts = sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM posts WHERE author_id = $1")
        .bind(user_id)
        .fetch_one(pool);
    let followers =
        sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM follows WHERE following_id = $1")
            .bind(user_id)
            .fetch_one(pool);
    let following =
        sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_one(pool);

    let (post_count, follower_count, following_count) =
        tokio::try_join!(posts, followers, following)?;

    Ok(ProfileStats {
        post_count,
        follower_count,
        following_count,
    })
}

pub async fn toggle_follow_in_db(
    pool: &SqlitePool,
    follower_id: i64,
    following_id: i64,
) -> Result<bool, RequestError> {
    if follower_id == following_id {
        return Err(RequestError::RunTimeError("Cannot follow yourself"));
    }

    let mut tx = pool.begin().await?;
    let inserted = sqlx::query(
        r#"
        INSERT INTO follows (follower_id, following_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(follower_id)
    .bind(following_id)
    .execute(&mut tx)
    .await?
    .rows_affected();

    let following = if inserted == 0 {
        sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
            .bind(follower_id)
            .bind(following_id)
            .execute(&mut tx)
            .await?;
        false
    } else {
        true
    };
    tx.commit().await?;

    Ok(following)
}

pub async fn is_following_in_db(
    pool: &SqlitePool,
    follower_id: i64,
    following_id: i64,
) -> Result<bool, RequestError> {
    let following = sqlx::query_scalar::<Sqlite, bool>(
        "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2)",
    )
    .bind(follower_id)
    .bind(following_id)
    .fetch_one(pool)
    .await?;
    Ok(following)
}

pub async fn list_followers_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<UserSummary>, RequestError> {
    let query = format!(
        r#"
        SELECT {}
        FROM users
            JOIN follows ON follows.follower_id = users.id
        WHERE follows.following_id = $1
        ORDER BY follows.created_at DESC
        "#,
        USER_SUMMARY_COLUMNS
    );
    let users = sqlx::query_as::<Sqlite, UserSummary>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn list_following_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<UserSummary>, RequestError> {
    let query = format!(
        r#"
        SELECT {}
        FROM users
            JOIN follows ON follows.following_id = users.id
        WHERE follows.follower_id = $1
        ORDER BY follows.created_at DESC
        "#,
        USER_SUMMARY_COLUMNS
    );
    let users = sqlx::query_as::<Sqlite, UserSummary>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(users)
}

/// Turning a block on also severs the follow relation in both directions.
/// Both writes sit in the same transaction: a block either lands together
/// with the cleanup or not at all.
pub async fn toggle_block_in_db(
    pool: &SqlitePool,
    blocker_id: i64,
    blocked_id: i64,
) -> Result<bool, RequestError> {
    if blocker_id == blocked_id {
        return Err(RequestError::RunTimeError("Cannot block yourself"));
    }

    let mut tx = pool.begin().await?;
    let inserted = sqlx::query(
        r#"
        INSERT INTO blocks (blocker_id, blocked_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(blocker_id)
    .bind(blocked_id)
    .execute(&mut tx)
    .await?
    .rows_affected();

    let blocked = if inserted == 0 {
        sqlx::query("DELETE FROM blocks WHERE blocker_id = $1 AND blocked_id = $2")
            .bind(blocker_id)
            .bind(blocked_id)
            .execute(&mut tx)
            .await?;
        false
    } else {
        sqlx::query(
            r#"
            DELETE FROM follows
            WHERE ( follower_id = $1 AND following_id = $2 )
               OR ( follower_id = $2 AND following_id = $1 )
            "#,
        )
        .bind(blocker_id)
        .bind(blocked_id)
        .execute(&mut tx)
        .await?;
        true
    };
    tx.commit().await?;

    Ok(blocked)
}

pub async fn is_blocked_in_db(
    pool: &SqlitePool,
    blocker_id: i64,
    blocked_id: i64,
) -> Result<bool, RequestError> {
    let blocked = sqlx::query_scalar::<Sqlite, bool>(
        "SELECT EXISTS (SELECT 1 FROM blocks WHERE blocker_id = $1 AND blocked_id = $2)",
    )
    .bind(blocker_id)
    .bind(blocked_id)
    .fetch_one(pool)
    .await?;
    Ok(blocked)
}

pub async fn list_blocked_users_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<UserSummary>, RequestError> {
    let query = format!(
        r#"
        SELECT {}
        FROM users
            JOIN blocks ON blocks.blocked_id = users.id
        WHERE blocks.blocker_id = $1
        ORDER BY blocks.created_at DESC
        "#,
        USER_SUMMARY_COLUMNS
    );
    let users = sqlx::query_as::<Sqlite, UserSummary>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(users)
}
