use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::{Hashtag, Post, UserSummary};

use super::{search_posts_in_db, USER_SUMMARY_COLUMNS};

// SQLite's LIKE is case-insensitive for ASCII, which is exactly the
// substring semantics the search screens expect.
pub async fn search_users_in_db(
    pool: &SqlitePool,
    pattern: &str,
    limit: i64,
) -> Result<Vec<UserSummary>, RequestError> {
    let query = format!(
        r#"
        SELECT {}
        FROM users
        WHERE username LIKE '%' || $1 || '%'
           OR display_name LIKE '%' || $1 || '%'
        ORDER BY username
        LIMIT $2
        "#,
        USER_SUMMARY_COLUMNS
    );
    let users = sqlx::query_as::<Sqlite, UserSummary>(&query)
        .bind(pattern)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(users)
}

/// Hashtags matching the pattern, busiest first. The post count is
/// computed from the link table on every read instead of being stored.
pub async fn search_hashtags_in_db(
    pool: &SqlitePool,
    pattern: &str,
    limit: i64,
) -> Result<Vec<Hashtag>, RequestError> {
    let hashtags = sqlx::query_as::<Sqlite, Hashtag>(
        r#"
        SELECT hashtags.id                    AS "id",
               hashtags.name                  AS "name",
               Count(post_hashtags.post_id)   AS "post_count"
        FROM   hashtags
            LEFT JOIN post_hashtags
                ON post_hashtags.hashtag_id = hashtags.id
        WHERE  hashtags.name LIKE '%' || $1 || '%'
        GROUP  BY hashtags.id
        ORDER  BY post_count DESC, hashtags.name ASC
        LIMIT  $2
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(hashtags)
}

pub async fn trending_hashtags_in_db(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<Hashtag>, RequestError> {
    let hashtags = sqlx::query_as::<Sqlite, Hashtag>(
        r#"
        SELECT hashtags.id                    AS "id",
               hashtags.name                  AS "name",
               Count(post_hashtags.post_id)   AS "post_count"
        FROM   hashtags
            LEFT JOIN post_hashtags
                ON post_hashtags.hashtag_id = hashtags.id
        GROUP  BY hashtags.id
        ORDER  BY post_count DESC, hashtags.name ASC
        LIMIT  $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(hashtags)
}

/// The combined search: three independent category queries issued
/// concurrently and merged once they have all settled.
pub async fn search_all_in_db(
    pool: &SqlitePool,
    viewer_id: Option<i64>,
    pattern: &str,
) -> Result<(Vec<UserSummary>, Vec<Post>, Vec<Hashtag>), RequestError> {
    let users = search_users_in_db(pool, pattern, 20);
    let posts = search_posts_in_db(pool, viewer_id, pattern, 30);
    let hashtags = search_hashtags_in_db(pool, pattern, 20);

    let (users, posts, hashtags) = tokio::try_join!(users, posts, hashtags)?;
    Ok((users, posts, hashtags))
}
