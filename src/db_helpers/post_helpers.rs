use std::collections::HashMap;

use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::{CreatePostRequest, UpdatePostRequest};
use crate::errors::RequestError;
use crate::models::{Post, PostHashtag, PostImage};

use super::{id_list, QueryBuilder};

// One query serves the feed, a single post, an author's page, caption
// search, hashtag browsing and the saved-posts list: every filter
// collapses to a no-op when its bind is NULL. $1 is the viewer (NULL for
// visitors), used only for the liked/saved flags.
const POST_QUERY: &str = r#"
            SELECT posts.id            AS "id",
                   posts.author_id     AS "author_id",
                   posts.caption       AS "caption",
                   posts.location      AS "location",
                   posts.created_at    AS "created_at",
                   users.username      AS "author_username",
                   users.display_name  AS "author_display_name",
                   users.profile_image AS "author_image",
                   (SELECT Count(*)
                    FROM   likes
                    WHERE  likes.post_id = posts.id)    AS "like_count",
                   (SELECT Count(*)
                    FROM   comments
                    WHERE  comments.post_id = posts.id) AS "comment_count",
                   EXISTS (SELECT 1
                           FROM   likes
                           WHERE  likes.post_id = posts.id
                              AND likes.user_id = $1)   AS "liked",
                   EXISTS (SELECT 1
                           FROM   saved_posts
                           WHERE  saved_posts.post_id = posts.id
                              AND saved_posts.user_id = $1) AS "saved"
            FROM   posts
                JOIN users
                    ON posts.author_id = users.id
            WHERE  ( posts.id = $2
                     OR $2 IS NULL )
               AND ( posts.author_id = $3
                     OR $3 IS NULL )
               AND ( posts.caption LIKE '%' || $4 || '%'
                     OR $4 IS NULL )
               AND ( EXISTS (SELECT 1
                             FROM   post_hashtags
                                 JOIN hashtags
                                     ON hashtags.id = post_hashtags.hashtag_id
                             WHERE  post_hashtags.post_id = posts.id
                                AND hashtags.name = $5)
                     OR $5 IS NULL )
               AND ( EXISTS (SELECT 1
                             FROM   saved_posts
                             WHERE  saved_posts.post_id = posts.id
                                AND saved_posts.user_id = $6)
                     OR $6 IS NULL )
            ORDER  BY posts.created_at DESC, posts.id DESC
            LIMIT  $7 offset $8
     "#;

#[derive(Debug, Default)]
struct PostFilter {
    post_id: Option<i64>,
    author_id: Option<i64>,
    caption: Option<String>,
    hashtag: Option<String>,
    saved_by: Option<i64>,
}

async fn query_posts(
    pool: &SqlitePool,
    viewer_id: Option<i64>,
    filter: PostFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, RequestError> {
    let posts = sqlx::query_as::<Sqlite, Post>(POST_QUERY)
        .bind(viewer_id)
        .bind(filter.post_id)
        .bind(filter.author_id)
        .bind(filter.caption)
        .bind(filter.hashtag)
        .bind(filter.saved_by)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(posts)
}

pub async fn list_feed_in_db(
    pool: &SqlitePool,
    viewer_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, RequestError> {
    query_posts(pool, viewer_id, PostFilter::default(), limit, offset).await
}

pub async fn get_post_in_db(
    pool: &SqlitePool,
    viewer_id: Option<i64>,
    post_id: i64,
) -> Result<Option<Post>, RequestError> {
    let filter = PostFilter {
        post_id: Some(post_id),
        ..PostFilter::default()
    };
    let mut posts = query_posts(pool, viewer_id, filter, 1, 0).await?;
    Ok(posts.pop())
}

pub async fn list_posts_by_author_in_db(
    pool: &SqlitePool,
    viewer_id: Option<i64>,
    author_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, RequestError> {
    let filter = PostFilter {
        author_id: Some(author_id),
        ..PostFilter::default()
    };
    query_posts(pool, viewer_id, filter, limit, offset).await
}

pub async fn search_posts_in_db(
    pool: &SqlitePool,
    viewer_id: Option<i64>,
    pattern: &str,
    limit: i64,
) -> Result<Vec<Post>, RequestError> {
    let filter = PostFilter {
        caption: Some(pattern.to_owned()),
        ..PostFilter::default()
    };
    query_posts(pool, viewer_id, filter, limit, 0).await
}

pub async fn list_posts_by_hashtag_in_db(
    pool: &SqlitePool,
    viewer_id: Option<i64>,
    hashtag: &str,
    limit: i64,
) -> Result<Vec<Post>, RequestError> {
    let filter = PostFilter {
        hashtag: Some(hashtag.to_owned()),
        ..PostFilter::default()
    };
    query_posts(pool, viewer_id, filter, limit, 0).await
}

pub async fn list_saved_posts_in_db(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, RequestError> {
    let filter = PostFilter {
        saved_by: Some(user_id),
        ..PostFilter::default()
    };
    query_posts(pool, Some(user_id), filter, limit, offset).await
}

/// Inserts the post, its images and its hashtag links in one transaction,
/// so a failed image or hashtag write never leaves an orphaned post.
pub async fn create_post_in_db(
    pool: &SqlitePool,
    author_id: i64,
    CreatePostRequest {
        caption,
        location,
        image_urls,
        hashtags,
    }: CreatePostRequest,
) -> Result<Post, RequestError> {
    let mut tx = pool.begin().await?;

    let post_id = sqlx::query_scalar::<Sqlite, i64>(
        r#"
        INSERT INTO posts (author_id, caption, location)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(author_id)
    .bind(&caption)
    .bind(location.as_deref())
    .fetch_one(&mut tx)
    .await?;

    for (index, image_url) in image_urls.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO post_images (post_id, image_url, order_index)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(post_id)
        .bind(image_url.as_str())
        .bind(index as i64)
        .execute(&mut tx)
        .await?;
    }

    for hashtag in &hashtags {
        let hashtag_id = sqlx::query_scalar::<Sqlite, i64>(
            r#"
            INSERT INTO hashtags (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = $1
            RETURNING id
            "#,
        )
        .bind(hashtag.as_str())
        .fetch_one(&mut tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO post_hashtags (post_id, hashtag_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(hashtag_id)
        .execute(&mut tx)
        .await?;
    }

    tx.commit().await?;

    match get_post_in_db(pool, Some(author_id), post_id).await? {
        Some(post) => Ok(post),
        None => Err(RequestError::ServerError),
    }
}

pub async fn update_post_in_db(
    pool: &SqlitePool,
    author_id: i64,
    post_id: i64,
    UpdatePostRequest { caption, location }: UpdatePostRequest,
) -> Result<Post, RequestError> {
    let built = QueryBuilder::new("UPDATE posts SET ", ", ")
        .add_param("caption", caption)
        .add_param("location", location)
        .build();

    if let Some((mut query, params)) = built {
        query.push_str(&format!(
            " WHERE id = ${} AND author_id = ${}",
            params.len() + 1,
            params.len() + 2
        ));
        let mut result = sqlx::query(&query);
        for param in params {
            result = result.bind(param);
        }
        let result = result.bind(post_id).bind(author_id).execute(pool).await?;
        if result.rows_affected() == 0 {
            return Err(RequestError::Forbidden);
        }
    }

    match get_post_in_db(pool, Some(author_id), post_id).await? {
        Some(post) => Ok(post),
        None => Err(RequestError::NotFound("Post not found")),
    }
}

pub async fn delete_post_in_db(
    pool: &SqlitePool,
    author_id: i64,
    post_id: i64,
) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
        .bind(post_id)
        .bind(author_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::Forbidden);
    }
    Ok(())
}

/// Image URLs for a page of posts, keyed by post id, in upload order.
pub async fn fetch_images_for_posts(
    pool: &SqlitePool,
    post_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>, RequestError> {
    let mut images: HashMap<i64, Vec<String>> = HashMap::new();
    if post_ids.is_empty() {
        return Ok(images);
    }
    let query = format!(
        "SELECT post_id, image_url FROM post_images WHERE post_id IN {} ORDER BY post_id, order_index",
        id_list(post_ids)
    );
    let rows = sqlx::query_as::<Sqlite, PostImage>(&query)
        .fetch_all(pool)
        .await?;
    for row in rows {
        images.entry(row.post_id).or_default().push(row.image_url);
    }
    Ok(images)
}

pub async fn fetch_hashtags_for_posts(
    pool: &SqlitePool,
    post_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>, RequestError> {
    let mut hashtags: HashMap<i64, Vec<String>> = HashMap::new();
    if post_ids.is_empty() {
        return Ok(hashtags);
    }
    let query = format!(
        r#"
        SELECT post_hashtags.post_id AS "post_id", hashtags.name AS "name"
        FROM post_hashtags
            JOIN hashtags ON hashtags.id = post_hashtags.hashtag_id
        WHERE post_hashtags.post_id IN {}
        ORDER BY post_hashtags.post_id, hashtags.name
        "#,
        id_list(post_ids)
    );
    let rows = sqlx::query_as::<Sqlite, PostHashtag>(&query)
        .fetch_all(pool)
        .await?;
    for row in rows {
        hashtags.entry(row.post_id).or_default().push(row.name);
    }
    Ok(hashtags)
}
