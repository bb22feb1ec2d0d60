use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::Comment;

const COMMENT_QUERY: &str = r#"
            SELECT comments.id          AS "id",
                   comments.post_id     AS "post_id",
                   comments.author_id   AS "author_id",
                   comments.content     AS "content",
                   comments.parent_id   AS "parent_id",
                   comments.created_at  AS "created_at",
                   users.username       AS "author_username",
                   users.display_name   AS "author_display_name",
                   users.profile_image  AS "author_image"
            FROM   comments
                JOIN users
                    ON comments.author_id = users.id
     "#;

/// Comments for a post, oldest first: the top-level thread and the reply
/// rows separately. Nesting them back together is the caller's job.
pub async fn list_comments_in_db(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<(Vec<Comment>, Vec<Comment>), RequestError> {
    let top_level_query = format!(
        "{} WHERE comments.post_id = $1 AND comments.parent_id IS NULL ORDER BY comments.created_at ASC, comments.id ASC",
        COMMENT_QUERY
    );
    let top_level = sqlx::query_as::<Sqlite, Comment>(&top_level_query)
        .bind(post_id)
        .fetch_all(pool)
        .await?;

    let replies_query = format!(
        "{} WHERE comments.post_id = $1 AND comments.parent_id IS NOT NULL ORDER BY comments.created_at ASC, comments.id ASC",
        COMMENT_QUERY
    );
    let replies = sqlx::query_as::<Sqlite, Comment>(&replies_query)
        .bind(post_id)
        .fetch_all(pool)
        .await?;

    Ok((top_level, replies))
}

/// Inserts a comment and returns it joined with its author, plus the
/// post author's id for the notification fan-out. Replies may only
/// target a top-level comment on the same post.
pub async fn create_comment_in_db(
    pool: &SqlitePool,
    author_id: i64,
    post_id: i64,
    content: &str,
    parent_id: Option<i64>,
) -> Result<(Comment, i64), RequestError> {
    let post_author =
        sqlx::query_scalar::<Sqlite, i64>("SELECT author_id FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(pool)
            .await?;
    let post_author = match post_author {
        Some(post_author) => post_author,
        None => return Err(RequestError::NotFound("Post not found")),
    };

    if let Some(parent_id) = parent_id {
        let parent = sqlx::query_as::<Sqlite, (i64, Option<i64>)>(
            "SELECT post_id, parent_id FROM comments WHERE id = $1",
        )
        .bind(parent_id)
        .fetch_optional(pool)
        .await?;
        match parent {
            None => return Err(RequestError::RunTimeError("Parent comment not found")),
            Some((parent_post_id, _)) if parent_post_id != post_id => {
                return Err(RequestError::RunTimeError(
                    "Parent comment belongs to a different post",
                ))
            }
            Some((_, Some(_))) => {
                return Err(RequestError::RunTimeError(
                    "Replies can only be nested one level",
                ))
            }
            Some(_) => {}
        }
    }

    let comment_id = sqlx::query_scalar::<Sqlite, i64>(
        r#"
        INSERT INTO comments (post_id, author_id, content, parent_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(content)
    .bind(parent_id)
    .fetch_one(pool)
    .await?;

    let query = format!("{} WHERE comments.id = $1", COMMENT_QUERY);
    let comment = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(comment_id)
        .fetch_one(pool)
        .await?;

    Ok((comment, post_author))
}

pub async fn delete_comment_in_db(
    pool: &SqlitePool,
    author_id: i64,
    comment_id: i64,
) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND author_id = $2")
        .bind(comment_id)
        .bind(author_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::Forbidden);
    }
    Ok(())
}
