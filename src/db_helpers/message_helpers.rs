use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::{ConversationEntry, Message};

const CONVERSATION_QUERY: &str = r#"
            SELECT conversations.id         AS "id",
                   conversations.updated_at AS "updated_at",
                   users.id                 AS "other_id",
                   users.username           AS "other_username",
                   users.display_name       AS "other_display_name",
                   users.profile_image      AS "other_image",
                   users.is_online          AS "other_is_online",
                   (SELECT content
                    FROM   messages
                    WHERE  messages.conversation_id = conversations.id
                    ORDER  BY messages.created_at DESC, messages.id DESC
                    LIMIT  1) AS "last_content",
                   (SELECT created_at
                    FROM   messages
                    WHERE  messages.conversation_id = conversations.id
                    ORDER  BY messages.created_at DESC, messages.id DESC
                    LIMIT  1) AS "last_sent_at",
                   (SELECT Count(*)
                    FROM   messages
                    WHERE  messages.conversation_id = conversations.id
                       AND messages.sender_id != $1
                       AND messages.is_read = FALSE) AS "unread_count"
            FROM   conversations
                JOIN conversation_participants mine
                    ON mine.conversation_id = conversations.id
                       AND mine.user_id = $1
                JOIN conversation_participants theirs
                    ON theirs.conversation_id = conversations.id
                       AND theirs.user_id != $1
                JOIN users
                    ON users.id = theirs.user_id
            ORDER  BY conversations.updated_at DESC, conversations.id DESC
     "#;

const MESSAGE_QUERY: &str = r#"
            SELECT messages.id              AS "id",
                   messages.conversation_id AS "conversation_id",
                   messages.sender_id       AS "sender_id",
                   messages.content         AS "content",
                   messages.image_url       AS "image_url",
                   messages.is_read         AS "is_read",
                   messages.created_at      AS "created_at",
                   users.username           AS "sender_username",
                   users.display_name       AS "sender_display_name",
                   users.profile_image      AS "sender_image"
            FROM   messages
                JOIN users
                    ON messages.sender_id = users.id
     "#;

/// The two-participant pair is looked up relationally, so argument order
/// never matters; when nothing matches, the conversation and both
/// participant rows land in one transaction.
pub async fn find_or_create_conversation_in_db(
    pool: &SqlitePool,
    user_id: i64,
    other_user_id: i64,
) -> Result<(i64, bool), RequestError> {
    if user_id == other_user_id {
        return Err(RequestError::RunTimeError(
            "Cannot start a conversation with yourself",
        ));
    }

    let existing = sqlx::query_scalar::<Sqlite, i64>(
        r#"
        SELECT mine.conversation_id
        FROM conversation_participants mine
            JOIN conversation_participants theirs
                ON mine.conversation_id = theirs.conversation_id
        WHERE mine.user_id = $1 AND theirs.user_id = $2
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(other_user_id)
    .fetch_optional(pool)
    .await?;

    if let Some(conversation_id) = existing {
        return Ok((conversation_id, false));
    }

    let mut tx = pool.begin().await?;
    let conversation_id =
        sqlx::query_scalar::<Sqlite, i64>("INSERT INTO conversations DEFAULT VALUES RETURNING id")
            .fetch_one(&mut tx)
            .await?;
    sqlx::query(
        r#"
        INSERT INTO conversation_participants (conversation_id, user_id)
        VALUES ($1, $2), ($1, $3)
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .bind(other_user_id)
    .execute(&mut tx)
    .await?;
    tx.commit().await?;

    Ok((conversation_id, true))
}

pub async fn list_conversations_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<ConversationEntry>, RequestError> {
    let conversations = sqlx::query_as::<Sqlite, ConversationEntry>(CONVERSATION_QUERY)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(conversations)
}

async fn ensure_participant(
    pool: &SqlitePool,
    conversation_id: i64,
    user_id: i64,
) -> Result<(), RequestError> {
    let is_participant = sqlx::query_scalar::<Sqlite, bool>(
        r#"
        SELECT EXISTS (SELECT 1
                       FROM conversation_participants
                       WHERE conversation_id = $1 AND user_id = $2)
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    if !is_participant {
        return Err(RequestError::Forbidden);
    }
    Ok(())
}

/// A page of messages, newest first in storage order, returned oldest
/// first the way a chat view renders them.
pub async fn list_messages_in_db(
    pool: &SqlitePool,
    user_id: i64,
    conversation_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<Message>, RequestError> {
    ensure_participant(pool, conversation_id, user_id).await?;

    let query = format!(
        "{} WHERE messages.conversation_id = $1 ORDER BY messages.created_at DESC, messages.id DESC LIMIT $2 OFFSET $3",
        MESSAGE_QUERY
    );
    let mut messages = sqlx::query_as::<Sqlite, Message>(&query)
        .bind(conversation_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    messages.reverse();
    Ok(messages)
}

/// Appends the message and bumps the conversation's ordering timestamp
/// in one transaction.
pub async fn append_message_in_db(
    pool: &SqlitePool,
    sender_id: i64,
    conversation_id: i64,
    content: &str,
    image_url: Option<&str>,
) -> Result<Message, RequestError> {
    ensure_participant(pool, conversation_id, sender_id).await?;

    let mut tx = pool.begin().await?;
    let message_id = sqlx::query_scalar::<Sqlite, i64>(
        r#"
        INSERT INTO messages (conversation_id, sender_id, content, image_url)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(conversation_id)
    .bind(sender_id)
    .bind(content)
    .bind(image_url)
    .fetch_one(&mut tx)
    .await?;

    sqlx::query("UPDATE conversations SET updated_at = CURRENT_TIMESTAMP WHERE id = $1")
        .bind(conversation_id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;

    let query = format!("{} WHERE messages.id = $1", MESSAGE_QUERY);
    let message = sqlx::query_as::<Sqlite, Message>(&query)
        .bind(message_id)
        .fetch_one(pool)
        .await?;
    Ok(message)
}

/// Marks everything the other side sent as read and stamps the reader's
/// participant row, in one transaction.
pub async fn mark_conversation_read_in_db(
    pool: &SqlitePool,
    user_id: i64,
    conversation_id: i64,
) -> Result<(), RequestError> {
    ensure_participant(pool, conversation_id, user_id).await?;

    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        UPDATE messages
        SET is_read = TRUE
        WHERE conversation_id = $1 AND sender_id != $2 AND is_read = FALSE
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .execute(&mut tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE conversation_participants
        SET last_read_at = CURRENT_TIMESTAMP
        WHERE conversation_id = $1 AND user_id = $2
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .execute(&mut tx)
    .await?;
    tx.commit().await?;

    Ok(())
}
