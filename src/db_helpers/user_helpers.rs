use sqlx::{Sqlite, SqlitePool};

use crate::{
    data_formats::{RegisterRequest, UpdateProfileRequest},
    errors::RequestError,
    models::User,
};

use super::{get_user_by_id, QueryBuilder};

/// Inserts a new account. The password must already be hashed by the
/// caller; the username's uniqueness is the schema's job and surfaces
/// here as a conflict.
pub async fn insert_user(pool: &SqlitePool, user: &RegisterRequest) -> Result<User, RequestError> {
    let result = sqlx::query_as::<Sqlite, User>(
        r#"
        INSERT INTO users (username, password, display_name)
        VALUES ($1, $2, $3)
        RETURNING id, username, password, display_name, profile_image, is_online, last_active_at, created_at
        "#,
    )
    .bind(&user.username)
    .bind(&user.password)
    .bind(&user.display_name)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_error) = &e {
            if db_error.message().contains("UNIQUE constraint failed") {
                return RequestError::Conflict("Username already exists");
            }
        }
        RequestError::DatabaseError(e)
    })?;
    Ok(result)
}

pub async fn update_profile_in_db(
    pool: &SqlitePool,
    id: i64,
    UpdateProfileRequest {
        display_name,
        profile_image,
    }: UpdateProfileRequest,
) -> Result<User, RequestError> {
    let built = QueryBuilder::new("UPDATE users SET ", ", ")
        .add_param("display_name", display_name)
        .add_param("profile_image", profile_image)
        .build();

    if let Some((mut query, params)) = built {
        query.push_str(&format!(" WHERE id = ${}", params.len() + 1));
        let mut result = sqlx::query(&query);
        for param in params {
            result = result.bind(param);
        }
        result.bind(id).execute(pool).await?;
    }

    match get_user_by_id(pool, id).await? {
        Some(user) => Ok(user),
        None => Err(RequestError::NotFound("User not found")),
    }
}

/// Stores a new (already hashed) password. Verifying the current one is
/// the caller's responsibility.
pub async fn change_password_in_db(
    pool: &SqlitePool,
    id: i64,
    hashed_password: &str,
) -> Result<(), RequestError> {
    let result = sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
        .bind(hashed_password)
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("User not found"));
    }
    Ok(())
}

/// Account withdrawal. The schema cascades the deletion into posts,
/// interactions, conversations and notifications.
pub async fn delete_account_in_db(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("User not found"));
    }
    Ok(())
}

pub async fn set_online_status_in_db(
    pool: &SqlitePool,
    id: i64,
    is_online: bool,
) -> Result<(), RequestError> {
    sqlx::query("UPDATE users SET is_online = $1, last_active_at = CURRENT_TIMESTAMP WHERE id = $2")
        .bind(is_online)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
