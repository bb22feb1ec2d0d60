mod authentication;
mod data_formats;
pub mod db_helpers;
mod errors;
mod handlers;
pub mod models;

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use data_formats::*;
pub use errors::RequestError;
use handlers::*;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::{
    net::{SocketAddr, TcpListener},
    str::FromStr,
    sync::Arc,
};

pub type JsonResponse<T> = (StatusCode, Json<T>);

pub async fn run_app(app: Router, address: SocketAddr) -> Result<()> {
    let db = init_db().await?;
    let app = app.layer(Extension(Arc::new(db)));
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub async fn init_db() -> Result<SqlitePool> {
    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    connect_db(&db_url).await
}

/// Creates the database file if needed, connects with foreign keys
/// enforced (the account-withdrawal cascades depend on them) and runs the
/// migrations.
pub async fn connect_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        println!("Creating database {}", db_url);
        Sqlite::create_database(db_url)
            .await
            .context("Failed to create database")?;
    }
    let options = SqliteConnectOptions::from_str(db_url)
        .context("Invalid database url")?
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(options).await?;
    println!("Running Migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    println!("Migrations completed");
    Ok(pool)
}

pub fn get_random_free_port() -> (u16, SocketAddr) {
    let listener = TcpListener::bind("localhost:0").unwrap();
    match listener.local_addr() {
        Ok(addr) => (addr.port(), addr),
        Err(_) => panic!("Could not get a free port"),
    }
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(check_health))
        .route("/users", post(register_user))
        .route("/users/login", post(login_user))
        .route(
            "/user",
            get(get_current_user).put(update_profile).delete(delete_account),
        )
        .route("/user/password", put(change_password))
        .route("/user/online", put(set_online_status))
        .route("/user/saved", get(list_saved_posts))
        .route("/user/blocks", get(list_blocked_users))
        .route("/profiles/:username", get(get_profile))
        .route("/profiles/:username/follow", post(toggle_follow))
        .route("/profiles/:username/block", post(toggle_block))
        .route("/profiles/:username/followers", get(list_followers))
        .route("/profiles/:username/following", get(list_following))
        .route("/profiles/:username/posts", get(list_profile_posts))
        .route("/posts", get(list_feed).post(create_post))
        .route("/posts/explore", get(list_explore_posts))
        .route(
            "/posts/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/posts/:id/like", post(toggle_post_like))
        .route("/posts/:id/save", post(toggle_save_post))
        .route("/posts/:id/likes", get(list_post_likers))
        .route(
            "/posts/:id/comments",
            get(list_post_comments).post(create_post_comment),
        )
        .route("/comments/:id", delete(delete_comment))
        .route("/comments/:id/like", post(toggle_comment_like))
        .route(
            "/conversations",
            get(list_conversations).post(start_conversation),
        )
        .route(
            "/conversations/:id/messages",
            get(list_conversation_messages).post(send_conversation_message),
        )
        .route("/conversations/:id/read", put(mark_conversation_read))
        .route("/notifications", get(list_notifications))
        .route("/notifications/unread_count", get(unread_notification_count))
        .route("/notifications/read_all", put(mark_all_notifications_read))
        .route(
            "/notifications/settings",
            get(get_notification_settings).put(update_notification_settings),
        )
        .route("/notifications/:id/read", put(mark_notification_read))
        .route("/search", get(search_all))
        .route("/search/users", get(search_users))
        .route("/search/posts", get(search_posts))
        .route("/search/hashtags", get(search_hashtags))
        .route("/hashtags/trending", get(trending_hashtags))
        .route("/hashtags/:name/posts", get(list_hashtag_posts))
        .fallback(not_found)
}
