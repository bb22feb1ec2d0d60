use std::future::Future;
use std::time::Duration;

use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::User;

mod comment_helpers;
mod interaction_helpers;
mod message_helpers;
mod notification_helpers;
mod post_helpers;
mod profile_helpers;
mod search_helpers;
mod user_helpers;

pub use comment_helpers::*;
pub use interaction_helpers::*;
pub use message_helpers::*;
pub use notification_helpers::*;
pub use post_helpers::*;
pub use profile_helpers::*;
pub use search_helpers::*;
pub use user_helpers::*;

const USER_COLUMNS: &str =
    "id, username, password, display_name, profile_image, is_online, last_active_at, created_at";

// Qualified so the fragment survives joins against tables with their own
// id columns.
pub(crate) const USER_SUMMARY_COLUMNS: &str = "users.id AS \"id\", users.username AS \"username\", \
     users.display_name AS \"display_name\", users.profile_image AS \"profile_image\"";

const TRANSIENT_RETRIES: u32 = 3;

/// Builds `SET a = $1, b = $2` fragments for partial updates, skipping
/// fields the request left out.
struct QueryBuilder {
    query: String,
    params: Vec<String>,
    seperator: &'static str,
}

impl QueryBuilder {
    fn new(initial: &str, seperator: &'static str) -> Self {
        Self {
            query: initial.to_owned(),
            params: Vec::new(),
            seperator,
        }
    }

    fn add_param(mut self, column: &str, param: Option<String>) -> Self {
        if let Some(value) = param {
            if !self.params.is_empty() {
                self.query.push_str(self.seperator);
            }
            self.query
                .push_str(&format!("{} = ${}", column, self.params.len() + 1));
            self.params.push(value);
        }
        self
    }

    fn build(self) -> Option<(String, Vec<String>)> {
        if self.params.is_empty() {
            None
        } else {
            Some((self.query, self.params))
        }
    }
}

/// Renders ids as a `(1,2,3)` fragment for `IN` clauses. Callers skip the
/// query entirely when the slice is empty.
fn id_list(ids: &[i64]) -> String {
    let mut out = String::from("(");
    for (index, id) in ids.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&id.to_string());
    }
    out.push(')');
    out
}

/// Retries an operation a few times when the failure is a busy database
/// or a starved pool. Everything else propagates on the first attempt.
pub async fn with_transient_retry<T, F, Fut>(mut operation: F) -> Result<T, RequestError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RequestError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Err(error) if error.is_transient() && attempt < TRANSIENT_RETRIES => {
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(50 * u64::from(attempt))).await;
            }
            result => return result,
        }
    }
}

// ----------------- Helper Functions -----------------

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, RequestError> {
    let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, RequestError> {
    let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

/// The liveness probe's single read.
pub async fn read_health_check_in_db(pool: &SqlitePool) -> Result<i64, RequestError> {
    let count = sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM health_check")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_builder_skips_missing_fields() {
        let built = QueryBuilder::new("UPDATE posts SET ", ", ")
            .add_param("caption", Some("hello".to_owned()))
            .add_param("location", None)
            .build();
        let (query, params) = built.unwrap();
        assert_eq!(query, "UPDATE posts SET caption = $1");
        assert_eq!(params, vec!["hello".to_owned()]);
    }

    #[test]
    fn query_builder_with_no_fields_builds_nothing() {
        assert!(QueryBuilder::new("UPDATE posts SET ", ", ")
            .add_param("caption", None)
            .build()
            .is_none());
    }

    #[test]
    fn id_list_renders_in_clause() {
        assert_eq!(id_list(&[1, 2, 3]), "(1,2,3)");
        assert_eq!(id_list(&[7]), "(7)");
    }
}
