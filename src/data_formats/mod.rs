mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
pub struct FeedQueryParams {
    #[serde(default = "get_default_feed_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct MessageQueryParams {
    #[serde(default = "get_default_message_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct NotificationQueryParams {
    #[serde(default = "get_default_message_limit")]
    pub limit: u32,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct SearchQueryParams {
    pub q: String,
    #[serde(default = "get_default_search_limit")]
    pub limit: u32,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct BrowseQueryParams {
    #[serde(default = "get_default_browse_limit")]
    pub limit: u32,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct TrendingQueryParams {
    #[serde(default = "get_default_trending_limit")]
    pub limit: u32,
}

fn get_default_feed_limit() -> u32 {
    10
}

fn get_default_message_limit() -> u32 {
    50
}

fn get_default_search_limit() -> u32 {
    20
}

fn get_default_browse_limit() -> u32 {
    30
}

fn get_default_trending_limit() -> u32 {
    10
}
