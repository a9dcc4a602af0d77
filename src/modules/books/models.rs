use serde::Deserialize;
use shelfline_store::ReadingStatus;
use time::OffsetDateTime;

/// Payload for creating a new book.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update payload; absent fields are left unchanged.
///
/// When `status` is present the service normalizes `started_at` and
/// `completed_at`, overriding whatever the caller supplied for them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<ReadingStatus>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

/// Body for the set-status convenience endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SetStatus {
    pub status: ReadingStatus,
}
