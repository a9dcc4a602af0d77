use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Where a book sits in the reading lifecycle.
///
/// The status drives the timestamp invariants on [`Book`]: `to-read` carries
/// no timestamps, `reading` has `started_at`, `completed` has both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadingStatus {
    #[serde(rename = "to-read")]
    ToRead,
    #[serde(rename = "reading")]
    Reading,
    #[serde(rename = "completed")]
    Completed,
}

impl ReadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToRead => "to-read",
            Self::Reading => "reading",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, thiserror::Error)]
#[error("invalid reading status: {0}")]
pub struct InvalidStatus(pub String);

impl std::str::FromStr for ReadingStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to-read" => Ok(Self::ToRead),
            "reading" => Ok(Self::Reading),
            "completed" => Ok(Self::Completed),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// A single tracked reading-list entry.
///
/// Serialized with camelCase field names; this is both the wire format and
/// the persisted file format. `added_at` is set once at creation and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    pub status: ReadingStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub started_at: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Partial update applied to a stored [`Book`].
///
/// `None` at the outer level means "leave the field unchanged". Clearable
/// fields are doubly optional: `Some(None)` clears the stored value. `id` and
/// `added_at` are not part of the patch and can never change.
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub pages: Option<Option<u32>>,
    pub notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub status: Option<ReadingStatus>,
    pub started_at: Option<Option<OffsetDateTime>>,
    pub completed_at: Option<Option<OffsetDateTime>>,
}

impl Book {
    /// Return a copy of this book with the present fields of `patch` applied.
    pub fn merged(&self, patch: &BookPatch) -> Book {
        let mut book = self.clone();
        if let Some(title) = &patch.title {
            book.title = title.clone();
        }
        if let Some(author) = &patch.author {
            book.author = author.clone();
        }
        if let Some(pages) = patch.pages {
            book.pages = pages;
        }
        if let Some(notes) = &patch.notes {
            book.notes = notes.clone();
        }
        if let Some(tags) = &patch.tags {
            book.tags = tags.clone();
        }
        if let Some(status) = patch.status {
            book.status = status;
        }
        if let Some(started_at) = patch.started_at {
            book.started_at = started_at;
        }
        if let Some(completed_at) = patch.completed_at {
            book.completed_at = completed_at;
        }
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_book() -> Book {
        Book {
            id: "b-1".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            pages: Some(412),
            status: ReadingStatus::Reading,
            added_at: datetime!(2024-03-01 12:00:00 UTC),
            started_at: Some(datetime!(2024-03-02 08:00:00 UTC)),
            completed_at: None,
            notes: None,
            tags: vec!["sci-fi".to_string()],
        }
    }

    #[test]
    fn merged_applies_only_present_fields() {
        let book = sample_book();
        let patch = BookPatch {
            title: Some("Dune Messiah".to_string()),
            ..BookPatch::default()
        };

        let merged = book.merged(&patch);
        assert_eq!(merged.title, "Dune Messiah");
        assert_eq!(merged.author, book.author);
        assert_eq!(merged.added_at, book.added_at);
        assert_eq!(merged.started_at, book.started_at);
    }

    #[test]
    fn merged_clears_doubly_optional_fields() {
        let book = sample_book();
        let patch = BookPatch {
            started_at: Some(None),
            pages: Some(None),
            ..BookPatch::default()
        };

        let merged = book.merged(&patch);
        assert_eq!(merged.started_at, None);
        assert_eq!(merged.pages, None);
    }

    #[test]
    fn book_serializes_with_camel_case_names() {
        let book = sample_book();
        let json = serde_json::to_value(&book).unwrap();

        assert_eq!(json["status"], "reading");
        assert!(json.get("addedAt").is_some());
        assert!(json.get("startedAt").is_some());
        // Absent optionals are omitted entirely.
        assert!(json.get("completedAt").is_none());
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ReadingStatus::ToRead,
            ReadingStatus::Reading,
            ReadingStatus::Completed,
        ] {
            let parsed: ReadingStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("done".parse::<ReadingStatus>().is_err());
    }
}
