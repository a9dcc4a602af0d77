use serde::Serialize;
use shelfline_store::{Book, ReadingStatus};
use time::OffsetDateTime;

const TOP_AUTHORS_LIMIT: usize = 10;

/// Books-per-status breakdown; all three keys are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    #[serde(rename = "to-read")]
    pub to_read: usize,
    pub reading: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    pub author: String,
    pub count: usize,
}

/// Aggregate statistics over a snapshot of the book collection.
///
/// Page sums are reported as absent rather than zero when no book
/// contributes pages, so "no page data" stays distinguishable from
/// "zero pages".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_books: usize,
    pub by_status: StatusCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages_completed: Option<u64>,
    pub completion_rate: f64,
    pub currently_reading: usize,
    pub top_authors: Vec<AuthorCount>,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub first_added_at: Option<OffsetDateTime>,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_added_at: Option<OffsetDateTime>,
}

/// Compute summary statistics over the full (unfiltered) collection.
///
/// Pure and deterministic for a given input sequence: author ranking uses a
/// stable sort, so ties keep first-encountered order.
pub fn compute_summary(books: &[Book]) -> SummaryStats {
    let mut by_status = StatusCounts::default();
    let mut total_pages: u64 = 0;
    let mut total_pages_completed: u64 = 0;
    let mut authors: Vec<(String, usize)> = Vec::new();
    let mut first_added_at: Option<OffsetDateTime> = None;
    let mut last_added_at: Option<OffsetDateTime> = None;

    for book in books {
        match book.status {
            ReadingStatus::ToRead => by_status.to_read += 1,
            ReadingStatus::Reading => by_status.reading += 1,
            ReadingStatus::Completed => by_status.completed += 1,
        }

        if let Some(pages) = book.pages {
            total_pages += u64::from(pages);
            if book.status == ReadingStatus::Completed {
                total_pages_completed += u64::from(pages);
            }
        }

        match authors.iter_mut().find(|(author, _)| author == &book.author) {
            Some((_, count)) => *count += 1,
            None => authors.push((book.author.clone(), 1)),
        }

        if first_added_at.map_or(true, |t| book.added_at < t) {
            first_added_at = Some(book.added_at);
        }
        if last_added_at.map_or(true, |t| book.added_at > t) {
            last_added_at = Some(book.added_at);
        }
    }

    let total_books = books.len();
    let completion_rate = if total_books == 0 {
        0.0
    } else {
        by_status.completed as f64 / total_books as f64
    };
    let currently_reading = by_status.reading;

    authors.sort_by(|a, b| b.1.cmp(&a.1));
    authors.truncate(TOP_AUTHORS_LIMIT);
    let top_authors = authors
        .into_iter()
        .map(|(author, count)| AuthorCount { author, count })
        .collect();

    SummaryStats {
        total_books,
        by_status,
        total_pages: (total_pages > 0).then_some(total_pages),
        total_pages_completed: (total_pages_completed > 0).then_some(total_pages_completed),
        completion_rate,
        currently_reading,
        top_authors,
        first_added_at,
        last_added_at,
    }
}
