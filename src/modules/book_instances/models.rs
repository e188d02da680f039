use std::{fmt, str::FromStr};

use catalog_db::DocId;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};

use crate::modules::books::Book;

/// Collection holding book instance documents.
pub const BOOK_INSTANCES_COLLECTION: &str = "bookinstances";

/// Loan status of a physical copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [Self; 4] = [
        Self::Available,
        Self::Maintenance,
        Self::Loaned,
        Self::Reserved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Maintenance => "Maintenance",
            Self::Loaned => "Loaned",
            Self::Reserved => "Reserved",
        }
    }

    /// Whether the copy is out and a due-back date applies.
    pub fn is_on_loan(self) -> bool {
        self != Self::Available
    }
}

impl fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for BookInstanceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A physical copy of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInstance {
    #[serde(rename = "_id")]
    pub id: DocId,
    /// Referenced book
    pub book: DocId,
    /// Publisher and edition details
    pub imprint: String,
    #[serde(default)]
    pub status: BookInstanceStatus,
    #[serde(default)]
    pub due_back: Option<Date>,
}

impl BookInstance {
    /// Builds a new copy with a fresh id.
    pub fn new(
        book: DocId,
        imprint: impl Into<String>,
        status: BookInstanceStatus,
        due_back: Option<Date>,
    ) -> Self {
        Self::with_id(DocId::new(), book, imprint, status, due_back)
    }

    /// Builds a copy under an existing id. Available copies carry no due-back date.
    pub fn with_id(
        id: DocId,
        book: DocId,
        imprint: impl Into<String>,
        status: BookInstanceStatus,
        due_back: Option<Date>,
    ) -> Self {
        Self {
            id,
            book,
            imprint: imprint.into(),
            status,
            due_back: due_back.filter(|_| status.is_on_loan()),
        }
    }

    /// Due-back date as shown to readers, e.g. `Nov 1, 2026`.
    pub fn due_back_formatted(&self) -> String {
        self.due_back.map(format_display_date).unwrap_or_default()
    }
}

fn format_display_date(date: Date) -> String {
    date.format(format_description!(
        "[month repr:short] [day padding:none], [year]"
    ))
    .unwrap_or_else(|_| date.to_string())
}

/// A book instance with its book resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedBookInstance {
    pub instance: BookInstance,
    /// `None` when the referenced book no longer exists.
    pub book: Option<Book>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::Month;

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).unwrap()
    }

    #[test]
    fn status_parses_exact_names_only() {
        assert_eq!(
            "Loaned".parse::<BookInstanceStatus>(),
            Ok(BookInstanceStatus::Loaned)
        );
        assert_eq!(
            "loaned".parse::<BookInstanceStatus>(),
            Err(UnknownStatus("loaned".to_string()))
        );
        assert_eq!(BookInstanceStatus::default(), BookInstanceStatus::Maintenance);
    }

    #[test]
    fn available_copies_drop_due_back() {
        let due = Some(date(2026, Month::November, 1));
        let available = BookInstance::new(DocId::new(), "Ace", BookInstanceStatus::Available, due);
        assert_eq!(available.due_back, None);

        let loaned = BookInstance::new(DocId::new(), "Ace", BookInstanceStatus::Loaned, due);
        assert_eq!(loaned.due_back, due);
    }

    #[test]
    fn due_back_is_formatted_for_display() {
        let instance = BookInstance::new(
            DocId::new(),
            "Ace",
            BookInstanceStatus::Reserved,
            Some(date(2026, Month::November, 1)),
        );
        assert_eq!(instance.due_back_formatted(), "Nov 1, 2026");

        let no_date = BookInstance::new(DocId::new(), "Ace", BookInstanceStatus::Reserved, None);
        assert_eq!(no_date.due_back_formatted(), "");
    }

    #[test]
    fn documents_use_store_field_names() {
        let book = DocId::new();
        let instance = BookInstance::new(
            book,
            "Ace, 1990",
            BookInstanceStatus::Loaned,
            Some(date(2026, Month::January, 5)),
        );

        let document = serde_json::to_value(&instance).unwrap();
        assert_eq!(document["_id"], json!(instance.id.to_string()));
        assert_eq!(document["book"], json!(book.to_string()));
        assert_eq!(document["status"], json!("Loaned"));
        assert_eq!(document["due_back"], json!("2026-01-05"));
    }

    #[test]
    fn missing_status_defaults_to_maintenance() {
        let document = json!({
            "_id": DocId::new().to_string(),
            "book": DocId::new().to_string(),
            "imprint": "Ace",
        });
        let instance: BookInstance = serde_json::from_value(document).unwrap();
        assert_eq!(instance.status, BookInstanceStatus::Maintenance);
        assert_eq!(instance.due_back, None);
    }
}
