//! Form DTOs for book instance submissions and their validation.

use catalog_db::{DbResult, DocId};
use serde::{Deserialize, Serialize};
use time::Date;

use super::models::{BookInstance, BookInstanceStatus};
use crate::{
    modules::books::BookRepository,
    utils::sanitize::{parse_iso8601_date, trim_escape},
};

/// Raw create/update submission. Missing fields arrive as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookInstanceForm {
    pub book: String,
    pub imprint: String,
    pub status: String,
    pub due_back: String,
}

/// Raw delete confirmation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub bookinstanceid: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// `due_back` optional, empty `status` falls back to the default.
    Create,
    /// Every field required.
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Trimmed and escaped copy of a submission, echoed back into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValues {
    pub book: String,
    pub imprint: String,
    pub status: String,
    pub due_back: String,
}

impl FormValues {
    /// Values of a stored instance, for pre-filling the update form.
    pub fn from_instance(instance: &BookInstance) -> Self {
        Self {
            book: instance.book.to_string(),
            imprint: instance.imprint.clone(),
            status: instance.status.as_str().to_string(),
            due_back: instance
                .due_back
                .map(|date| date.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Submission that passed every field check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBookInstance {
    pub book: DocId,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<Date>,
}

impl ValidBookInstance {
    pub fn into_new_instance(self) -> BookInstance {
        BookInstance::new(self.book, self.imprint, self.status, self.due_back)
    }

    pub fn into_instance(self, id: DocId) -> BookInstance {
        BookInstance::with_id(id, self.book, self.imprint, self.status, self.due_back)
    }
}

/// Submission that failed validation, with everything needed to re-render it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub values: FormValues,
    pub errors: Vec<FieldError>,
}

impl BookInstanceForm {
    pub fn sanitize(&self) -> FormValues {
        FormValues {
            book: trim_escape(&self.book),
            imprint: trim_escape(&self.imprint),
            status: trim_escape(&self.status),
            due_back: trim_escape(&self.due_back),
        }
    }

    /// Field checks that need no store access.
    pub fn validate(&self, mode: FormMode) -> Result<ValidBookInstance, Rejected> {
        let values = self.sanitize();
        let mut errors = Vec::new();

        match mode {
            FormMode::Create => {
                require(&mut errors, "book", &values.book, "Book must be specified");
                require(&mut errors, "imprint", &values.imprint, "Imprint must be specified");
            }
            FormMode::Update => {
                require(&mut errors, "book", &values.book, "Book must not be empty.");
                require(&mut errors, "imprint", &values.imprint, "Imprint must not be empty.");
                require(&mut errors, "status", &values.status, "Status must not be empty.");
                require(&mut errors, "due_back", &values.due_back, "Due back must not be empty.");
            }
        }

        let book = if values.book.is_empty() {
            None
        } else {
            let parsed = DocId::parse(&values.book);
            if parsed.is_none() {
                errors.push(FieldError::new("book", "Book not found"));
            }
            parsed
        };

        let status = if values.status.is_empty() {
            Some(BookInstanceStatus::default())
        } else {
            match values.status.parse::<BookInstanceStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.push(FieldError::new("status", "Invalid status"));
                    None
                }
            }
        };

        let due_back = if values.due_back.is_empty() {
            None
        } else {
            let parsed = parse_iso8601_date(self.due_back.trim());
            if parsed.is_none() {
                errors.push(FieldError::new("due_back", "Invalid date"));
            }
            parsed
        };

        match (book, status) {
            (Some(book), Some(status)) if errors.is_empty() => Ok(ValidBookInstance {
                book,
                imprint: values.imprint,
                status,
                due_back,
            }),
            _ => Err(Rejected { values, errors }),
        }
    }

    /// Full validation, including that the selected book exists.
    pub async fn validate_with_books(
        &self,
        mode: FormMode,
        books: &dyn BookRepository,
    ) -> DbResult<Result<ValidBookInstance, Rejected>> {
        let valid = match self.validate(mode) {
            Ok(valid) => valid,
            Err(rejected) => return Ok(Err(rejected)),
        };

        if books.find_by_id(&valid.book).await?.is_none() {
            return Ok(Err(Rejected {
                values: self.sanitize(),
                errors: vec![FieldError::new("book", "Book not found")],
            }));
        }

        Ok(Ok(valid))
    }
}

fn require(errors: &mut Vec<FieldError>, field: &'static str, value: &str, message: &str) {
    if value.is_empty() {
        errors.push(FieldError::new(field, message));
    }
}

impl DeleteForm {
    /// The instance to delete, `Err` when the field is blank.
    pub fn target(&self) -> Result<Option<DocId>, FieldError> {
        let raw = self.bookinstanceid.trim();
        if raw.is_empty() {
            return Err(FieldError::new(
                "bookinstanceid",
                "Book instance id must be specified",
            ));
        }
        Ok(DocId::parse(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn form(book: &str, imprint: &str, status: &str, due_back: &str) -> BookInstanceForm {
        BookInstanceForm {
            book: book.to_string(),
            imprint: imprint.to_string(),
            status: status.to_string(),
            due_back: due_back.to_string(),
        }
    }

    fn fields(rejected: &Rejected) -> Vec<&'static str> {
        rejected.errors.iter().map(|error| error.field).collect()
    }

    #[test]
    fn create_accepts_minimal_submission() {
        let book = DocId::new();
        let valid = form(&book.to_string(), " Ace, 1990 ", "", "")
            .validate(FormMode::Create)
            .unwrap();

        assert_eq!(valid.book, book);
        assert_eq!(valid.imprint, "Ace, 1990");
        assert_eq!(valid.status, BookInstanceStatus::Maintenance);
        assert_eq!(valid.due_back, None);
    }

    #[test]
    fn create_requires_book_and_imprint() {
        let rejected = form("  ", "", "Loaned", "").validate(FormMode::Create).unwrap_err();
        assert_eq!(fields(&rejected), vec!["book", "imprint"]);
        assert_eq!(rejected.errors[0].message, "Book must be specified");
        assert_eq!(rejected.errors[1].message, "Imprint must be specified");
    }

    #[test]
    fn create_rejects_non_iso_dates() {
        let rejected = form(&DocId::new().to_string(), "Ace", "Loaned", "11/01/2026")
            .validate(FormMode::Create)
            .unwrap_err();
        assert_eq!(rejected.errors, vec![FieldError::new("due_back", "Invalid date")]);
        assert_eq!(rejected.values.due_back, "11/01/2026");
    }

    #[test]
    fn create_parses_due_back() {
        let valid = form(&DocId::new().to_string(), "Ace", "Loaned", "2026-11-01")
            .validate(FormMode::Create)
            .unwrap();
        assert_eq!(
            valid.due_back,
            Some(Date::from_calendar_date(2026, Month::November, 1).unwrap())
        );
    }

    #[test]
    fn unknown_status_and_malformed_book_are_rejected() {
        let rejected = form("not-an-id", "Ace", "Lost", "")
            .validate(FormMode::Create)
            .unwrap_err();
        assert_eq!(fields(&rejected), vec!["book", "status"]);
    }

    #[test]
    fn update_requires_every_field() {
        let rejected = form("", "", "", "").validate(FormMode::Update).unwrap_err();
        assert_eq!(fields(&rejected), vec!["book", "imprint", "status", "due_back"]);
        assert_eq!(rejected.errors[3].message, "Due back must not be empty.");
    }

    #[test]
    fn sanitize_escapes_markup_for_echo() {
        let values = form(" x ", "<i>Ace</i>", " Loaned ", "").sanitize();
        assert_eq!(values.book, "x");
        assert_eq!(values.imprint, "&lt;i&gt;Ace&lt;/i&gt;");
        assert_eq!(values.status, "Loaned");
    }

    #[test]
    fn delete_form_target() {
        let id = DocId::new();
        let form = DeleteForm {
            bookinstanceid: format!(" {id} "),
        };
        assert_eq!(form.target(), Ok(Some(id)));

        let garbage = DeleteForm {
            bookinstanceid: "zzz".to_string(),
        };
        assert_eq!(garbage.target(), Ok(None));

        assert!(DeleteForm::default().target().is_err());
    }
}
