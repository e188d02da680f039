//! View models and templates for book instance pages.
//!
//! Stored imprints and echoed form values are escaped when submitted, so the
//! templates emit them with triple-stash; everything else goes through the
//! registry's default escaping.

use std::{collections::BTreeMap, sync::Arc};

use catalog_db::{DbResult, DocId};
use catalog_http::views::Views;
use serde::Serialize;

use super::{
    form::{FieldError, FormValues},
    models::{BookInstanceStatus, PopulatedBookInstance},
};
use crate::modules::books::{BookRepository, BookTitle};

pub const LIST_TEMPLATE: &str = "bookinstance_list";
pub const DETAIL_TEMPLATE: &str = "bookinstance_detail";
pub const FORM_TEMPLATE: &str = "bookinstance_form";
pub const DELETE_TEMPLATE: &str = "bookinstance_delete";

const MISSING_BOOK_TITLE: &str = "(missing book)";

/// Compile the module's templates into a view registry.
pub fn build_views() -> anyhow::Result<Views> {
    Ok(Views::builder()
        .partial("layout", include_str!("../../../templates/layout.hbs"))?
        .template(
            LIST_TEMPLATE,
            include_str!("../../../templates/bookinstance_list.hbs"),
        )?
        .template(
            DETAIL_TEMPLATE,
            include_str!("../../../templates/bookinstance_detail.hbs"),
        )?
        .template(
            FORM_TEMPLATE,
            include_str!("../../../templates/bookinstance_form.hbs"),
        )?
        .template(
            DELETE_TEMPLATE,
            include_str!("../../../templates/bookinstance_delete.hbs"),
        )?
        .build())
}

/// URL builder for the module's pages under the configured base path.
#[derive(Debug, Clone)]
pub struct CatalogPaths {
    base: Arc<str>,
}

impl CatalogPaths {
    pub fn new(base_path: &str) -> Self {
        Self {
            base: Arc::from(base_path.trim_end_matches('/')),
        }
    }

    pub fn list(&self) -> String {
        format!("{}/bookinstances", self.base)
    }

    pub fn create(&self) -> String {
        format!("{}/bookinstance/create", self.base)
    }

    pub fn detail(&self, id: &DocId) -> String {
        format!("{}/bookinstance/{}", self.base, id)
    }

    pub fn update(&self, id: &DocId) -> String {
        format!("{}/bookinstance/{}/update", self.base, id)
    }

    pub fn delete(&self, id: &DocId) -> String {
        format!("{}/bookinstance/{}/delete", self.base, id)
    }
}

#[derive(Debug, Serialize)]
pub struct Nav {
    pub instances: String,
    pub create: String,
}

/// Common page frame rendered by the layout partial.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub title: String,
    pub nav: Nav,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Page<T> {
    pub fn new(title: impl Into<String>, paths: &CatalogPaths, body: T) -> Self {
        Self {
            title: title.into(),
            nav: Nav {
                instances: paths.list(),
                create: paths.create(),
            },
            body,
        }
    }
}

/// One book instance as shown in lists, detail and delete pages.
#[derive(Debug, Serialize)]
pub struct InstanceRow {
    pub id: String,
    pub url: String,
    pub update_url: String,
    pub delete_url: String,
    pub book_title: String,
    pub imprint: String,
    pub status: &'static str,
    pub status_class: &'static str,
    pub is_available: bool,
    pub due_back_formatted: String,
}

impl InstanceRow {
    pub fn new(populated: &PopulatedBookInstance, paths: &CatalogPaths) -> Self {
        let instance = &populated.instance;
        Self {
            id: instance.id.to_string(),
            url: paths.detail(&instance.id),
            update_url: paths.update(&instance.id),
            delete_url: paths.delete(&instance.id),
            book_title: populated
                .book
                .as_ref()
                .map_or_else(|| MISSING_BOOK_TITLE.to_string(), |book| book.title.clone()),
            imprint: instance.imprint.clone(),
            status: instance.status.as_str(),
            status_class: status_class(instance.status),
            is_available: !instance.status.is_on_loan(),
            due_back_formatted: instance.due_back_formatted(),
        }
    }
}

fn status_class(status: BookInstanceStatus) -> &'static str {
    match status {
        BookInstanceStatus::Available => "text-success",
        BookInstanceStatus::Maintenance => "text-danger",
        BookInstanceStatus::Loaned | BookInstanceStatus::Reserved => "text-warning",
    }
}

#[derive(Debug, Serialize)]
pub struct ListView {
    pub instances: Vec<InstanceRow>,
}

#[derive(Debug, Serialize)]
pub struct DetailView {
    pub instance: InstanceRow,
}

#[derive(Debug, Serialize)]
pub struct DeleteView {
    pub instance: InstanceRow,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct BookOption {
    pub id: String,
    pub title: String,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusOption {
    pub value: &'static str,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct FormView {
    pub action: String,
    pub book_list: Vec<BookOption>,
    pub statuses: Vec<StatusOption>,
    pub values: FormValues,
    pub errors: Vec<FieldError>,
    /// Messages keyed by field name, rendered next to each input.
    pub field_errors: BTreeMap<&'static str, Vec<String>>,
}

/// Everything the create/update form needs besides the book list.
#[derive(Debug)]
pub struct FormContext {
    pub title: &'static str,
    pub action: String,
    pub values: FormValues,
    pub errors: Vec<FieldError>,
}

impl FormContext {
    pub fn new(title: &'static str, action: String) -> Self {
        Self {
            title,
            action,
            values: FormValues::default(),
            errors: Vec::new(),
        }
    }

    pub fn values(mut self, values: FormValues) -> Self {
        self.values = values;
        self
    }

    pub fn errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    /// Fetch the book selection list and assemble the page.
    pub async fn load(
        self,
        books: &dyn BookRepository,
        paths: &CatalogPaths,
    ) -> DbResult<Page<FormView>> {
        let titles = books.find_all_titles().await?;
        Ok(self.with_books(titles, paths))
    }

    /// Assemble the page from an already fetched book list.
    pub fn with_books(self, titles: Vec<BookTitle>, paths: &CatalogPaths) -> Page<FormView> {
        let book_list = titles
            .into_iter()
            .map(|book| {
                let id = book.id.to_string();
                BookOption {
                    selected: id == self.values.book,
                    id,
                    title: book.title,
                }
            })
            .collect();

        let statuses = BookInstanceStatus::ALL
            .into_iter()
            .map(|status| StatusOption {
                value: status.as_str(),
                selected: status.as_str() == self.values.status,
            })
            .collect();

        let mut field_errors: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for error in &self.errors {
            field_errors
                .entry(error.field)
                .or_default()
                .push(error.message.clone());
        }

        Page::new(
            self.title,
            paths,
            FormView {
                action: self.action,
                book_list,
                statuses,
                values: self.values,
                errors: self.errors,
                field_errors,
            },
        )
    }
}
