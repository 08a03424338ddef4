//! Book collection slice, stored normalized as ordered ids plus an entity map.

use crate::core::{create_selector, Action, Memoized, ReducerError, Slice, SliceSelector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// Storage key for the persisted book collection.
pub const BOOKS_KEY: &str = "EXAMPLES.BOOKS";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
}

impl Book {
    /// Create a book with a freshly generated id.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            author: author.into(),
            description: description.into(),
        }
    }
}

/// Partial update applied by `UpdateOne`. The id itself cannot change, and
/// a wire payload that tries to set it does not parse.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
}

crate::action_enum! {
    pub enum BooksAction {
        /// Inserts the book, or replaces it in place when the id exists.
        AddOne { book: Book } = "[Books] Add One",
        UpdateOne { id: String, changes: BookChanges } = "[Books] Update One",
        DeleteOne { id: String } = "[Books] Delete One",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooksState {
    pub ids: Vec<String>,
    pub entities: BTreeMap<String, Book>,
}

impl BooksState {
    pub fn from_books(books: impl IntoIterator<Item = Book>) -> Self {
        let mut state = BooksState::default();
        for book in books {
            if !state.entities.contains_key(&book.id) {
                state.ids.push(book.id.clone());
            }
            state.entities.insert(book.id.clone(), book);
        }
        state
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.entities.get(id)
    }
}

impl Slice for BooksState {
    const NAME: &'static str = "books";
    type Action = BooksAction;

    fn project(action: &Action) -> Option<&BooksAction> {
        match action {
            Action::Books(action) => Some(action),
            _ => None,
        }
    }

    fn reduce(state: &Arc<Self>, action: &BooksAction) -> Result<Arc<Self>, ReducerError> {
        let next = match action {
            BooksAction::AddOne { book } => {
                if book.id.trim().is_empty() {
                    return Err(ReducerError::MalformedAction {
                        tag: action.tag(),
                        reason: "book id must not be empty".to_string(),
                    });
                }
                let mut next = BooksState::clone(state);
                if !next.entities.contains_key(&book.id) {
                    next.ids.push(book.id.clone());
                }
                next.entities.insert(book.id.clone(), book.clone());
                next
            }
            BooksAction::UpdateOne { id, changes } => {
                let Some(current) = state.entities.get(id) else {
                    return Ok(Arc::clone(state));
                };
                let updated = Book {
                    id: current.id.clone(),
                    title: changes.title.clone().unwrap_or_else(|| current.title.clone()),
                    author: changes.author.clone().unwrap_or_else(|| current.author.clone()),
                    description: changes
                        .description
                        .clone()
                        .unwrap_or_else(|| current.description.clone()),
                };
                let mut next = BooksState::clone(state);
                next.entities.insert(id.clone(), updated);
                next
            }
            BooksAction::DeleteOne { id } => {
                if !state.entities.contains_key(id) {
                    return Ok(Arc::clone(state));
                }
                let mut next = BooksState::clone(state);
                next.entities.remove(id);
                next.ids.retain(|existing| existing != id);
                next
            }
        };
        Ok(Arc::new(next))
    }
}

pub fn select_books_state() -> SliceSelector<BooksState> {
    SliceSelector::new(BooksState::NAME, |state| &state.books)
}

/// The collection denormalized into a list, in id order.
pub fn select_books() -> Memoized<SliceSelector<BooksState>, Vec<Book>> {
    create_selector(select_books_state(), |books: &BooksState| {
        books
            .ids
            .iter()
            .filter_map(|id| books.entities.get(id).cloned())
            .collect()
    })
}
