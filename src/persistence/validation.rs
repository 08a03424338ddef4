//! Structural checks for state trees that did not come from the reducers.
//!
//! A hydrated or restored snapshot can violate invariants the reducers
//! otherwise guarantee. Every issue is collected instead of stopping at the
//! first one.

use crate::core::RootState;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SnapshotIssue {
    #[error("Todo id {id} appears more than once")]
    DuplicateTodoId { id: u64 },

    #[error("Todo id {id} leaves no room for another todo")]
    TodoIdExhausted { id: u64 },

    #[error("Book {id} is listed but has no entity")]
    MissingBookEntity { id: String },

    #[error("Book {id} has an entity but is not listed")]
    UnlistedBook { id: String },

    #[error("Book {id} is listed more than once")]
    DuplicateBookId { id: String },

    #[error("Book stored under {key} carries id {id}")]
    MismatchedBookKey { key: String, id: String },
}

/// Validate a snapshot, accumulating ALL issues.
pub fn validate_snapshot(state: &RootState) -> Validation<(), NonEmptyVec<SnapshotIssue>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<SnapshotIssue>>> = vec![Validation::success(())];

    let mut todo_ids = HashSet::new();
    for todo in &state.todos.items {
        if !todo_ids.insert(todo.id) {
            checks.push(Validation::fail(SnapshotIssue::DuplicateTodoId { id: todo.id }));
        }
        if todo.id == u64::MAX {
            checks.push(Validation::fail(SnapshotIssue::TodoIdExhausted { id: todo.id }));
        }
    }

    let books = &state.books;
    let mut listed = HashSet::new();
    for id in &books.ids {
        if !listed.insert(id.as_str()) {
            checks.push(Validation::fail(SnapshotIssue::DuplicateBookId { id: id.clone() }));
        } else if !books.entities.contains_key(id) {
            checks.push(Validation::fail(SnapshotIssue::MissingBookEntity { id: id.clone() }));
        }
    }

    for (key, book) in &books.entities {
        if !listed.contains(key.as_str()) {
            checks.push(Validation::fail(SnapshotIssue::UnlistedBook { id: key.clone() }));
        }
        if &book.id != key {
            checks.push(Validation::fail(SnapshotIssue::MismatchedBookKey {
                key: key.clone(),
                id: book.id.clone(),
            }));
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slices::{Book, BooksState, Todo, TodosState};
    use std::sync::Arc;

    fn todo(id: u64) -> Todo {
        Todo {
            id,
            name: format!("todo {id}"),
            done: false,
        }
    }

    #[test]
    fn default_tree_is_valid() {
        assert!(matches!(
            validate_snapshot(&RootState::default()),
            Validation::Success(())
        ));
    }

    #[test]
    fn reducer_built_books_are_valid() {
        let state = RootState {
            books: Arc::new(BooksState::from_books(vec![
                Book::new("A", "a", ""),
                Book::new("B", "b", ""),
            ])),
            ..RootState::default()
        };
        assert!(matches!(validate_snapshot(&state), Validation::Success(())));
    }

    #[test]
    fn accumulates_every_issue() {
        let mut books = BooksState::default();
        let stray = Book {
            id: "other".into(),
            ..Book::new("Stray", "s", "")
        };
        books.ids = vec!["ghost".into(), "stray".into(), "stray".into()];
        books.entities.insert("stray".into(), stray);
        books.entities.insert("unlisted".into(), Book {
            id: "unlisted".into(),
            ..Book::new("U", "u", "")
        });

        let state = RootState {
            todos: Arc::new(TodosState {
                items: vec![todo(1), todo(1)],
                ..TodosState::default()
            }),
            books: Arc::new(books),
            ..RootState::default()
        };

        match validate_snapshot(&state) {
            Validation::Failure(issues) => {
                let issues: Vec<_> = issues.iter().cloned().collect();
                assert_eq!(issues.len(), 5);
                assert!(issues.contains(&SnapshotIssue::DuplicateTodoId { id: 1 }));
                assert!(issues.contains(&SnapshotIssue::MissingBookEntity { id: "ghost".into() }));
                assert!(issues.contains(&SnapshotIssue::DuplicateBookId { id: "stray".into() }));
                assert!(issues.contains(&SnapshotIssue::UnlistedBook { id: "unlisted".into() }));
                assert!(issues.contains(&SnapshotIssue::MismatchedBookKey {
                    key: "stray".into(),
                    id: "other".into()
                }));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }
}
