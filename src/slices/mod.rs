//! Application slices.
//!
//! Every slice follows the same contract: a closed action enum, a total
//! reducer that hands back the input `Arc` for anything it does not change,
//! and selectors over the root tree.

pub mod auth;
pub mod books;
pub mod settings;
pub mod stocks;
pub mod todos;

pub use auth::{select_auth, select_is_authenticated, AuthAction, AuthState, AUTH_KEY};
pub use books::{
    select_books, select_books_state, Book, BookChanges, BooksAction, BooksState, BOOKS_KEY,
};
pub use settings::{select_settings, SettingsAction, SettingsState, DEFAULT_THEME, SETTINGS_KEY};
pub use stocks::{select_stocks, Quote, StocksAction, StocksState, DEFAULT_SYMBOL, STOCKS_KEY};
pub use todos::{
    select_filtered_todos, select_todos, Todo, TodosAction, TodosFilter, TodosState, TODOS_KEY,
};
