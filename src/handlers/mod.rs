//! # HTTP Handlers
//!
//! One module per entity plus the shared form types. Each handler reads and
//! validates its input, runs the repository operations (inside a transaction
//! when more than one statement has to land together), shapes a plain view
//! model, and hands it to the views module for rendering.

pub mod artists;
pub mod forms;
pub mod shows;
pub mod venues;

#[cfg(test)]
mod tests;

use axum::response::Html;

use crate::error::AppError;
use crate::views;

/// One hit on a search results page.
#[derive(Debug)]
pub struct SearchMatch {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Matches plus their count, as the search pages render them.
#[derive(Debug)]
pub struct SearchResults {
    pub count: usize,
    pub matches: Vec<SearchMatch>,
}

/// Home page.
pub async fn home() -> Html<String> {
    Html(views::home_page())
}

/// Fallback for unmatched paths: the rendered 404 page.
pub async fn fallback() -> AppError {
    AppError::NotFound("That page does not exist.".to_string())
}
