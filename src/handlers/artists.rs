//! # Artist Handlers
//!
//! Alphabetical listing, search with upcoming-show counts, detail with
//! past/upcoming partition, and create/edit forms.

use std::collections::HashMap;

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use sea_orm::TransactionTrait;
use serde::Deserialize;

use crate::error::AppError;
use crate::handlers::forms::{self, ArtistForm, ValidationErrors};
use crate::handlers::{SearchMatch, SearchResults};
use crate::repositories::show::{BookedVenue, split_past_upcoming};
use crate::repositories::{ArtistRepository, GenreRepository, ShowRepository};
use crate::server::AppState;
use crate::views;

/// One row in the alphabetical artist listing.
#[derive(Debug)]
pub struct ArtistSummary {
    pub id: i32,
    pub name: String,
}

/// Everything the artist detail page shows.
#[derive(Debug)]
pub struct ArtistDetail {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<BookedVenue>,
    pub upcoming_shows: Vec<BookedVenue>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// GET /artists: every artist, alphabetical by name.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let artists = ArtistRepository::new(&state.db).list_alphabetical().await?;
    let summaries: Vec<ArtistSummary> = artists
        .into_iter()
        .map(|artist| ArtistSummary {
            id: artist.id,
            name: artist.name,
        })
        .collect();
    Ok(Html(views::artists_page(&summaries)))
}

/// POST /artists/search: case-insensitive substring match on the name, each
/// hit carrying its count of upcoming shows.
pub async fn search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>, AppError> {
    let term = form.search_term.trim();
    let found = ArtistRepository::new(&state.db).search_by_name(term).await?;
    let shows = ShowRepository::new(&state.db).list_all().await?;

    let now = Utc::now().naive_utc();
    let mut upcoming_by_artist: HashMap<i32, usize> = HashMap::new();
    for show in &shows {
        if show.start_time > now {
            *upcoming_by_artist.entry(show.artist_id).or_default() += 1;
        }
    }

    let results = SearchResults {
        count: found.len(),
        matches: found
            .into_iter()
            .map(|artist| SearchMatch {
                id: artist.id,
                num_upcoming_shows: upcoming_by_artist.get(&artist.id).copied().unwrap_or(0),
                name: artist.name,
            })
            .collect(),
    };

    Ok(Html(views::search_page(
        "Artist search",
        "/artists",
        term,
        &results,
    )))
}

/// GET /artists/{id}: detail page with shows partitioned into past and
/// upcoming around now.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let artist = ArtistRepository::new(&state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist {id} does not exist.")))?;

    let genres = GenreRepository::new(&state.db)
        .names_for_artist(&artist)
        .await?;
    let booked = ShowRepository::new(&state.db).booked_venues(id).await?;

    let now = Utc::now().naive_utc();
    let (past_shows, upcoming_shows) = split_past_upcoming(booked, now, |row| row.start_time);

    let detail = ArtistDetail {
        id: artist.id,
        name: artist.name,
        genres,
        city: artist.city,
        state: artist.state,
        phone: artist.phone.as_deref().map(forms::format_phone),
        website_link: artist.website_link,
        facebook_link: artist.facebook_link,
        seeking_venue: artist.seeking_venue,
        seeking_description: artist.seeking_description,
        image_link: artist.image_link,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    };

    Ok(Html(views::artist_detail_page(&detail)))
}

/// GET /artists/create: empty create form.
pub async fn create_form() -> Html<String> {
    Html(views::artist_form_page(
        "New Artist",
        "/artists/create",
        &ArtistForm::default(),
        &ValidationErrors::default(),
    ))
}

/// POST /artists/create: validate, then insert the artist and its genre
/// links in one transaction. Redirects home on success.
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<ArtistForm>,
) -> Result<Response, AppError> {
    let submission = match form.validate() {
        Ok(submission) => submission,
        Err(errors) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::artist_form_page(
                    "New Artist",
                    "/artists/create",
                    &form,
                    &errors,
                )),
            )
                .into_response());
        }
    };

    let txn = state.db.begin().await?;
    match ArtistRepository::new(&txn).create(&submission).await {
        Ok(artist) => {
            txn.commit().await?;
            tracing::info!(artist_id = artist.id, name = %artist.name, "artist listed");
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            txn.rollback().await?;
            Err(AppError::internal(
                format!(
                    "An error occurred. Artist {} could not be listed.",
                    submission.name
                ),
                err,
            ))
        }
    }
}

/// GET /artists/{id}/edit: form pre-filled with the persisted values.
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let artist = ArtistRepository::new(&state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist {id} does not exist.")))?;
    let genres = GenreRepository::new(&state.db)
        .names_for_artist(&artist)
        .await?;

    let form = ArtistForm::from_model(&artist, &genres);
    Ok(Html(views::artist_form_page(
        "Edit Artist",
        &format!("/artists/{id}/edit"),
        &form,
        &ValidationErrors::default(),
    )))
}

/// POST /artists/{id}/edit: overwrite every mutable field with the
/// submitted values, then redirect to the detail view.
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<ArtistForm>,
) -> Result<Response, AppError> {
    ArtistRepository::new(&state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist {id} does not exist.")))?;

    let submission = match form.validate() {
        Ok(submission) => submission,
        Err(errors) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::artist_form_page(
                    "Edit Artist",
                    &format!("/artists/{id}/edit"),
                    &form,
                    &errors,
                )),
            )
                .into_response());
        }
    };

    let txn = state.db.begin().await?;
    match ArtistRepository::new(&txn).update(id, &submission).await {
        Ok(artist) => {
            txn.commit().await?;
            tracing::info!(artist_id = artist.id, "artist updated");
            Ok(Redirect::to(&format!("/artists/{id}")).into_response())
        }
        Err(err @ AppError::NotFound(_)) => {
            txn.rollback().await?;
            Err(err)
        }
        Err(err) => {
            txn.rollback().await?;
            Err(AppError::internal(
                format!(
                    "An error occurred. Artist {} could not be updated.",
                    submission.name
                ),
                err,
            ))
        }
    }
}
