//! # Venue Handlers
//!
//! Grouped listing, search, detail with past/upcoming partition, create and
//! edit forms, and delete.

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
use crate::handlers::forms::{self, ValidationErrors, VenueForm};
use crate::handlers::{SearchMatch, SearchResults};
use crate::repositories::show::{BookedArtist, split_past_upcoming};
use crate::repositories::{GenreRepository, ShowRepository, VenueRepository};
use crate::server::AppState;
use crate::views;

/// One venue row in the grouped listing.
#[derive(Debug)]
pub struct VenueSummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues grouped under one (city, state) pair. Groups arrive ordered by
/// (state, city) ascending.
#[derive(Debug)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// Everything the venue detail page shows.
#[derive(Debug)]
pub struct VenueDetail {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<BookedArtist>,
    pub upcoming_shows: Vec<BookedArtist>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// GET /venues: every venue, grouped by (city, state), with each venue's
/// count of shows starting strictly after now.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let venues = VenueRepository::new(&state.db).list_all().await?;
    let shows = ShowRepository::new(&state.db).list_all().await?;

    let now = Utc::now().naive_utc();
    let mut upcoming_by_venue: HashMap<i32, usize> = HashMap::new();
    for show in &shows {
        if show.start_time > now {
            *upcoming_by_venue.entry(show.venue_id).or_default() += 1;
        }
    }

    // list_all orders by (state, city), so consecutive rows with the same
    // pair form one group.
    let mut areas: Vec<VenueArea> = Vec::new();
    for venue in venues {
        let summary = VenueSummary {
            id: venue.id,
            num_upcoming_shows: upcoming_by_venue.get(&venue.id).copied().unwrap_or(0),
            name: venue.name,
        };
        if let Some(area) = areas.last_mut()
            && area.city == venue.city
            && area.state == venue.state
        {
            area.venues.push(summary);
        } else {
            areas.push(VenueArea {
                city: venue.city,
                state: venue.state,
                venues: vec![summary],
            });
        }
    }

    Ok(Html(views::venues_page(&areas)))
}

/// POST /venues/search: case-insensitive substring match on the name. An
/// empty term returns every venue.
pub async fn search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>, AppError> {
    let term = form.search_term.trim();
    let found = VenueRepository::new(&state.db).search_by_name(term).await?;
    let shows = ShowRepository::new(&state.db).list_all().await?;

    let now = Utc::now().naive_utc();
    let mut upcoming_by_venue: HashMap<i32, usize> = HashMap::new();
    for show in &shows {
        if show.start_time > now {
            *upcoming_by_venue.entry(show.venue_id).or_default() += 1;
        }
    }

    let results = SearchResults {
        count: found.len(),
        matches: found
            .into_iter()
            .map(|venue| SearchMatch {
                id: venue.id,
                num_upcoming_shows: upcoming_by_venue.get(&venue.id).copied().unwrap_or(0),
                name: venue.name,
            })
            .collect(),
    };

    Ok(Html(views::search_page(
        "Venue search",
        "/venues",
        term,
        &results,
    )))
}

/// GET /venues/{id}: detail page with shows partitioned into past and
/// upcoming around now.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let venue = VenueRepository::new(&state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {id} does not exist.")))?;

    let genres = GenreRepository::new(&state.db)
        .names_for_venue(&venue)
        .await?;
    let booked = ShowRepository::new(&state.db).booked_artists(id).await?;

    let now = Utc::now().naive_utc();
    let (past_shows, upcoming_shows) = split_past_upcoming(booked, now, |row| row.start_time);

    let detail = VenueDetail {
        id: venue.id,
        name: venue.name,
        genres,
        address: venue.address,
        city: venue.city,
        state: venue.state,
        phone: venue.phone.as_deref().map(forms::format_phone),
        website_link: venue.website_link,
        facebook_link: venue.facebook_link,
        seeking_talent: venue.seeking_talent,
        seeking_description: venue.seeking_description,
        image_link: venue.image_link,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    };

    Ok(Html(views::venue_detail_page(&detail)))
}

/// GET /venues/create: empty create form.
pub async fn create_form() -> Html<String> {
    Html(views::venue_form_page(
        "New Venue",
        "/venues/create",
        &VenueForm::default(),
        &ValidationErrors::default(),
    ))
}

/// POST /venues/create: validate, then insert the venue and its genre links
/// in one transaction. Redirects home on success; re-renders the form with
/// field errors on validation failure.
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<VenueForm>,
) -> Result<Response, AppError> {
    let submission = match form.validate() {
        Ok(submission) => submission,
        Err(errors) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::venue_form_page(
                    "New Venue",
                    "/venues/create",
                    &form,
                    &errors,
                )),
            )
                .into_response());
        }
    };

    let txn = state.db.begin().await?;
    match VenueRepository::new(&txn).create(&submission).await {
        Ok(venue) => {
            txn.commit().await?;
            tracing::info!(venue_id = venue.id, name = %venue.name, "venue listed");
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            txn.rollback().await?;
            Err(AppError::internal(
                format!(
                    "An error occurred. Venue {} could not be listed.",
                    submission.name
                ),
                err,
            ))
        }
    }
}

/// GET /venues/{id}/edit: form pre-filled with the persisted values; the
/// stored genre set is re-split into the delimited field.
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let venue = VenueRepository::new(&state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {id} does not exist.")))?;
    let genres = GenreRepository::new(&state.db)
        .names_for_venue(&venue)
        .await?;

    let form = VenueForm::from_model(&venue, &genres);
    Ok(Html(views::venue_form_page(
        "Edit Venue",
        &format!("/venues/{id}/edit"),
        &form,
        &ValidationErrors::default(),
    )))
}

/// POST /venues/{id}/edit: overwrite every mutable field with the submitted
/// values, then redirect to the detail view.
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<VenueForm>,
) -> Result<Response, AppError> {
    VenueRepository::new(&state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {id} does not exist.")))?;

    let submission = match form.validate() {
        Ok(submission) => submission,
        Err(errors) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::venue_form_page(
                    "Edit Venue",
                    &format!("/venues/{id}/edit"),
                    &form,
                    &errors,
                )),
            )
                .into_response());
        }
    };

    let txn = state.db.begin().await?;
    match VenueRepository::new(&txn).update(id, &submission).await {
        Ok(venue) => {
            txn.commit().await?;
            tracing::info!(venue_id = venue.id, "venue updated");
            Ok(Redirect::to(&format!("/venues/{id}")).into_response())
        }
        Err(err @ AppError::NotFound(_)) => {
            txn.rollback().await?;
            Err(err)
        }
        Err(err) => {
            txn.rollback().await?;
            Err(AppError::internal(
                format!(
                    "An error occurred. Venue {} could not be updated.",
                    submission.name
                ),
                err,
            ))
        }
    }
}

/// DELETE /venues/{id}: refused with a conflict while shows still reference
/// the venue; otherwise the row and its genre links go away.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let repo = VenueRepository::new(&state.db);
    let venue = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {id} does not exist.")))?;

    let booked = ShowRepository::new(&state.db).count_for_venue(id).await?;
    if booked > 0 {
        return Err(AppError::Conflict(format!(
            "Venue {} still has {} booked show(s) and cannot be deleted.",
            venue.name, booked
        )));
    }

    repo.delete(id).await?;
    tracing::info!(venue_id = id, name = %venue.name, "venue deleted");

    Ok(Html(views::message_page(
        "Venue deleted",
        &format!("Venue {} was successfully deleted.", venue.name),
    )))
}
