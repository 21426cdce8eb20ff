//! # Show Handlers
//!
//! Listing (newest start time first) and the create flow with its validation
//! chain: artist exists, venue exists, tuple not already booked.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::error::AppError;
use crate::handlers::forms::{ShowForm, ValidationErrors};
use crate::repositories::{ArtistRepository, ShowRepository, VenueRepository};
use crate::server::AppState;
use crate::views;

/// GET /shows: all shows with both party names, newest start time first.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let listings = ShowRepository::new(&state.db).listings().await?;
    Ok(Html(views::shows_page(&listings)))
}

/// GET /shows/create: empty create form.
pub async fn create_form() -> Html<String> {
    Html(views::show_form_page(
        "New Show",
        &ShowForm::default(),
        &ValidationErrors::default(),
    ))
}

fn rerender(form: &ShowForm, errors: &ValidationErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(views::show_form_page("New Show", form, errors)),
    )
        .into_response()
}

/// POST /shows/create: validate in order: the referenced artist exists, the
/// referenced venue exists, and no show with this exact (artist, venue,
/// start time) tuple is booked yet. Each failure gets its own message; only
/// after all three checks pass does the insert run. A duplicate that races
/// past the pre-check bounces off the unique index and reports the same
/// duplicate message.
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<ShowForm>,
) -> Result<Response, AppError> {
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => return Ok(rerender(&form, &errors)),
    };

    let mut errors = ValidationErrors::default();
    if ArtistRepository::new(&state.db)
        .find_by_id(request.artist_id)
        .await?
        .is_none()
    {
        errors.add(
            "artist_id",
            format!("The artist with ID {} does not exist.", request.artist_id),
        );
    } else if VenueRepository::new(&state.db)
        .find_by_id(request.venue_id)
        .await?
        .is_none()
    {
        errors.add(
            "venue_id",
            format!("The venue with ID {} does not exist.", request.venue_id),
        );
    } else if ShowRepository::new(&state.db)
        .exists(request.venue_id, request.artist_id, request.start_time)
        .await?
    {
        errors.add("start_time", "This show is already booked.");
    }
    if !errors.is_empty() {
        return Ok(rerender(&form, &errors));
    }

    match ShowRepository::new(&state.db).create(&request).await {
        Ok(show) => {
            tracing::info!(
                show_id = show.id,
                venue_id = show.venue_id,
                artist_id = show.artist_id,
                "show booked"
            );
            Ok(Redirect::to("/shows").into_response())
        }
        Err(AppError::Conflict(_)) => {
            // Lost the race with an identical submission.
            let mut errors = ValidationErrors::default();
            errors.add("start_time", "This show is already booked.");
            Ok(rerender(&form, &errors))
        }
        Err(err) => Err(AppError::internal(
            "An error occurred. Show could not be listed.",
            err,
        )),
    }
}
