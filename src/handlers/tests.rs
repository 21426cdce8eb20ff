//! # Handler Tests
//!
//! Router-level tests driving the full axum application against an
//! in-memory database with the real migrations applied.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use sea_orm::{EntityTrait, PaginatorTrait};
use tower::ServiceExt;

use crate::config::AppConfig;
use crate::models::{Genre, Show, Venue};
use crate::server::{AppState, create_app};
use crate::test_support::{seed_artist, seed_show, seed_venue, test_db};

async fn setup_app() -> (AppState, axum::Router) {
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        db: test_db().await,
    };
    let app = create_app(state.clone());
    (state, app)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn home_page_renders() {
    let (_state, app) = setup_app().await;
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Bandstand"));
}

#[tokio::test]
async fn unknown_path_renders_404_page() {
    let (_state, app) = setup_app().await;
    let response = app.oneshot(get("/nowhere")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("404 Not Found"));
}

#[tokio::test]
async fn create_venue_redirects_home_and_persists() {
    let (state, app) = setup_app().await;

    let body = "name=The+Musical+Hop&city=San+Francisco&state=CA\
                &address=1015+Folsom+Street&phone=1231231234\
                &genres=Jazz%2C+Reggae&seeking_talent=Yes\
                &seeking_description=Local+artists+wanted";
    let response = app.oneshot(form_post("/venues/create", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let venues = Venue::find().all(&state.db).await.unwrap();
    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0].name, "The Musical Hop");
    assert!(venues[0].seeking_talent);
    assert_eq!(Genre::find().count(&state.db).await.unwrap(), 2);
}

#[tokio::test]
async fn invalid_venue_form_rerenders_with_errors() {
    let (state, app) = setup_app().await;

    let body = "city=San+Francisco&state=CA&address=1015+Folsom+Street&genres=Jazz";
    let response = app.oneshot(form_post("/venues/create", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_string(response).await;
    assert!(page.contains("Name is required."));
    // Submitted values are echoed back for correction.
    assert!(page.contains("value=\"San Francisco\""));

    assert_eq!(Venue::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn venues_index_groups_by_city_state_in_order() {
    let (state, app) = setup_app().await;
    seed_venue(&state.db, "Dueling Pianos Bar", "New York", "NY")
        .await
        .unwrap();
    seed_venue(&state.db, "The Musical Hop", "San Francisco", "CA")
        .await
        .unwrap();
    seed_venue(&state.db, "Park Square Live Music & Coffee", "San Francisco", "CA")
        .await
        .unwrap();

    let response = app.oneshot(get("/venues")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;

    // CA group renders before NY, and both venues share the one CA group.
    let ca = page.find("San Francisco, CA").expect("CA group");
    let ny = page.find("New York, NY").expect("NY group");
    assert!(ca < ny);
    assert_eq!(page.matches("San Francisco, CA").count(), 1);
}

#[tokio::test]
async fn venues_index_counts_upcoming_shows() {
    let (state, app) = setup_app().await;
    let venue = seed_venue(&state.db, "The Musical Hop", "San Francisco", "CA")
        .await
        .unwrap();
    let artist = seed_artist(&state.db, "Guns N Petals", "San Francisco", "CA")
        .await
        .unwrap();

    let now = Utc::now().naive_utc();
    seed_show(&state.db, venue.id, artist.id, now - Duration::days(1))
        .await
        .unwrap();
    seed_show(&state.db, venue.id, artist.id, now + Duration::days(1))
        .await
        .unwrap();
    seed_show(&state.db, venue.id, artist.id, now + Duration::days(2))
        .await
        .unwrap();

    let response = app.oneshot(get("/venues")).await.unwrap();
    let page = body_string(response).await;
    assert!(page.contains("(2 upcoming)"));
}

#[tokio::test]
async fn venue_search_is_case_insensitive_and_counts() {
    let (state, app) = setup_app().await;
    seed_venue(&state.db, "The Musical Hop", "San Francisco", "CA")
        .await
        .unwrap();
    seed_venue(&state.db, "Park Square Live Music & Coffee", "San Francisco", "CA")
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(form_post("/venues/search", "search_term=hop"))
        .await
        .unwrap();
    let page = body_string(response).await;
    assert!(page.contains("Found 1 result(s)"));
    assert!(page.contains("The Musical Hop"));

    let response = app
        .clone()
        .oneshot(form_post("/venues/search", "search_term=Music"))
        .await
        .unwrap();
    assert!(body_string(response).await.contains("Found 2 result(s)"));

    // An empty term returns every row.
    let response = app
        .oneshot(form_post("/venues/search", "search_term="))
        .await
        .unwrap();
    assert!(body_string(response).await.contains("Found 2 result(s)"));
}

#[tokio::test]
async fn venue_detail_partitions_past_and_upcoming() {
    let (state, app) = setup_app().await;
    let venue = seed_venue(&state.db, "The Musical Hop", "San Francisco", "CA")
        .await
        .unwrap();
    let artist = seed_artist(&state.db, "Guns N Petals", "San Francisco", "CA")
        .await
        .unwrap();

    let now = Utc::now().naive_utc();
    seed_show(&state.db, venue.id, artist.id, now - Duration::days(7))
        .await
        .unwrap();
    seed_show(&state.db, venue.id, artist.id, now + Duration::days(7))
        .await
        .unwrap();

    let response = app.oneshot(get(&format!("/venues/{}", venue.id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;
    assert!(page.contains("Upcoming shows (1)"));
    assert!(page.contains("Past shows (1)"));
}

#[tokio::test]
async fn venue_detail_formats_bare_phone_numbers() {
    let (state, app) = setup_app().await;
    let venue = seed_venue(&state.db, "The Musical Hop", "San Francisco", "CA")
        .await
        .unwrap();

    use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
    let mut venue_active = venue.into_active_model();
    venue_active.phone = Set(Some("1231231234".to_string()));
    let venue = venue_active.update(&state.db).await.unwrap();

    let response = app.oneshot(get(&format!("/venues/{}", venue.id))).await.unwrap();
    assert!(body_string(response).await.contains("123-123-1234"));
}

#[tokio::test]
async fn missing_venue_and_artist_details_are_404() {
    let (_state, app) = setup_app().await;

    let response = app.clone().oneshot(get("/venues/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/artists/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_venue_overwrites_fields_and_redirects_to_detail() {
    let (state, app) = setup_app().await;
    let venue = seed_venue(&state.db, "The Musical Hop", "San Francisco", "CA")
        .await
        .unwrap();
    let other = seed_venue(&state.db, "Dueling Pianos Bar", "New York", "NY")
        .await
        .unwrap();

    // The edit form pre-fills from the persisted row.
    let response = app
        .clone()
        .oneshot(get(&format!("/venues/{}/edit", venue.id)))
        .await
        .unwrap();
    assert!(body_string(response).await.contains("value=\"The Musical Hop\""));

    let body = "name=The+Annex&city=Oakland&state=CA&address=6+Brewery+Row\
                &genres=Blues&seeking_talent=No";
    let response = app
        .clone()
        .oneshot(form_post(&format!("/venues/{}/edit", venue.id), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("/venues/{}", venue.id)
    );

    let updated = Venue::find_by_id(venue.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "The Annex");
    assert_eq!(updated.city, "Oakland");

    let untouched = Venue::find_by_id(other.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.name, "Dueling Pianos Bar");
}

#[tokio::test]
async fn edit_missing_venue_is_404() {
    let (_state, app) = setup_app().await;
    let body = "name=Ghost&city=Nowhere&state=CA&address=1&genres=Jazz";
    let response = app
        .oneshot(form_post("/venues/999/edit", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_venue_with_shows_is_rejected() {
    let (state, app) = setup_app().await;
    let venue = seed_venue(&state.db, "The Musical Hop", "San Francisco", "CA")
        .await
        .unwrap();
    let artist = seed_artist(&state.db, "Guns N Petals", "San Francisco", "CA")
        .await
        .unwrap();
    seed_show(
        &state.db,
        venue.id,
        artist.id,
        Utc::now().naive_utc() + Duration::days(1),
    )
    .await
    .unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/venues/{}", venue.id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_string(response).await.contains("cannot be deleted"));
    assert_eq!(Venue::find().count(&state.db).await.unwrap(), 1);
}

#[tokio::test]
async fn delete_venue_without_shows_succeeds() {
    let (state, app) = setup_app().await;
    let venue = seed_venue(&state.db, "The Musical Hop", "San Francisco", "CA")
        .await
        .unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/venues/{}", venue.id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("successfully deleted"));
    assert_eq!(Venue::find().count(&state.db).await.unwrap(), 0);

    // Deleting it again is a 404.
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/venues/{}", venue.id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn artists_index_is_alphabetical() {
    let (state, app) = setup_app().await;
    seed_artist(&state.db, "The Wild Sax Band", "San Francisco", "CA")
        .await
        .unwrap();
    seed_artist(&state.db, "Guns N Petals", "San Francisco", "CA")
        .await
        .unwrap();

    let response = app.oneshot(get("/artists")).await.unwrap();
    let page = body_string(response).await;
    let first = page.find("Guns N Petals").unwrap();
    let second = page.find("The Wild Sax Band").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn artist_search_reports_upcoming_counts() {
    let (state, app) = setup_app().await;
    let venue = seed_venue(&state.db, "The Musical Hop", "San Francisco", "CA")
        .await
        .unwrap();
    let artist = seed_artist(&state.db, "Guns N Petals", "San Francisco", "CA")
        .await
        .unwrap();
    seed_show(
        &state.db,
        venue.id,
        artist.id,
        Utc::now().naive_utc() + Duration::days(3),
    )
    .await
    .unwrap();

    let response = app
        .oneshot(form_post("/artists/search", "search_term=petals"))
        .await
        .unwrap();
    let page = body_string(response).await;
    assert!(page.contains("Found 1 result(s)"));
    assert!(page.contains("(1 upcoming)"));
}

#[tokio::test]
async fn create_artist_redirects_home() {
    let (state, app) = setup_app().await;

    let body = "name=Guns+N+Petals&city=San+Francisco&state=CA\
                &genres=Rock+n+Roll&seeking_venue=Yes";
    let response = app
        .oneshot(form_post("/artists/create", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let artists = crate::models::Artist::find().all(&state.db).await.unwrap();
    assert_eq!(artists.len(), 1);
    assert!(artists[0].seeking_venue);
}

#[tokio::test]
async fn show_create_requires_existing_artist_first() {
    let (state, app) = setup_app().await;

    // Neither party exists; the artist check reports first.
    let body = "artist_id=41&venue_id=52&start_time=2026-09-01T20%3A00";
    let response = app.oneshot(form_post("/shows/create", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_string(response).await;
    assert!(page.contains("The artist with ID 41 does not exist."));
    assert!(!page.contains("venue with ID"));
    assert_eq!(Show::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn show_create_reports_missing_venue() {
    let (state, app) = setup_app().await;
    let artist = seed_artist(&state.db, "Guns N Petals", "San Francisco", "CA")
        .await
        .unwrap();

    let body = format!(
        "artist_id={}&venue_id=52&start_time=2026-09-01T20%3A00",
        artist.id
    );
    let response = app
        .oneshot(form_post("/shows/create", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_string(response)
        .await
        .contains("The venue with ID 52 does not exist."));
    assert_eq!(Show::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn show_create_rejects_duplicate_tuple() {
    let (state, app) = setup_app().await;
    let venue = seed_venue(&state.db, "The Musical Hop", "San Francisco", "CA")
        .await
        .unwrap();
    let artist = seed_artist(&state.db, "Guns N Petals", "San Francisco", "CA")
        .await
        .unwrap();

    let body = format!(
        "artist_id={}&venue_id={}&start_time=2026-09-01T20%3A00",
        artist.id, venue.id
    );

    let response = app
        .clone()
        .oneshot(form_post("/shows/create", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/shows");

    let response = app
        .oneshot(form_post("/shows/create", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_string(response).await.contains("already booked"));
    assert_eq!(Show::find().count(&state.db).await.unwrap(), 1);
}

#[tokio::test]
async fn shows_index_lists_newest_first() {
    let (state, app) = setup_app().await;
    let venue = seed_venue(&state.db, "The Musical Hop", "San Francisco", "CA")
        .await
        .unwrap();
    let early = seed_artist(&state.db, "Early Act", "San Francisco", "CA")
        .await
        .unwrap();
    let late = seed_artist(&state.db, "Late Act", "San Francisco", "CA")
        .await
        .unwrap();

    let now = Utc::now().naive_utc();
    seed_show(&state.db, venue.id, early.id, now - Duration::days(30))
        .await
        .unwrap();
    seed_show(&state.db, venue.id, late.id, now + Duration::days(30))
        .await
        .unwrap();

    let response = app.oneshot(get("/shows")).await.unwrap();
    let page = body_string(response).await;
    let late_pos = page.find("Late Act").unwrap();
    let early_pos = page.find("Early Act").unwrap();
    assert!(late_pos < early_pos);
}
