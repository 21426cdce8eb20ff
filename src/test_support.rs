//! Shared test helpers: an in-memory database with the real migrations
//! applied, plus seed fixtures for venues, artists, and shows.

use chrono::NaiveDateTime;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use crate::error::AppError;
use crate::models::{artist, show, venue};
use crate::repositories::{ArtistSubmission, VenueSubmission};

pub async fn test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

pub fn venue_submission(name: &str, city: &str, state: &str) -> VenueSubmission {
    VenueSubmission {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: "1015 Folsom Street".to_string(),
        phone: None,
        image_link: None,
        facebook_link: None,
        website_link: None,
        seeking_talent: false,
        seeking_description: None,
        genres: vec!["Jazz".to_string()],
    }
}

pub fn artist_submission(name: &str, city: &str, state: &str) -> ArtistSubmission {
    ArtistSubmission {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        phone: None,
        image_link: None,
        facebook_link: None,
        website_link: None,
        seeking_venue: false,
        seeking_description: None,
        genres: vec!["Rock n Roll".to_string()],
    }
}

pub async fn seed_venue(
    db: &DatabaseConnection,
    name: &str,
    city: &str,
    state: &str,
) -> Result<venue::Model, AppError> {
    let venue = venue::ActiveModel {
        name: Set(name.to_string()),
        city: Set(city.to_string()),
        state: Set(state.to_string()),
        address: Set("1015 Folsom Street".to_string()),
        seeking_talent: Set(false),
        ..Default::default()
    };
    Ok(venue.insert(db).await?)
}

pub async fn seed_artist(
    db: &DatabaseConnection,
    name: &str,
    city: &str,
    state: &str,
) -> Result<artist::Model, AppError> {
    let artist = artist::ActiveModel {
        name: Set(name.to_string()),
        city: Set(city.to_string()),
        state: Set(state.to_string()),
        seeking_venue: Set(false),
        ..Default::default()
    };
    Ok(artist.insert(db).await?)
}

pub async fn seed_show(
    db: &DatabaseConnection,
    venue_id: i32,
    artist_id: i32,
    start_time: NaiveDateTime,
) -> Result<show::Model, AppError> {
    let show = show::ActiveModel {
        venue_id: Set(venue_id),
        artist_id: Set(artist_id),
        start_time: Set(start_time),
        ..Default::default()
    };
    Ok(show.insert(db).await?)
}
