//! Database migrations for Bandstand.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2026_07_10_100000_create_venues;
mod m2026_07_10_100100_create_artists;
mod m2026_07_10_100200_create_genres;
mod m2026_07_10_100300_create_genre_links;
mod m2026_07_10_100400_create_shows;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2026_07_10_100000_create_venues::Migration),
            Box::new(m2026_07_10_100100_create_artists::Migration),
            Box::new(m2026_07_10_100200_create_genres::Migration),
            Box::new(m2026_07_10_100300_create_genre_links::Migration),
            Box::new(m2026_07_10_100400_create_shows::Migration),
        ]
    }
}
