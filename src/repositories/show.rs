//! # Show Repository
//!
//! Shows join one venue and one artist at a start time. Listing queries pull
//! the party names alongside the show row; the past/upcoming partition is an
//! in-memory pass with strict comparisons, so a show starting at the
//! evaluation instant lands in neither bucket.

use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::error::AppError;
use crate::models::show::{self, Entity as Show};
use crate::models::{artist, venue};

/// Validated show data as submitted through the create form.
#[derive(Debug, Clone, Copy)]
pub struct CreateShowRequest {
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: NaiveDateTime,
}

/// A show row joined with both parties, for the shows listing.
#[derive(Debug, Clone, FromQueryResult)]
pub struct ShowListing {
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

/// A show row joined with its artist, for the venue detail page.
#[derive(Debug, Clone, FromQueryResult)]
pub struct BookedArtist {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

/// A show row joined with its venue, for the artist detail page.
#[derive(Debug, Clone, FromQueryResult)]
pub struct BookedVenue {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

/// Split rows into (past, upcoming) around `now` using strict comparisons.
pub fn split_past_upcoming<T, F>(rows: Vec<T>, now: NaiveDateTime, start_time: F) -> (Vec<T>, Vec<T>)
where
    F: Fn(&T) -> NaiveDateTime,
{
    let mut past = Vec::new();
    let mut upcoming = Vec::new();
    for row in rows {
        let start = start_time(&row);
        if start < now {
            past.push(row);
        } else if start > now {
            upcoming.push(row);
        }
    }
    (past, upcoming)
}

/// Repository for show database operations.
pub struct ShowRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ShowRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Every show row, unjoined; the listing pages count upcoming shows per
    /// venue or artist from this in memory.
    pub async fn list_all(&self) -> Result<Vec<show::Model>, AppError> {
        let shows = Show::find().all(self.conn).await?;
        Ok(shows)
    }

    /// All shows joined with both parties, newest start time first.
    pub async fn listings(&self) -> Result<Vec<ShowListing>, AppError> {
        let listings = Show::find()
            .select_only()
            .column(show::Column::VenueId)
            .column_as(venue::Column::Name, "venue_name")
            .column(show::Column::ArtistId)
            .column_as(artist::Column::Name, "artist_name")
            .column_as(artist::Column::ImageLink, "artist_image_link")
            .column(show::Column::StartTime)
            .join(JoinType::InnerJoin, show::Relation::Venue.def())
            .join(JoinType::InnerJoin, show::Relation::Artist.def())
            .order_by_desc(show::Column::StartTime)
            .into_model::<ShowListing>()
            .all(self.conn)
            .await?;
        Ok(listings)
    }

    /// Shows booked at a venue, joined with the performing artist.
    pub async fn booked_artists(&self, venue_id: i32) -> Result<Vec<BookedArtist>, AppError> {
        let rows = Show::find()
            .select_only()
            .column(show::Column::ArtistId)
            .column_as(artist::Column::Name, "artist_name")
            .column_as(artist::Column::ImageLink, "artist_image_link")
            .column(show::Column::StartTime)
            .join(JoinType::InnerJoin, show::Relation::Artist.def())
            .filter(show::Column::VenueId.eq(venue_id))
            .order_by_asc(show::Column::StartTime)
            .into_model::<BookedArtist>()
            .all(self.conn)
            .await?;
        Ok(rows)
    }

    /// Shows an artist is booked for, joined with the hosting venue.
    pub async fn booked_venues(&self, artist_id: i32) -> Result<Vec<BookedVenue>, AppError> {
        let rows = Show::find()
            .select_only()
            .column(show::Column::VenueId)
            .column_as(venue::Column::Name, "venue_name")
            .column_as(venue::Column::ImageLink, "venue_image_link")
            .column(show::Column::StartTime)
            .join(JoinType::InnerJoin, show::Relation::Venue.def())
            .filter(show::Column::ArtistId.eq(artist_id))
            .order_by_asc(show::Column::StartTime)
            .into_model::<BookedVenue>()
            .all(self.conn)
            .await?;
        Ok(rows)
    }

    /// True when a show with this exact (venue, artist, start time) tuple is
    /// already booked.
    pub async fn exists(
        &self,
        venue_id: i32,
        artist_id: i32,
        start_time: NaiveDateTime,
    ) -> Result<bool, AppError> {
        let found = Show::find()
            .filter(show::Column::VenueId.eq(venue_id))
            .filter(show::Column::ArtistId.eq(artist_id))
            .filter(show::Column::StartTime.eq(start_time))
            .one(self.conn)
            .await?;
        Ok(found.is_some())
    }

    pub async fn count_for_venue(&self, venue_id: i32) -> Result<u64, AppError> {
        let count = Show::find()
            .filter(show::Column::VenueId.eq(venue_id))
            .count(self.conn)
            .await?;
        Ok(count)
    }

    /// Insert a show. The unique index on (venue_id, artist_id, start_time)
    /// rejects a duplicate that raced past the [`exists`](Self::exists)
    /// pre-check; the caller maps that conflict back to the duplicate
    /// message.
    pub async fn create(&self, request: &CreateShowRequest) -> Result<show::Model, AppError> {
        let booked = show::ActiveModel {
            venue_id: Set(request.venue_id),
            artist_id: Set(request.artist_id),
            start_time: Set(request.start_time),
            ..Default::default()
        };
        Ok(booked.insert(self.conn).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_artist, seed_show, seed_venue, test_db};
    use chrono::{Duration, NaiveDate};

    fn at(y: i32, mo: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn partition_drops_shows_starting_exactly_now() {
        let now = at(2026, 8, 1, 20);
        let rows = vec![
            ("past", now - Duration::hours(2)),
            ("boundary", now),
            ("upcoming", now + Duration::hours(2)),
        ];

        let (past, upcoming) = split_past_upcoming(rows, now, |r| r.1);
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].0, "past");
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].0, "upcoming");
    }

    #[tokio::test]
    async fn listings_join_parties_newest_first() {
        let db = test_db().await;
        let venue = seed_venue(&db, "The Musical Hop", "San Francisco", "CA")
            .await
            .unwrap();
        let artist = seed_artist(&db, "Guns N Petals", "San Francisco", "CA")
            .await
            .unwrap();

        seed_show(&db, venue.id, artist.id, at(2026, 6, 1, 20)).await.unwrap();
        seed_show(&db, venue.id, artist.id, at(2026, 9, 1, 20)).await.unwrap();

        let listings = ShowRepository::new(&db).listings().await.unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].start_time, at(2026, 9, 1, 20));
        assert_eq!(listings[0].venue_name, "The Musical Hop");
        assert_eq!(listings[0].artist_name, "Guns N Petals");
    }

    #[tokio::test]
    async fn exists_matches_exact_tuple_only() {
        let db = test_db().await;
        let venue = seed_venue(&db, "The Musical Hop", "San Francisco", "CA")
            .await
            .unwrap();
        let artist = seed_artist(&db, "Guns N Petals", "San Francisco", "CA")
            .await
            .unwrap();
        seed_show(&db, venue.id, artist.id, at(2026, 9, 1, 20)).await.unwrap();

        let repo = ShowRepository::new(&db);
        assert!(repo.exists(venue.id, artist.id, at(2026, 9, 1, 20)).await.unwrap());
        assert!(!repo.exists(venue.id, artist.id, at(2026, 9, 1, 21)).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_tuple_is_rejected_by_storage() {
        let db = test_db().await;
        let venue = seed_venue(&db, "The Musical Hop", "San Francisco", "CA")
            .await
            .unwrap();
        let artist = seed_artist(&db, "Guns N Petals", "San Francisco", "CA")
            .await
            .unwrap();

        let request = CreateShowRequest {
            venue_id: venue.id,
            artist_id: artist.id,
            start_time: at(2026, 9, 1, 20),
        };

        let repo = ShowRepository::new(&db);
        repo.create(&request).await.unwrap();
        let err = repo.create(&request).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

        assert_eq!(repo.count_for_venue(venue.id).await.unwrap(), 1);
    }
}
