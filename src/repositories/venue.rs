//! # Venue Repository
//!
//! CRUD operations for venues. Multi-statement writes (the venue row plus its
//! genre links) expect to run inside a transaction supplied by the caller;
//! every method takes whatever connection the repository was built with.

use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::error::AppError;
use crate::models::venue::{self, Entity as Venue};
use crate::repositories::GenreRepository;

/// Validated venue data as submitted through the create or edit form.
#[derive(Debug, Clone)]
pub struct VenueSubmission {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub genres: Vec<String>,
}

/// Repository for venue database operations.
pub struct VenueRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> VenueRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// All venues ordered by (state, city, name); the grouped listing relies
    /// on this ordering to form its (city, state) runs.
    pub async fn list_all(&self) -> Result<Vec<venue::Model>, AppError> {
        let venues = Venue::find()
            .order_by_asc(venue::Column::State)
            .order_by_asc(venue::Column::City)
            .order_by_asc(venue::Column::Name)
            .all(self.conn)
            .await?;
        Ok(venues)
    }

    /// Case-insensitive substring match on the venue name. An empty term
    /// matches every row.
    pub async fn search_by_name(&self, term: &str) -> Result<Vec<venue::Model>, AppError> {
        let pattern = format!("%{}%", term.to_lowercase());
        let venues = Venue::find()
            .filter(Expr::expr(Func::lower(Expr::col(venue::Column::Name))).like(pattern))
            .all(self.conn)
            .await?;
        Ok(venues)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<venue::Model>, AppError> {
        let venue = Venue::find_by_id(id).one(self.conn).await?;
        Ok(venue)
    }

    /// Insert a venue and link its genre set. Run inside a transaction: the
    /// genre rows and junction rows must land or roll back with the venue.
    pub async fn create(&self, submission: &VenueSubmission) -> Result<venue::Model, AppError> {
        let venue = venue::ActiveModel {
            name: Set(submission.name.clone()),
            city: Set(submission.city.clone()),
            state: Set(submission.state.clone()),
            address: Set(submission.address.clone()),
            phone: Set(submission.phone.clone()),
            image_link: Set(submission.image_link.clone()),
            facebook_link: Set(submission.facebook_link.clone()),
            website_link: Set(submission.website_link.clone()),
            seeking_talent: Set(submission.seeking_talent),
            seeking_description: Set(submission.seeking_description.clone()),
            ..Default::default()
        };
        let venue = venue.insert(self.conn).await?;

        GenreRepository::new(self.conn)
            .set_venue_genres(venue.id, &submission.genres)
            .await?;

        Ok(venue)
    }

    /// Overwrite every mutable field of an existing venue, including its
    /// genre links. Run inside a transaction.
    pub async fn update(
        &self,
        id: i32,
        submission: &VenueSubmission,
    ) -> Result<venue::Model, AppError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venue {id} does not exist.")))?;

        let mut venue = existing.into_active_model();
        venue.name = Set(submission.name.clone());
        venue.city = Set(submission.city.clone());
        venue.state = Set(submission.state.clone());
        venue.address = Set(submission.address.clone());
        venue.phone = Set(submission.phone.clone());
        venue.image_link = Set(submission.image_link.clone());
        venue.facebook_link = Set(submission.facebook_link.clone());
        venue.website_link = Set(submission.website_link.clone());
        venue.seeking_talent = Set(submission.seeking_talent);
        venue.seeking_description = Set(submission.seeking_description.clone());
        let venue = venue.update(self.conn).await?;

        GenreRepository::new(self.conn)
            .set_venue_genres(venue.id, &submission.genres)
            .await?;

        Ok(venue)
    }

    /// Delete a venue. Genre links cascade; shows do not; the caller checks
    /// for booked shows first, and the RESTRICT foreign key backs that up.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let venue = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venue {id} does not exist.")))?;

        venue.delete(self.conn).await?;
        Ok(())
    }
}
