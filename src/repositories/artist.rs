//! # Artist Repository

use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};

use crate::error::AppError;
use crate::models::artist::{self, Entity as Artist};
use crate::repositories::GenreRepository;

/// Validated artist data as submitted through the create or edit form.
#[derive(Debug, Clone)]
pub struct ArtistSubmission {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub genres: Vec<String>,
}

/// Repository for artist database operations.
pub struct ArtistRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ArtistRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// All artists, alphabetical by name.
    pub async fn list_alphabetical(&self) -> Result<Vec<artist::Model>, AppError> {
        let artists = Artist::find()
            .order_by_asc(artist::Column::Name)
            .all(self.conn)
            .await?;
        Ok(artists)
    }

    /// Case-insensitive substring match on the artist name. An empty term
    /// matches every row.
    pub async fn search_by_name(&self, term: &str) -> Result<Vec<artist::Model>, AppError> {
        let pattern = format!("%{}%", term.to_lowercase());
        let artists = Artist::find()
            .filter(Expr::expr(Func::lower(Expr::col(artist::Column::Name))).like(pattern))
            .all(self.conn)
            .await?;
        Ok(artists)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<artist::Model>, AppError> {
        let artist = Artist::find_by_id(id).one(self.conn).await?;
        Ok(artist)
    }

    /// Insert an artist and link its genre set. Run inside a transaction.
    pub async fn create(&self, submission: &ArtistSubmission) -> Result<artist::Model, AppError> {
        let artist = artist::ActiveModel {
            name: Set(submission.name.clone()),
            city: Set(submission.city.clone()),
            state: Set(submission.state.clone()),
            phone: Set(submission.phone.clone()),
            image_link: Set(submission.image_link.clone()),
            facebook_link: Set(submission.facebook_link.clone()),
            website_link: Set(submission.website_link.clone()),
            seeking_venue: Set(submission.seeking_venue),
            seeking_description: Set(submission.seeking_description.clone()),
            ..Default::default()
        };
        let artist = artist.insert(self.conn).await?;

        GenreRepository::new(self.conn)
            .set_artist_genres(artist.id, &submission.genres)
            .await?;

        Ok(artist)
    }

    /// Overwrite every mutable field of an existing artist, including its
    /// genre links. Run inside a transaction.
    pub async fn update(
        &self,
        id: i32,
        submission: &ArtistSubmission,
    ) -> Result<artist::Model, AppError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Artist {id} does not exist.")))?;

        let mut artist = existing.into_active_model();
        artist.name = Set(submission.name.clone());
        artist.city = Set(submission.city.clone());
        artist.state = Set(submission.state.clone());
        artist.phone = Set(submission.phone.clone());
        artist.image_link = Set(submission.image_link.clone());
        artist.facebook_link = Set(submission.facebook_link.clone());
        artist.website_link = Set(submission.website_link.clone());
        artist.seeking_venue = Set(submission.seeking_venue);
        artist.seeking_description = Set(submission.seeking_description.clone());
        let artist = artist.update(self.conn).await?;

        GenreRepository::new(self.conn)
            .set_artist_genres(artist.id, &submission.genres)
            .await?;

        Ok(artist)
    }
}
