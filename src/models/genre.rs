//! Genre entity model.
//!
//! Genre names are unique; create paths resolve tags against existing rows by
//! exact (case-sensitive) name and only insert the ones that are missing.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "genres")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::venue_genre::Entity")]
    VenueGenre,
    #[sea_orm(has_many = "super::artist_genre::Entity")]
    ArtistGenre,
}

impl ActiveModelBehavior for ActiveModel {}
