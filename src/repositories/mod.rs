//! # Repository Layer
//!
//! Repositories encapsulate the SeaORM operations for each entity. They are
//! generic over [`sea_orm::ConnectionTrait`] so the same operation runs
//! against the pooled connection for reads or against an open transaction for
//! multi-statement writes.

pub mod artist;
pub mod genre;
pub mod show;
pub mod venue;

pub use artist::{ArtistRepository, ArtistSubmission};
pub use genre::GenreRepository;
pub use show::{CreateShowRequest, ShowRepository};
pub use venue::{VenueRepository, VenueSubmission};
