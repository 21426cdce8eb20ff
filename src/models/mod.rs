//! # Data Models
//!
//! SeaORM entities for the Bandstand schema: venues, artists, genres, the
//! genre junction tables, and shows.

pub mod artist;
pub mod artist_genre;
pub mod genre;
pub mod show;
pub mod venue;
pub mod venue_genre;

pub use artist::Entity as Artist;
pub use artist_genre::Entity as ArtistGenre;
pub use genre::Entity as Genre;
pub use show::Entity as Show;
pub use venue::Entity as Venue;
pub use venue_genre::Entity as VenueGenre;
