//! # Form Types
//!
//! Typed structs for every form the service accepts, with the trim, coerce,
//! and parse rules applied before anything touches the database. Validation
//! returns the repository-level submission on success or the collected field
//! errors for re-display.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Deserialize;

use crate::models::{artist, venue};
use crate::repositories::{ArtistSubmission, CreateShowRequest, VenueSubmission};

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-?\d{3}-?\d{4}$").expect("phone pattern"));

/// Field-level validation failures collected while checking a form.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    entries: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.entries.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

/// Trim a free-text field, mapping the empty result to `None`.
fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// The seeking radio submits "Yes" or "No"; anything but "Yes" is false.
fn yes_no(value: &str) -> bool {
    value.trim() == "Yes"
}

/// Split a comma-delimited genre field into distinct trimmed tags, keeping
/// submission order.
pub fn split_genres(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',') {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|seen| seen == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Parse a start time in the `datetime-local` widget format or the plain
/// space-separated form, with or without seconds.
pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    None
}

/// Format a bare 10-digit phone number as `XXX-XXX-XXXX` for display.
/// Anything else renders untouched.
pub fn format_phone(raw: &str) -> String {
    if raw.len() == 10 && raw.chars().all(|c| c.is_ascii_digit()) {
        format!("{}-{}-{}", &raw[..3], &raw[3..6], &raw[6..])
    } else {
        raw.to_string()
    }
}

fn validate_phone(errors: &mut ValidationErrors, phone: &str) -> Option<String> {
    match optional(phone) {
        None => None,
        Some(value) => {
            if PHONE_PATTERN.is_match(&value) {
                Some(value)
            } else {
                errors.add("phone", "Phone must be a 10-digit number.");
                None
            }
        }
    }
}

fn validate_state(errors: &mut ValidationErrors, state: &str) -> String {
    let state = state.trim();
    if state.len() != 2 || !state.chars().all(|c| c.is_ascii_uppercase()) {
        errors.add("state", "State must be a two-letter code.");
    }
    state.to_string()
}

/// Raw venue form fields. Doubles as the value set echoed back into the form
/// when validation fails or when the edit page pre-fills.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VenueForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub image_link: String,
    #[serde(default)]
    pub facebook_link: String,
    #[serde(default)]
    pub website_link: String,
    #[serde(default)]
    pub seeking_talent: String,
    #[serde(default)]
    pub seeking_description: String,
}

impl VenueForm {
    /// Rebuild form values from a persisted venue for the edit page; the
    /// stored genre set is joined back into the delimited field.
    pub fn from_model(venue: &venue::Model, genres: &[String]) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone().unwrap_or_default(),
            genres: genres.join(", "),
            image_link: venue.image_link.clone().unwrap_or_default(),
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            website_link: venue.website_link.clone().unwrap_or_default(),
            seeking_talent: if venue.seeking_talent { "Yes" } else { "No" }.to_string(),
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<VenueSubmission, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.add("name", "Name is required.");
        }
        let city = self.city.trim().to_string();
        if city.is_empty() {
            errors.add("city", "City is required.");
        }
        let state = validate_state(&mut errors, &self.state);
        let address = self.address.trim().to_string();
        if address.is_empty() {
            errors.add("address", "Address is required.");
        }
        let genres = split_genres(&self.genres);
        if genres.is_empty() {
            errors.add("genres", "At least one genre is required.");
        }
        let phone = validate_phone(&mut errors, &self.phone);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(VenueSubmission {
            name,
            city,
            state,
            address,
            phone,
            image_link: optional(&self.image_link),
            facebook_link: optional(&self.facebook_link),
            website_link: optional(&self.website_link),
            seeking_talent: yes_no(&self.seeking_talent),
            seeking_description: optional(&self.seeking_description),
            genres,
        })
    }
}

/// Raw artist form fields; same conventions as [`VenueForm`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub image_link: String,
    #[serde(default)]
    pub facebook_link: String,
    #[serde(default)]
    pub website_link: String,
    #[serde(default)]
    pub seeking_venue: String,
    #[serde(default)]
    pub seeking_description: String,
}

impl ArtistForm {
    pub fn from_model(artist: &artist::Model, genres: &[String]) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone().unwrap_or_default(),
            genres: genres.join(", "),
            image_link: artist.image_link.clone().unwrap_or_default(),
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            website_link: artist.website_link.clone().unwrap_or_default(),
            seeking_venue: if artist.seeking_venue { "Yes" } else { "No" }.to_string(),
            seeking_description: artist.seeking_description.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ArtistSubmission, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.add("name", "Name is required.");
        }
        let city = self.city.trim().to_string();
        if city.is_empty() {
            errors.add("city", "City is required.");
        }
        let state = validate_state(&mut errors, &self.state);
        let genres = split_genres(&self.genres);
        if genres.is_empty() {
            errors.add("genres", "At least one genre is required.");
        }
        let phone = validate_phone(&mut errors, &self.phone);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ArtistSubmission {
            name,
            city,
            state,
            phone,
            image_link: optional(&self.image_link),
            facebook_link: optional(&self.facebook_link),
            website_link: optional(&self.website_link),
            seeking_venue: yes_no(&self.seeking_venue),
            seeking_description: optional(&self.seeking_description),
            genres,
        })
    }
}

/// Raw show form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowForm {
    #[serde(default)]
    pub artist_id: String,
    #[serde(default)]
    pub venue_id: String,
    #[serde(default)]
    pub start_time: String,
}

impl ShowForm {
    pub fn validate(&self) -> Result<CreateShowRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let artist_id = match self.artist_id.trim().parse::<i32>() {
            Ok(id) => id,
            Err(_) => {
                errors.add("artist_id", "Artist ID must be a number.");
                0
            }
        };
        let venue_id = match self.venue_id.trim().parse::<i32>() {
            Ok(id) => id,
            Err(_) => {
                errors.add("venue_id", "Venue ID must be a number.");
                0
            }
        };
        let start_time = match parse_start_time(&self.start_time) {
            Some(start) => start,
            None => {
                errors.add("start_time", "Start time must be a valid date and time.");
                NaiveDateTime::default()
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CreateShowRequest {
            venue_id,
            artist_id,
            start_time,
        })
    }
}
