//! # Views
//!
//! The rendering collaborator: plain functions that turn the handlers' view
//! models into HTML pages. Markup is deliberately spartan; the data shaping
//! in the handlers is the contract, this module just prints it.

use axum::http::StatusCode;

use crate::handlers::artists::{ArtistDetail, ArtistSummary};
use crate::handlers::forms::{ArtistForm, ShowForm, ValidationErrors, VenueForm};
use crate::handlers::venues::{VenueArea, VenueDetail};
use crate::handlers::SearchResults;
use crate::repositories::show::{BookedArtist, BookedVenue, ShowListing};

/// Escape text for interpolation into HTML body or attribute positions.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>{title} | Bandstand</title></head>\n\
         <body>\n\
         <nav>\n\
         <a href=\"/\">Home</a>\n\
         <a href=\"/venues\">Venues</a>\n\
         <a href=\"/artists\">Artists</a>\n\
         <a href=\"/shows\">Shows</a>\n\
         </nav>\n\
         <main>\n{body}</main>\n\
         </body>\n\
         </html>\n",
        title = escape(title),
        body = body,
    )
}

fn format_when(start: &chrono::NaiveDateTime) -> String {
    start.format("%Y-%m-%d %H:%M").to_string()
}

fn optional_row(label: &str, value: &Option<String>) -> String {
    match value {
        Some(value) => format!("<li>{}: {}</li>\n", escape(label), escape(value)),
        None => String::new(),
    }
}

fn error_list(errors: &ValidationErrors) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ul class=\"errors\">\n");
    for (field, message) in errors.iter() {
        out.push_str(&format!(
            "<li data-field=\"{}\">{}</li>\n",
            escape(field),
            escape(message)
        ));
    }
    out.push_str("</ul>\n");
    out
}

fn text_input(label: &str, name: &str, value: &str) -> String {
    format!(
        "<label>{label} <input type=\"text\" name=\"{name}\" value=\"{value}\"></label><br>\n",
        label = escape(label),
        name = name,
        value = escape(value),
    )
}

fn seeking_radio(name: &str, label: &str, current: &str) -> String {
    let yes = if current.trim() == "Yes" { " checked" } else { "" };
    let no = if current.trim() == "Yes" { "" } else { " checked" };
    format!(
        "<fieldset><legend>{label}</legend>\n\
         <label><input type=\"radio\" name=\"{name}\" value=\"Yes\"{yes}> Yes</label>\n\
         <label><input type=\"radio\" name=\"{name}\" value=\"No\"{no}> No</label>\n\
         </fieldset>\n",
        label = escape(label),
    )
}

pub fn home_page() -> String {
    layout(
        "Home",
        "<h1>Bandstand</h1>\n\
         <p>Find venues, artists, and shows near you.</p>\n\
         <ul>\n\
         <li><a href=\"/venues/create\">List a venue</a></li>\n\
         <li><a href=\"/artists/create\">List an artist</a></li>\n\
         <li><a href=\"/shows/create\">Book a show</a></li>\n\
         </ul>\n",
    )
}

pub fn venues_page(areas: &[VenueArea]) -> String {
    let mut body = String::from("<h1>Venues</h1>\n");
    for area in areas {
        body.push_str(&format!(
            "<h2>{}, {}</h2>\n<ul>\n",
            escape(&area.city),
            escape(&area.state)
        ));
        for venue in &area.venues {
            body.push_str(&format!(
                "<li><a href=\"/venues/{}\">{}</a> ({} upcoming)</li>\n",
                venue.id,
                escape(&venue.name),
                venue.num_upcoming_shows
            ));
        }
        body.push_str("</ul>\n");
    }
    layout("Venues", &body)
}

pub fn artists_page(artists: &[ArtistSummary]) -> String {
    let mut body = String::from("<h1>Artists</h1>\n<ul>\n");
    for artist in artists {
        body.push_str(&format!(
            "<li><a href=\"/artists/{}\">{}</a></li>\n",
            artist.id,
            escape(&artist.name)
        ));
    }
    body.push_str("</ul>\n");
    layout("Artists", &body)
}

/// Shared results page for venue and artist search. `base_path` is the
/// listing prefix the match links use.
pub fn search_page(heading: &str, base_path: &str, term: &str, results: &SearchResults) -> String {
    let mut body = format!(
        "<h1>{heading}</h1>\n\
         <p>Found {count} result(s) for \"{term}\".</p>\n<ul>\n",
        heading = escape(heading),
        count = results.count,
        term = escape(term),
    );
    for found in &results.matches {
        body.push_str(&format!(
            "<li><a href=\"{}/{}\">{}</a> ({} upcoming)</li>\n",
            base_path,
            found.id,
            escape(&found.name),
            found.num_upcoming_shows
        ));
    }
    body.push_str("</ul>\n");
    layout(heading, &body)
}

fn thumbnail(image_link: &Option<String>) -> String {
    match image_link {
        Some(link) => format!("<img src=\"{}\" alt=\"\" width=\"50\"> ", escape(link)),
        None => String::new(),
    }
}

fn booked_artist_list(heading: &str, shows: &[BookedArtist], count: usize) -> String {
    let mut out = format!("<h2>{} ({})</h2>\n<ul>\n", escape(heading), count);
    for show in shows {
        out.push_str(&format!(
            "<li>{}<a href=\"/artists/{}\">{}</a> at {}</li>\n",
            thumbnail(&show.artist_image_link),
            show.artist_id,
            escape(&show.artist_name),
            format_when(&show.start_time)
        ));
    }
    out.push_str("</ul>\n");
    out
}

fn booked_venue_list(heading: &str, shows: &[BookedVenue], count: usize) -> String {
    let mut out = format!("<h2>{} ({})</h2>\n<ul>\n", escape(heading), count);
    for show in shows {
        out.push_str(&format!(
            "<li>{}<a href=\"/venues/{}\">{}</a> at {}</li>\n",
            thumbnail(&show.venue_image_link),
            show.venue_id,
            escape(&show.venue_name),
            format_when(&show.start_time)
        ));
    }
    out.push_str("</ul>\n");
    out
}

pub fn venue_detail_page(venue: &VenueDetail) -> String {
    let mut body = format!("<h1>{}</h1>\n<ul>\n", escape(&venue.name));
    body.push_str(&format!(
        "<li>Genres: {}</li>\n",
        escape(&venue.genres.join(", "))
    ));
    body.push_str(&format!(
        "<li>Location: {}, {}, {}</li>\n",
        escape(&venue.address),
        escape(&venue.city),
        escape(&venue.state)
    ));
    body.push_str(&optional_row("Phone", &venue.phone));
    body.push_str(&optional_row("Website", &venue.website_link));
    body.push_str(&optional_row("Facebook", &venue.facebook_link));
    body.push_str(&optional_row("Image", &venue.image_link));
    if venue.seeking_talent {
        body.push_str(&format!(
            "<li>Seeking talent: {}</li>\n",
            escape(venue.seeking_description.as_deref().unwrap_or("yes"))
        ));
    }
    body.push_str("</ul>\n");
    body.push_str(&booked_artist_list(
        "Upcoming shows",
        &venue.upcoming_shows,
        venue.upcoming_shows_count,
    ));
    body.push_str(&booked_artist_list(
        "Past shows",
        &venue.past_shows,
        venue.past_shows_count,
    ));
    body.push_str(&format!(
        "<p><a href=\"/venues/{}/edit\">Edit venue</a></p>\n",
        venue.id
    ));
    layout(&venue.name, &body)
}

pub fn artist_detail_page(artist: &ArtistDetail) -> String {
    let mut body = format!("<h1>{}</h1>\n<ul>\n", escape(&artist.name));
    body.push_str(&format!(
        "<li>Genres: {}</li>\n",
        escape(&artist.genres.join(", "))
    ));
    body.push_str(&format!(
        "<li>Location: {}, {}</li>\n",
        escape(&artist.city),
        escape(&artist.state)
    ));
    body.push_str(&optional_row("Phone", &artist.phone));
    body.push_str(&optional_row("Website", &artist.website_link));
    body.push_str(&optional_row("Facebook", &artist.facebook_link));
    body.push_str(&optional_row("Image", &artist.image_link));
    if artist.seeking_venue {
        body.push_str(&format!(
            "<li>Seeking a venue: {}</li>\n",
            escape(artist.seeking_description.as_deref().unwrap_or("yes"))
        ));
    }
    body.push_str("</ul>\n");
    body.push_str(&booked_venue_list(
        "Upcoming shows",
        &artist.upcoming_shows,
        artist.upcoming_shows_count,
    ));
    body.push_str(&booked_venue_list(
        "Past shows",
        &artist.past_shows,
        artist.past_shows_count,
    ));
    body.push_str(&format!(
        "<p><a href=\"/artists/{}/edit\">Edit artist</a></p>\n",
        artist.id
    ));
    layout(&artist.name, &body)
}

pub fn shows_page(shows: &[ShowListing]) -> String {
    let mut body = String::from("<h1>Shows</h1>\n<ul>\n");
    for show in shows {
        body.push_str(&format!(
            "<li>{}<a href=\"/artists/{}\">{}</a> at <a href=\"/venues/{}\">{}</a>, {}</li>\n",
            thumbnail(&show.artist_image_link),
            show.artist_id,
            escape(&show.artist_name),
            show.venue_id,
            escape(&show.venue_name),
            format_when(&show.start_time)
        ));
    }
    body.push_str("</ul>\n");
    layout("Shows", &body)
}

pub fn venue_form_page(
    title: &str,
    action: &str,
    form: &VenueForm,
    errors: &ValidationErrors,
) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape(title));
    body.push_str(&error_list(errors));
    body.push_str(&format!(
        "<form method=\"post\" action=\"{}\">\n",
        escape(action)
    ));
    body.push_str(&text_input("Name", "name", &form.name));
    body.push_str(&text_input("City", "city", &form.city));
    body.push_str(&text_input("State", "state", &form.state));
    body.push_str(&text_input("Address", "address", &form.address));
    body.push_str(&text_input("Phone", "phone", &form.phone));
    body.push_str(&text_input(
        "Genres (comma separated)",
        "genres",
        &form.genres,
    ));
    body.push_str(&text_input("Image link", "image_link", &form.image_link));
    body.push_str(&text_input(
        "Facebook link",
        "facebook_link",
        &form.facebook_link,
    ));
    body.push_str(&text_input(
        "Website link",
        "website_link",
        &form.website_link,
    ));
    body.push_str(&seeking_radio(
        "seeking_talent",
        "Seeking talent?",
        &form.seeking_talent,
    ));
    body.push_str(&text_input(
        "Seeking description",
        "seeking_description",
        &form.seeking_description,
    ));
    body.push_str("<button type=\"submit\">Save</button>\n</form>\n");
    layout(title, &body)
}

pub fn artist_form_page(
    title: &str,
    action: &str,
    form: &ArtistForm,
    errors: &ValidationErrors,
) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape(title));
    body.push_str(&error_list(errors));
    body.push_str(&format!(
        "<form method=\"post\" action=\"{}\">\n",
        escape(action)
    ));
    body.push_str(&text_input("Name", "name", &form.name));
    body.push_str(&text_input("City", "city", &form.city));
    body.push_str(&text_input("State", "state", &form.state));
    body.push_str(&text_input("Phone", "phone", &form.phone));
    body.push_str(&text_input(
        "Genres (comma separated)",
        "genres",
        &form.genres,
    ));
    body.push_str(&text_input("Image link", "image_link", &form.image_link));
    body.push_str(&text_input(
        "Facebook link",
        "facebook_link",
        &form.facebook_link,
    ));
    body.push_str(&text_input(
        "Website link",
        "website_link",
        &form.website_link,
    ));
    body.push_str(&seeking_radio(
        "seeking_venue",
        "Seeking a venue?",
        &form.seeking_venue,
    ));
    body.push_str(&text_input(
        "Seeking description",
        "seeking_description",
        &form.seeking_description,
    ));
    body.push_str("<button type=\"submit\">Save</button>\n</form>\n");
    layout(title, &body)
}

pub fn show_form_page(title: &str, form: &ShowForm, errors: &ValidationErrors) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape(title));
    body.push_str(&error_list(errors));
    body.push_str("<form method=\"post\" action=\"/shows/create\">\n");
    body.push_str(&text_input("Artist ID", "artist_id", &form.artist_id));
    body.push_str(&text_input("Venue ID", "venue_id", &form.venue_id));
    body.push_str(&text_input(
        "Start time (YYYY-MM-DD HH:MM)",
        "start_time",
        &form.start_time,
    ));
    body.push_str("<button type=\"submit\">Save</button>\n</form>\n");
    layout(title, &body)
}

pub fn message_page(title: &str, message: &str) -> String {
    layout(
        title,
        &format!(
            "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back home</a></p>\n",
            escape(title),
            escape(message)
        ),
    )
}

pub fn error_page(status: StatusCode, message: &str, reference: Option<&str>) -> String {
    let heading = match status {
        StatusCode::NOT_FOUND => "Not Found",
        StatusCode::CONFLICT => "Conflict",
        StatusCode::UNPROCESSABLE_ENTITY => "Invalid Input",
        _ => "Server Error",
    };
    let mut body = format!(
        "<h1>{} {}</h1>\n<p>{}</p>\n",
        status.as_u16(),
        heading,
        escape(message)
    );
    if let Some(reference) = reference {
        body.push_str(&format!(
            "<p>Reference: <code>{}</code></p>\n",
            escape(reference)
        ));
    }
    body.push_str("<p><a href=\"/\">Back home</a></p>\n");
    layout(heading, &body)
}
