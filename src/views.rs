//! Server-rendered HTML pages
//!
//! No template engine; pages are assembled from escaped strings the same
//! way the service renders every other inline page. Each public function
//! returns a complete document.

use crate::db::artists::Artist;
use crate::db::shows::{CounterpartShow, ShowListing};
use crate::db::venues::{Venue, VenueSummary};
use crate::forms::{ArtistForm, ShowForm, VenueForm, GENRES, STATES};

/// Flashed page banner.
#[derive(Debug, Clone)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// One error flash per validation message.
    pub fn from_errors(errors: &[String]) -> Vec<Flash> {
        errors.iter().map(Flash::error).collect()
    }
}

/// Escape text for HTML element and attribute context.
fn esc(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = r#"
body { font-family: system-ui, -apple-system, sans-serif; max-width: 860px;
       margin: 40px auto; padding: 0 20px; line-height: 1.6; color: #333; }
h1 { border-bottom: 2px solid #f55; padding-bottom: 10px; }
nav a { margin-right: 14px; color: #f55; text-decoration: none; font-weight: 600; }
.flash { padding: 10px 14px; border-radius: 4px; margin: 10px 0; }
.flash.success { background: #e6f6e6; border: 1px solid #3a3; }
.flash.error { background: #fbe7e7; border: 1px solid #c33; }
.badge { display: inline-block; background: #eee; border-radius: 10px;
         padding: 2px 10px; margin: 2px; font-size: 0.9em; }
ul.listing { list-style: none; padding: 0; }
ul.listing li { padding: 6px 0; border-bottom: 1px solid #eee; }
form label { display: block; margin-top: 12px; font-weight: 600; }
form input[type=text], form select { width: 100%; padding: 6px; }
.genre-options label { display: inline-block; font-weight: 400; margin-right: 12px; }
button, .button { background: #f55; color: white; border: none; padding: 10px 20px;
                  border-radius: 4px; margin-top: 16px; cursor: pointer;
                  text-decoration: none; display: inline-block; }
img.thumb { max-height: 60px; vertical-align: middle; margin-right: 8px; }
"#;

fn layout(title: &str, flashes: &[Flash], body: &str) -> String {
    let flash_html: String = flashes
        .iter()
        .map(|flash| {
            let class = match flash.kind {
                FlashKind::Success => "success",
                FlashKind::Error => "error",
            };
            format!(
                "<div class=\"flash {class}\">{}</div>\n",
                esc(&flash.message)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title} - Encore</title>
<style>{STYLE}</style>
</head>
<body>
<nav>
  <a href="/">Encore</a>
  <a href="/venues">Venues</a>
  <a href="/artists">Artists</a>
  <a href="/shows/shows">Shows</a>
  <a href="/venues/create">List a venue</a>
  <a href="/artists/create">List an artist</a>
  <a href="/shows/create">List a show</a>
</nav>
{flash_html}{body}
</body>
</html>
"#,
        title = esc(title),
    )
}

pub fn home_page(flashes: &[Flash]) -> String {
    layout(
        "Home",
        flashes,
        r#"<h1>Encore</h1>
<p>Find and book shows: browse venues and artists, or list your own.</p>
<p>
  <a href="/venues" class="button">Find a venue</a>
  <a href="/artists" class="button">Find an artist</a>
  <a href="/shows/shows" class="button">Upcoming shows</a>
</p>"#,
    )
}

pub fn not_found_page(what: &str) -> String {
    let body = format!(
        "<h1>Not found</h1>\n<p>{} could not be found.</p>\n\
         <p><a href=\"/\" class=\"button\">Back home</a></p>",
        esc(what)
    );
    layout("Not found", &[], &body)
}

pub fn server_error_page() -> String {
    layout(
        "Server error",
        &[],
        "<h1>Something went wrong</h1>\n\
         <p>An internal error occurred. Please try again.</p>\n\
         <p><a href=\"/\" class=\"button\">Back home</a></p>",
    )
}

// ---------------------------------------------------------------------------
// Artists
// ---------------------------------------------------------------------------

pub fn artists_page(artists: &[Artist]) -> String {
    let mut body = String::from("<h1>Artists</h1>\n<ul class=\"listing\">\n");
    for artist in artists {
        body.push_str(&format!(
            "<li><a href=\"/artists/{}\">{}</a> &mdash; {}, {}</li>\n",
            artist.id,
            esc(&artist.name),
            esc(&artist.city),
            esc(&artist.state),
        ));
    }
    body.push_str("</ul>\n");
    layout("Artists", &[], &body)
}

pub fn artist_search_page(term: &str, artists: &[Artist]) -> String {
    let mut body = format!(
        "<h1>Search artists</h1>\n<p>Found {} result(s) for &quot;{}&quot;</p>\n<ul class=\"listing\">\n",
        artists.len(),
        esc(term),
    );
    for artist in artists {
        body.push_str(&format!(
            "<li><a href=\"/artists/{}\">{}</a></li>\n",
            artist.id,
            esc(&artist.name),
        ));
    }
    body.push_str("</ul>\n");
    layout("Search artists", &[], &body)
}

pub fn artist_detail_page(
    artist: &Artist,
    genres: &[String],
    upcoming: &[CounterpartShow],
    past: &[CounterpartShow],
) -> String {
    let mut body = format!("<h1>{}</h1>\n", esc(&artist.name));
    body.push_str(&genre_badges(genres));
    body.push_str(&format!(
        "<p>{}, {}</p>\n",
        esc(&artist.city),
        esc(&artist.state)
    ));
    if let Some(phone) = &artist.phone {
        body.push_str(&format!("<p>Phone: {}</p>\n", esc(phone)));
    }
    body.push_str(&profile_links(
        &artist.website_link,
        &artist.facebook_link,
        &artist.image_link,
    ));
    if artist.seeking_venue {
        body.push_str("<p><strong>Currently seeking performance venues</strong></p>\n");
        if let Some(desc) = &artist.seeking_description {
            body.push_str(&format!("<p>{}</p>\n", esc(desc)));
        }
    } else {
        body.push_str("<p>Not currently seeking performance venues</p>\n");
    }
    body.push_str(&show_section("Upcoming shows", upcoming, "/venues"));
    body.push_str(&show_section("Past shows", past, "/venues"));
    body.push_str(&format!(
        "<p><a href=\"/artists/{}/edit\" class=\"button\">Edit artist</a></p>\n",
        artist.id
    ));
    layout(&artist.name, &[], &body)
}

pub fn artist_form_page(
    heading: &str,
    action: &str,
    form: &ArtistForm,
    flashes: &[Flash],
) -> String {
    let mut body = format!("<h1>{}</h1>\n<form method=\"post\" action=\"{action}\">\n", esc(heading));
    body.push_str(&text_input("name", "Name", &form.name));
    body.push_str(&text_input("city", "City", &form.city));
    body.push_str(&state_select(&form.state));
    body.push_str(&text_input("phone", "Phone", &form.phone));
    body.push_str(&genre_checkboxes(&form.genres));
    body.push_str(&text_input("image_link", "Image link", &form.image_link));
    body.push_str(&text_input("facebook_link", "Facebook link", &form.facebook_link));
    body.push_str(&text_input("website_link", "Website link", &form.website_link));
    body.push_str(&checkbox(
        "seeking_venue",
        "Looking for venues to play at",
        form.seeking_venue,
    ));
    body.push_str(&text_input(
        "seeking_description",
        "Seeking description",
        &form.seeking_description,
    ));
    body.push_str("<button type=\"submit\">Save artist</button>\n</form>\n");
    layout(heading, flashes, &body)
}

// ---------------------------------------------------------------------------
// Venues
// ---------------------------------------------------------------------------

/// Display-only grouping of venues by (city, state).
#[derive(Debug)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// Fold an area-ordered venue list into display groups.
pub fn group_by_area(venues: Vec<VenueSummary>) -> Vec<Area> {
    let mut areas: Vec<Area> = Vec::new();
    for venue in venues {
        match areas
            .last_mut()
            .filter(|area| area.city == venue.city && area.state == venue.state)
        {
            Some(area) => area.venues.push(venue),
            None => areas.push(Area {
                city: venue.city.clone(),
                state: venue.state.clone(),
                venues: vec![venue],
            }),
        }
    }
    areas
}

pub fn venues_page(areas: &[Area]) -> String {
    let mut body = String::from("<h1>Venues</h1>\n");
    for area in areas {
        body.push_str(&format!(
            "<h2>{}, {}</h2>\n<ul class=\"listing\">\n",
            esc(&area.city),
            esc(&area.state)
        ));
        for venue in &area.venues {
            body.push_str(&format!(
                "<li><a href=\"/venues/{}\">{}</a> ({} upcoming)</li>\n",
                venue.id,
                esc(&venue.name),
                venue.num_upcoming_shows,
            ));
        }
        body.push_str("</ul>\n");
    }
    layout("Venues", &[], &body)
}

pub fn venue_search_page(term: &str, venues: &[Venue]) -> String {
    let mut body = format!(
        "<h1>Search venues</h1>\n<p>Found {} result(s) for &quot;{}&quot;</p>\n<ul class=\"listing\">\n",
        venues.len(),
        esc(term),
    );
    for venue in venues {
        body.push_str(&format!(
            "<li><a href=\"/venues/{}\">{}</a></li>\n",
            venue.id,
            esc(&venue.name),
        ));
    }
    body.push_str("</ul>\n");
    layout("Search venues", &[], &body)
}

pub fn venue_detail_page(
    venue: &Venue,
    genres: &[String],
    upcoming: &[CounterpartShow],
    past: &[CounterpartShow],
) -> String {
    let mut body = format!("<h1>{}</h1>\n", esc(&venue.name));
    body.push_str(&genre_badges(genres));
    body.push_str(&format!(
        "<p>{}, {}, {}</p>\n",
        esc(&venue.address),
        esc(&venue.city),
        esc(&venue.state)
    ));
    if let Some(phone) = &venue.phone {
        body.push_str(&format!("<p>Phone: {}</p>\n", esc(phone)));
    }
    body.push_str(&profile_links(
        &venue.website_link,
        &venue.facebook_link,
        &venue.image_link,
    ));
    if venue.seeking_talent {
        body.push_str("<p><strong>Currently seeking talent</strong></p>\n");
        if let Some(desc) = &venue.seeking_description {
            body.push_str(&format!("<p>{}</p>\n", esc(desc)));
        }
    } else {
        body.push_str("<p>Not currently seeking talent</p>\n");
    }
    body.push_str(&show_section("Upcoming shows", upcoming, "/artists"));
    body.push_str(&show_section("Past shows", past, "/artists"));
    body.push_str(&format!(
        "<p><a href=\"/venues/{id}/edit\" class=\"button\">Edit venue</a>\n\
         <button onclick=\"deleteVenue()\">Delete venue</button></p>\n\
         <script>\n\
         function deleteVenue() {{\n\
           fetch('/venues/{id}', {{ method: 'DELETE' }})\n\
             .then(() => window.location.href = '/');\n\
         }}\n\
         </script>\n",
        id = venue.id
    ));
    layout(&venue.name, &[], &body)
}

pub fn venue_form_page(
    heading: &str,
    action: &str,
    form: &VenueForm,
    flashes: &[Flash],
) -> String {
    let mut body = format!("<h1>{}</h1>\n<form method=\"post\" action=\"{action}\">\n", esc(heading));
    body.push_str(&text_input("name", "Name", &form.name));
    body.push_str(&text_input("city", "City", &form.city));
    body.push_str(&state_select(&form.state));
    body.push_str(&text_input("address", "Address", &form.address));
    body.push_str(&text_input("phone", "Phone", &form.phone));
    body.push_str(&genre_checkboxes(&form.genres));
    body.push_str(&text_input("image_link", "Image link", &form.image_link));
    body.push_str(&text_input("facebook_link", "Facebook link", &form.facebook_link));
    body.push_str(&text_input("website_link", "Website link", &form.website_link));
    body.push_str(&checkbox(
        "seeking_talent",
        "Looking for talent to book",
        form.seeking_talent,
    ));
    body.push_str(&text_input(
        "seeking_description",
        "Seeking description",
        &form.seeking_description,
    ));
    body.push_str("<button type=\"submit\">Save venue</button>\n</form>\n");
    layout(heading, flashes, &body)
}

// ---------------------------------------------------------------------------
// Shows
// ---------------------------------------------------------------------------

pub fn shows_page(shows: &[ShowListing]) -> String {
    let mut body = String::from("<h1>Shows</h1>\n<ul class=\"listing\">\n");
    for show in shows {
        if let Some(image) = &show.artist_image_link {
            body.push_str(&format!(
                "<li><img class=\"thumb\" src=\"{}\" alt=\"\">",
                esc(image)
            ));
        } else {
            body.push_str("<li>");
        }
        body.push_str(&format!(
            "<a href=\"/artists/{}\">{}</a> at <a href=\"/venues/{}\">{}</a> &mdash; {}</li>\n",
            show.artist_id,
            esc(&show.artist_name),
            show.venue_id,
            esc(&show.venue_name),
            esc(&show.start_time),
        ));
    }
    body.push_str("</ul>\n");
    layout("Shows", &[], &body)
}

pub fn show_form_page(form: &ShowForm, flashes: &[Flash]) -> String {
    let mut body = String::from("<h1>List a show</h1>\n<form method=\"post\" action=\"/shows/create\">\n");
    body.push_str(&text_input("artist_id", "Artist ID", &form.artist_id));
    body.push_str(&text_input("venue_id", "Venue ID", &form.venue_id));
    body.push_str(&text_input(
        "start_time",
        "Start time (YYYY-MM-DD HH:MM:SS)",
        &form.start_time,
    ));
    body.push_str("<button type=\"submit\">Create show</button>\n</form>\n");
    layout("List a show", flashes, &body)
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

fn text_input(name: &str, label: &str, value: &str) -> String {
    format!(
        "<label for=\"{name}\">{label}</label>\n\
         <input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\">\n",
        esc(value)
    )
}

fn checkbox(name: &str, label: &str, checked: bool) -> String {
    let checked_attr = if checked { " checked" } else { "" };
    format!(
        "<label class=\"genre-options\">\
         <input type=\"checkbox\" name=\"{name}\" value=\"y\"{checked_attr}> {label}</label>\n"
    )
}

fn state_select(selected: &str) -> String {
    let mut html = String::from(
        "<label for=\"state\">State</label>\n<select id=\"state\" name=\"state\">\n\
         <option value=\"\">Select a state</option>\n",
    );
    for state in STATES {
        let selected_attr = if *state == selected { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{state}\"{selected_attr}>{state}</option>\n"
        ));
    }
    html.push_str("</select>\n");
    html
}

fn genre_checkboxes(selected: &[String]) -> String {
    let mut html = String::from("<label>Genres</label>\n<div class=\"genre-options\">\n");
    for genre in GENRES {
        let checked = if selected.iter().any(|g| g == genre) {
            " checked"
        } else {
            ""
        };
        html.push_str(&format!(
            "<label><input type=\"checkbox\" name=\"genres\" value=\"{}\"{checked}> {}</label>\n",
            esc(genre),
            esc(genre),
        ));
    }
    html.push_str("</div>\n");
    html
}

fn genre_badges(genres: &[String]) -> String {
    let mut html = String::from("<p>");
    for genre in genres {
        html.push_str(&format!("<span class=\"badge\">{}</span>", esc(genre)));
    }
    html.push_str("</p>\n");
    html
}

fn profile_links(
    website: &Option<String>,
    facebook: &Option<String>,
    image: &Option<String>,
) -> String {
    let mut html = String::new();
    if let Some(image) = image {
        html.push_str(&format!(
            "<p><img class=\"thumb\" src=\"{}\" alt=\"\"></p>\n",
            esc(image)
        ));
    }
    if let Some(website) = website {
        html.push_str(&format!(
            "<p>Website: <a href=\"{0}\">{0}</a></p>\n",
            esc(website)
        ));
    }
    if let Some(facebook) = facebook {
        html.push_str(&format!(
            "<p>Facebook: <a href=\"{0}\">{0}</a></p>\n",
            esc(facebook)
        ));
    }
    html
}

fn show_section(heading: &str, shows: &[CounterpartShow], link_prefix: &str) -> String {
    let mut html = format!("<h2>{heading} ({})</h2>\n", shows.len());
    if shows.is_empty() {
        html.push_str("<p>No shows.</p>\n");
        return html;
    }
    html.push_str("<ul class=\"listing\">\n");
    for show in shows {
        if let Some(image) = &show.counterpart_image_link {
            html.push_str(&format!(
                "<li><img class=\"thumb\" src=\"{}\" alt=\"\">",
                esc(image)
            ));
        } else {
            html.push_str("<li>");
        }
        html.push_str(&format!(
            "<a href=\"{link_prefix}/{}\">{}</a> &mdash; {}</li>\n",
            show.counterpart_id,
            esc(&show.counterpart_name),
            esc(&show.start_time),
        ));
    }
    html.push_str("</ul>\n");
    html
}
