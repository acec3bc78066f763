//! Form decoding and validation for artist/venue/show submissions
//!
//! Request bodies arrive urlencoded; `genres` is a multi-value field, so the
//! raw body is decoded with `url::form_urlencoded` rather than a
//! single-value extractor. Each form type captures the submitted values
//! as-is (so a failed submission can be re-rendered with input preserved)
//! and validates them into a list of user-facing messages.

use chrono::{NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Fixed genre enumeration. Any submitted genre outside this list is
/// rejected with a validation error.
pub const GENRES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

/// US state codes accepted by the state select field.
pub const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}-\d{3}-\d{4}$").expect("phone regex is valid"));

/// Timestamp format used in form submissions and database storage.
pub const TS_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Decoded urlencoded form body with multi-value access.
#[derive(Debug, Default)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn parse(body: &str) -> Self {
        let pairs = url::form_urlencoded::parse(body.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// First value for `name`, trimmed; empty string when absent.
    pub fn value(&self, name: &str) -> String {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.trim().to_string())
            .unwrap_or_default()
    }

    /// All values submitted under `name` (multi-value fields).
    pub fn values(&self, name: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// Checkbox presence: browsers omit unchecked checkboxes entirely.
    pub fn has(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }
}

pub fn is_valid_genre(genre: &str) -> bool {
    GENRES.contains(&genre)
}

pub fn is_valid_state(state: &str) -> bool {
    STATES.contains(&state)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Optional link fields must be absolute http(s) URLs when present.
pub fn is_valid_link(link: &str) -> bool {
    match Url::parse(link) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Parse a submitted timestamp. Accepts the storage format
/// (`YYYY-MM-DD HH:MM:SS`) and HTML `datetime-local` values
/// (`YYYY-MM-DDTHH:MM` with optional seconds).
pub fn parse_start_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TS_FMT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
}

fn validate_common_profile(
    state: &str,
    phone: &str,
    genres: &[String],
    links: [(&str, &str); 3],
    errors: &mut Vec<String>,
) {
    if !state.is_empty() && !is_valid_state(state) {
        errors.push("Invalid state. Please select a valid state.".to_string());
    }

    if !phone.is_empty() && !is_valid_phone(phone) {
        errors.push("Invalid phone number. Please use the format 123-456-7890".to_string());
    }

    if genres.is_empty() {
        errors.push("Please select at least one genre".to_string());
    } else if genres.iter().any(|g| !is_valid_genre(g)) {
        errors.push("Invalid genre. Please select a valid genre.".to_string());
    }

    for (value, label) in links {
        if !value.is_empty() && !is_valid_link(value) {
            errors.push(format!("Please, provide a valid {label} URL"));
        }
    }
}

/// Artist create/edit form.
#[derive(Debug, Default, Clone)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

impl ArtistForm {
    pub fn from_request(form: &FormData) -> Self {
        Self {
            name: form.value("name"),
            city: form.value("city"),
            state: form.value("state"),
            phone: form.value("phone"),
            genres: form.values("genres"),
            image_link: form.value("image_link"),
            facebook_link: form.value("facebook_link"),
            website_link: form.value("website_link"),
            seeking_venue: form.has("seeking_venue"),
            seeking_description: form.value("seeking_description"),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push("Name is required".to_string());
        }
        if self.city.is_empty() {
            errors.push("City is required".to_string());
        }
        if self.state.is_empty() {
            errors.push("State is required".to_string());
        }

        validate_common_profile(
            &self.state,
            &self.phone,
            &self.genres,
            [
                (&self.image_link, "image"),
                (&self.facebook_link, "facebook"),
                (&self.website_link, "website"),
            ],
            &mut errors,
        );

        errors
    }
}

/// Venue create/edit form. Same rules as [`ArtistForm`] plus a required
/// street address.
#[derive(Debug, Default, Clone)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

impl VenueForm {
    pub fn from_request(form: &FormData) -> Self {
        Self {
            name: form.value("name"),
            city: form.value("city"),
            state: form.value("state"),
            address: form.value("address"),
            phone: form.value("phone"),
            genres: form.values("genres"),
            image_link: form.value("image_link"),
            facebook_link: form.value("facebook_link"),
            website_link: form.value("website_link"),
            seeking_talent: form.has("seeking_talent"),
            seeking_description: form.value("seeking_description"),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push("Name is required".to_string());
        }
        if self.city.is_empty() {
            errors.push("City is required".to_string());
        }
        if self.state.is_empty() {
            errors.push("State is required".to_string());
        }
        if self.address.is_empty() {
            errors.push("Address is required".to_string());
        }

        validate_common_profile(
            &self.state,
            &self.phone,
            &self.genres,
            [
                (&self.image_link, "image"),
                (&self.facebook_link, "facebook"),
                (&self.website_link, "website"),
            ],
            &mut errors,
        );

        errors
    }
}

/// Show creation form.
#[derive(Debug, Default, Clone)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

impl ShowForm {
    pub fn from_request(form: &FormData) -> Self {
        Self {
            artist_id: form.value("artist_id"),
            venue_id: form.value("venue_id"),
            start_time: form.value("start_time"),
        }
    }

    /// Field-level validation. Referential checks (do the artist/venue
    /// exist, are they open to bookings) happen in the handler against
    /// the database.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.artist_id.is_empty() {
            errors.push("Artist ID is required".to_string());
        } else if self.artist_id.parse::<i64>().is_err() {
            errors.push("Artist ID must be a number".to_string());
        }

        if self.venue_id.is_empty() {
            errors.push("Venue ID is required".to_string());
        } else if self.venue_id.parse::<i64>().is_err() {
            errors.push("Venue ID must be a number".to_string());
        }

        if self.start_time.is_empty() {
            errors.push("Start date is required".to_string());
        } else {
            match parse_start_time(&self.start_time) {
                Some(start) => {
                    if start < Utc::now().naive_utc() {
                        errors.push("Show time cannot be in the past.".to_string());
                    }
                }
                None => errors.push(
                    "Invalid start time. Please use the format 2035-01-01 20:00:00".to_string(),
                ),
            }
        }

        errors
    }
}
