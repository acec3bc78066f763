//! Show resource handlers
//!
//! Show creation enforces the booking rules: both parties must exist,
//! both must currently be open to bookings, and the start time must not
//! be in the past.

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tracing::{error, info};

use crate::db::{artists, shows, venues};
use crate::error::AppResult;
use crate::forms::{parse_start_time, FormData, ShowForm};
use crate::views::{self, Flash};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        // Kept for compatibility with the original URL space
        .route("/shows", get(list))
        .route("/create", get(create_form).post(create_submit))
}

/// GET /shows/shows
async fn list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let shows = shows::list_shows(&state.db).await?;
    Ok(Html(views::shows_page(&shows)))
}

/// GET /shows/create
async fn create_form() -> Html<String> {
    Html(views::show_form_page(&ShowForm::default(), &[]))
}

/// POST /shows/create
async fn create_submit(State(state): State<AppState>, body: String) -> AppResult<Html<String>> {
    let form = ShowForm::from_request(&FormData::parse(&body));

    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(Html(views::show_form_page(&form, &Flash::from_errors(&errors))));
    }

    // validate() already vetted these; the else arm is unreachable
    let (Some(artist_id), Some(venue_id), Some(start_time)) = (
        form.artist_id.parse::<i64>().ok(),
        form.venue_id.parse::<i64>().ok(),
        parse_start_time(&form.start_time),
    ) else {
        return Ok(reject(&form, "Invalid show submission."));
    };

    let Some(artist) = artists::get_artist(&state.db, artist_id).await? else {
        return Ok(reject(&form, format!("Unable to find artist with ID: {artist_id}")));
    };
    let Some(venue) = venues::get_venue(&state.db, venue_id).await? else {
        return Ok(reject(&form, format!("Unable to find venue with ID: {venue_id}")));
    };

    if !artist.seeking_venue {
        return Ok(reject(&form, "Artist is not accepting shows at the moment."));
    }
    if !venue.seeking_talent {
        return Ok(reject(&form, "Venue is not accepting shows at the moment."));
    }

    match shows::create_show(&state.db, artist_id, venue_id, start_time).await {
        Ok(id) => {
            info!("Created show {id}: artist {artist_id} at venue {venue_id}");
            Ok(Html(views::home_page(&[Flash::success(
                "Show was successfully listed!",
            )])))
        }
        Err(err) => {
            error!("Failed to create show: {err}");
            Ok(reject(&form, "An error occurred. Show could not be listed."))
        }
    }
}

fn reject(form: &ShowForm, message: impl Into<String>) -> Html<String> {
    Html(views::show_form_page(form, &[Flash::error(message)]))
}
