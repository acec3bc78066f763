//! Venue resource handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use tracing::{error, info};

use crate::db::shows::{partition_shows, shows_for_venue};
use crate::db::venues::{self, VenueFields};
use crate::error::{AppError, AppResult};
use crate::forms::{FormData, VenueForm};
use crate::views::{self, Flash};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/search", post(search))
        .route("/create", get(create_form).post(create_submit))
        .route("/:id", get(detail).delete(remove))
        .route("/:id/edit", get(edit_form).post(edit_submit))
}

fn opt(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn fields_from(form: &VenueForm) -> VenueFields {
    VenueFields {
        name: form.name.clone(),
        city: form.city.clone(),
        state: form.state.clone(),
        address: form.address.clone(),
        phone: opt(&form.phone),
        genres: form.genres.clone(),
        image_link: opt(&form.image_link),
        facebook_link: opt(&form.facebook_link),
        website_link: opt(&form.website_link),
        seeking_talent: form.seeking_talent,
        seeking_description: opt(&form.seeking_description),
    }
}

/// GET /venues, grouped into (city, state) areas
async fn list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let venues = venues::list_venues(&state.db, Utc::now().naive_utc()).await?;
    let areas = views::group_by_area(venues);
    Ok(Html(views::venues_page(&areas)))
}

/// POST /venues/search
async fn search(State(state): State<AppState>, body: String) -> AppResult<Html<String>> {
    let term = FormData::parse(&body).value("search_term");
    let venues = venues::search_venues(&state.db, &term).await?;
    Ok(Html(views::venue_search_page(&term, &venues)))
}

/// GET /venues/{id}
async fn detail(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Html<String>> {
    let venue = venues::get_venue(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue with ID {id}")))?;
    let genres = venues::venue_genres(&state.db, id).await?;
    let shows = shows_for_venue(&state.db, id).await?;
    let (upcoming, past) = partition_shows(shows, Utc::now().naive_utc());
    Ok(Html(views::venue_detail_page(&venue, &genres, &upcoming, &past)))
}

/// DELETE /venues/{id}; shows cascade away with the venue
async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if !venues::delete_venue(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Venue with ID {id}")));
    }
    info!("Deleted venue {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /venues/create
async fn create_form() -> Html<String> {
    Html(views::venue_form_page(
        "List a venue",
        "/venues/create",
        &VenueForm::default(),
        &[],
    ))
}

/// POST /venues/create
async fn create_submit(State(state): State<AppState>, body: String) -> Html<String> {
    let form = VenueForm::from_request(&FormData::parse(&body));

    let errors = form.validate();
    if !errors.is_empty() {
        return Html(views::venue_form_page(
            "List a venue",
            "/venues/create",
            &form,
            &Flash::from_errors(&errors),
        ));
    }

    match venues::create_venue(&state.db, &fields_from(&form)).await {
        Ok(id) => {
            info!("Created venue {id}: {}", form.name);
            Html(views::home_page(&[Flash::success(format!(
                "Venue {} was successfully listed!",
                form.name
            ))]))
        }
        Err(err) => {
            error!("Failed to create venue: {err}");
            Html(views::venue_form_page(
                "List a venue",
                "/venues/create",
                &form,
                &[Flash::error(format!(
                    "An error occurred. Venue {} could not be listed.",
                    form.name
                ))],
            ))
        }
    }
}

/// GET /venues/{id}/edit
async fn edit_form(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Html<String>> {
    let venue = venues::get_venue(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue with ID {id}")))?;
    let genres = venues::venue_genres(&state.db, id).await?;

    let form = VenueForm {
        name: venue.name,
        city: venue.city,
        state: venue.state,
        address: venue.address,
        phone: venue.phone.unwrap_or_default(),
        genres,
        image_link: venue.image_link.unwrap_or_default(),
        facebook_link: venue.facebook_link.unwrap_or_default(),
        website_link: venue.website_link.unwrap_or_default(),
        seeking_talent: venue.seeking_talent,
        seeking_description: venue.seeking_description.unwrap_or_default(),
    };

    Ok(Html(views::venue_form_page(
        "Edit venue",
        &format!("/venues/{id}/edit"),
        &form,
        &[],
    )))
}

/// POST /venues/{id}/edit
async fn edit_submit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: String,
) -> AppResult<Response> {
    venues::get_venue(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue with ID {id}")))?;

    let form = VenueForm::from_request(&FormData::parse(&body));
    let action = format!("/venues/{id}/edit");

    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(Html(views::venue_form_page(
            "Edit venue",
            &action,
            &form,
            &Flash::from_errors(&errors),
        ))
        .into_response());
    }

    match venues::update_venue(&state.db, id, &fields_from(&form)).await {
        Ok(()) => {
            info!("Updated venue {id}");
            Ok(Redirect::to(&format!("/venues/{id}")).into_response())
        }
        Err(err) => {
            error!("Failed to update venue {id}: {err}");
            Ok(Html(views::venue_form_page(
                "Edit venue",
                &action,
                &form,
                &[Flash::error(format!(
                    "An error occurred. Venue {} could not be updated.",
                    form.name
                ))],
            ))
            .into_response())
        }
    }
}
