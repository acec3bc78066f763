//! Artist resource handlers

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use tracing::{error, info};

use crate::db::artists::{self, ArtistFields};
use crate::db::shows::{partition_shows, shows_for_artist};
use crate::error::{AppError, AppResult};
use crate::forms::{ArtistForm, FormData};
use crate::views::{self, Flash};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/search", post(search))
        .route("/create", get(create_form).post(create_submit))
        .route("/:id", get(detail))
        .route("/:id/edit", get(edit_form).post(edit_submit))
}

fn opt(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn fields_from(form: &ArtistForm) -> ArtistFields {
    ArtistFields {
        name: form.name.clone(),
        city: form.city.clone(),
        state: form.state.clone(),
        phone: opt(&form.phone),
        genres: form.genres.clone(),
        image_link: opt(&form.image_link),
        facebook_link: opt(&form.facebook_link),
        website_link: opt(&form.website_link),
        seeking_venue: form.seeking_venue,
        seeking_description: opt(&form.seeking_description),
    }
}

/// GET /artists
async fn list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let artists = artists::list_artists(&state.db).await?;
    Ok(Html(views::artists_page(&artists)))
}

/// POST /artists/search
async fn search(State(state): State<AppState>, body: String) -> AppResult<Html<String>> {
    let term = FormData::parse(&body).value("search_term");
    let artists = artists::search_artists(&state.db, &term).await?;
    Ok(Html(views::artist_search_page(&term, &artists)))
}

/// GET /artists/{id}
async fn detail(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Html<String>> {
    let artist = artists::get_artist(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist with ID {id}")))?;
    let genres = artists::artist_genres(&state.db, id).await?;
    let shows = shows_for_artist(&state.db, id).await?;
    let (upcoming, past) = partition_shows(shows, Utc::now().naive_utc());
    Ok(Html(views::artist_detail_page(&artist, &genres, &upcoming, &past)))
}

/// GET /artists/create
async fn create_form() -> Html<String> {
    Html(views::artist_form_page(
        "List an artist",
        "/artists/create",
        &ArtistForm::default(),
        &[],
    ))
}

/// POST /artists/create
async fn create_submit(State(state): State<AppState>, body: String) -> Html<String> {
    let form = ArtistForm::from_request(&FormData::parse(&body));

    let errors = form.validate();
    if !errors.is_empty() {
        return Html(views::artist_form_page(
            "List an artist",
            "/artists/create",
            &form,
            &Flash::from_errors(&errors),
        ));
    }

    match artists::create_artist(&state.db, &fields_from(&form)).await {
        Ok(id) => {
            info!("Created artist {id}: {}", form.name);
            Html(views::home_page(&[Flash::success(format!(
                "Artist {} was successfully listed!",
                form.name
            ))]))
        }
        Err(err) => {
            error!("Failed to create artist: {err}");
            Html(views::artist_form_page(
                "List an artist",
                "/artists/create",
                &form,
                &[Flash::error(format!(
                    "An error occurred. Artist {} could not be listed.",
                    form.name
                ))],
            ))
        }
    }
}

/// GET /artists/{id}/edit
async fn edit_form(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Html<String>> {
    let artist = artists::get_artist(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist with ID {id}")))?;
    let genres = artists::artist_genres(&state.db, id).await?;

    let form = ArtistForm {
        name: artist.name,
        city: artist.city,
        state: artist.state,
        phone: artist.phone.unwrap_or_default(),
        genres,
        image_link: artist.image_link.unwrap_or_default(),
        facebook_link: artist.facebook_link.unwrap_or_default(),
        website_link: artist.website_link.unwrap_or_default(),
        seeking_venue: artist.seeking_venue,
        seeking_description: artist.seeking_description.unwrap_or_default(),
    };

    Ok(Html(views::artist_form_page(
        "Edit artist",
        &format!("/artists/{id}/edit"),
        &form,
        &[],
    )))
}

/// POST /artists/{id}/edit
async fn edit_submit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: String,
) -> AppResult<Response> {
    artists::get_artist(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist with ID {id}")))?;

    let form = ArtistForm::from_request(&FormData::parse(&body));
    let action = format!("/artists/{id}/edit");

    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(Html(views::artist_form_page(
            "Edit artist",
            &action,
            &form,
            &Flash::from_errors(&errors),
        ))
        .into_response());
    }

    match artists::update_artist(&state.db, id, &fields_from(&form)).await {
        Ok(()) => {
            info!("Updated artist {id}");
            Ok(Redirect::to(&format!("/artists/{id}")).into_response())
        }
        Err(err) => {
            error!("Failed to update artist {id}: {err}");
            Ok(Html(views::artist_form_page(
                "Edit artist",
                &action,
                &form,
                &[Flash::error(format!(
                    "An error occurred. Artist {} could not be updated.",
                    form.name
                ))],
            ))
            .into_response())
        }
    }
}
