//! End-to-end tests driving the full router over an in-memory database

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tower::util::ServiceExt;
use tower_http::normalize_path::NormalizePath;

type App = NormalizePath<Router>;

/// Create a test app over a fresh in-memory database. The pool is capped
/// at one connection so every request sees the same memory database.
async fn create_test_app() -> (App, SqlitePool) {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create in-memory database");

    encore::db::schema::initialize_schema(&pool)
        .await
        .expect("Schema initialization failed");

    let state = encore::AppState::new(pool.clone());
    (encore::build_service(state), pool)
}

async fn get(app: &App, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn post_form(app: &App, uri: &str, body: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn fillmore_body() -> String {
    "name=The+Fillmore&city=San+Francisco&state=CA&address=123+Market+St\
     &genres=Rock+n+Roll&seeking_talent=y&seeking_description=Always+booking"
        .to_string()
}

fn petals_body() -> String {
    "name=Guns+N+Petals&city=San+Francisco&state=CA&genres=Rock+n+Roll\
     &seeking_venue=y&seeking_description=Looking+for+shows"
        .to_string()
}

fn future_time() -> String {
    (Utc::now() + Duration::days(30))
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count query")
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _pool) = create_test_app().await;
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "encore");
}

#[tokio::test]
async fn test_home_page() {
    let (app, _pool) = create_test_app().await;
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Encore"));
}

#[tokio::test]
async fn test_listing_routes_accept_trailing_slash() {
    let (app, _pool) = create_test_app().await;
    for uri in [
        "/artists",
        "/artists/",
        "/venues",
        "/venues/",
        "/shows",
        "/shows/",
        "/shows/shows",
    ] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "GET {uri}");
    }
}

#[tokio::test]
async fn test_unknown_route_renders_404_page() {
    let (app, _pool) = create_test_app().await;
    let (status, body) = get(&app, "/nope/nothing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Not found"));
}

#[tokio::test]
async fn test_create_venue_success() {
    let (app, pool) = create_test_app().await;

    let (status, body) = post_form(&app, "/venues/create", &fillmore_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Venue The Fillmore was successfully listed!"));
    assert_eq!(count(&pool, "venues").await, 1);

    let (status, body) = get(&app, "/venues/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("The Fillmore"));
    assert!(body.contains("123 Market St"));
    assert!(body.contains("Rock n Roll"));
    assert!(body.contains("Currently seeking talent"));
}

#[tokio::test]
async fn test_create_venue_invalid_genre_rejected() {
    let (app, pool) = create_test_app().await;

    let body = "name=The+Fillmore&city=San+Francisco&state=CA&address=123+Market+St&genres=Polka";
    let (status, page) = post_form(&app, "/venues/create", body).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Invalid genre. Please select a valid genre."));
    // Prior input is preserved in the re-rendered form
    assert!(page.contains("value=\"The Fillmore\""));
    assert_eq!(count(&pool, "venues").await, 0);
}

#[tokio::test]
async fn test_create_artist_invalid_phone_rejected() {
    let (app, pool) = create_test_app().await;

    let body = "name=Guns+N+Petals&city=San+Francisco&state=CA&genres=Jazz&phone=12345";
    let (_, page) = post_form(&app, "/artists/create", body).await;
    assert!(page.contains("Invalid phone number. Please use the format 123-456-7890"));
    assert_eq!(count(&pool, "artists").await, 0);
}

#[tokio::test]
async fn test_create_artist_success_and_listing_order() {
    let (app, _pool) = create_test_app().await;

    let (_, page) = post_form(&app, "/artists/create", &petals_body()).await;
    assert!(page.contains("Artist Guns N Petals was successfully listed!"));
    post_form(
        &app,
        "/artists/create",
        "name=The+Wild+Sax+Band&city=San+Francisco&state=CA&genres=Jazz",
    )
    .await;

    // Newest first
    let (_, listing) = get(&app, "/artists").await;
    let sax = listing.find("The Wild Sax Band").expect("second artist listed");
    let petals = listing.find("Guns N Petals").expect("first artist listed");
    assert!(sax < petals);
}

#[tokio::test]
async fn test_venue_detail_not_found() {
    let (app, _pool) = create_test_app().await;
    let (status, body) = get(&app, "/venues/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Venue with ID 999"));
}

#[tokio::test]
async fn test_search_venues_case_insensitive() {
    let (app, _pool) = create_test_app().await;
    post_form(
        &app,
        "/venues/create",
        "name=The+Musical+Hop&city=San+Francisco&state=CA&address=1015+Folsom+St&genres=Jazz",
    )
    .await;
    post_form(
        &app,
        "/venues/create",
        "name=The+Dueling+Pianos&city=New+York&state=NY&address=335+Delancey+St&genres=Classical",
    )
    .await;

    let (status, page) = post_form(&app, "/venues/search", "search_term=Hop").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Found 1 result(s)"));
    assert!(page.contains("The Musical Hop"));
    assert!(!page.contains("The Dueling Pianos"));
}

#[tokio::test]
async fn test_venues_grouped_by_area() {
    let (app, _pool) = create_test_app().await;
    post_form(
        &app,
        "/venues/create",
        "name=The+Musical+Hop&city=San+Francisco&state=CA&address=1015+Folsom+St&genres=Jazz",
    )
    .await;
    post_form(
        &app,
        "/venues/create",
        "name=Park+Square+Live&city=San+Francisco&state=CA&address=34+Whiskey+Moore+Ave&genres=Jazz",
    )
    .await;

    let (_, page) = get(&app, "/venues").await;
    // One area heading, two venues beneath it
    assert_eq!(page.matches("San Francisco, CA").count(), 1);
    assert!(page.contains("The Musical Hop"));
    assert!(page.contains("Park Square Live"));
}

#[tokio::test]
async fn test_show_creation_full_flow() {
    let (app, pool) = create_test_app().await;
    post_form(&app, "/artists/create", &petals_body()).await;
    post_form(&app, "/venues/create", &fillmore_body()).await;

    let body = format!(
        "artist_id=1&venue_id=1&start_time={}",
        future_time().replace(' ', "+")
    );
    let (status, page) = post_form(&app, "/shows/create", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Show was successfully listed!"));
    assert_eq!(count(&pool, "shows").await, 1);

    // Venue detail now lists it as upcoming
    let (_, detail) = get(&app, "/venues/1").await;
    assert!(detail.contains("Upcoming shows (1)"));
    assert!(detail.contains("Guns N Petals"));

    // And the all-shows listing joins both display names
    let (_, listing) = get(&app, "/shows/shows").await;
    assert!(listing.contains("Guns N Petals"));
    assert!(listing.contains("The Fillmore"));
}

#[tokio::test]
async fn test_show_rejects_past_start_time() {
    let (app, pool) = create_test_app().await;
    post_form(&app, "/artists/create", &petals_body()).await;
    post_form(&app, "/venues/create", &fillmore_body()).await;

    let past = (Utc::now() - Duration::days(1))
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let body = format!("artist_id=1&venue_id=1&start_time={}", past.replace(' ', "+"));
    let (_, page) = post_form(&app, "/shows/create", &body).await;
    assert!(page.contains("Show time cannot be in the past."));
    assert_eq!(count(&pool, "shows").await, 0);
}

#[tokio::test]
async fn test_show_rejects_unknown_parties() {
    let (app, pool) = create_test_app().await;
    post_form(&app, "/venues/create", &fillmore_body()).await;

    let body = format!(
        "artist_id=99&venue_id=1&start_time={}",
        future_time().replace(' ', "+")
    );
    let (_, page) = post_form(&app, "/shows/create", &body).await;
    assert!(page.contains("Unable to find artist with ID: 99"));
    assert_eq!(count(&pool, "shows").await, 0);

    post_form(&app, "/artists/create", &petals_body()).await;
    let body = format!(
        "artist_id=1&venue_id=42&start_time={}",
        future_time().replace(' ', "+")
    );
    let (_, page) = post_form(&app, "/shows/create", &body).await;
    assert!(page.contains("Unable to find venue with ID: 42"));
    assert_eq!(count(&pool, "shows").await, 0);
}

#[tokio::test]
async fn test_show_rejects_parties_not_accepting_bookings() {
    let (app, pool) = create_test_app().await;

    // Artist without seeking_venue, venue open
    post_form(
        &app,
        "/artists/create",
        "name=Quiet+Band&city=San+Francisco&state=CA&genres=Jazz",
    )
    .await;
    post_form(&app, "/venues/create", &fillmore_body()).await;

    let body = format!(
        "artist_id=1&venue_id=1&start_time={}",
        future_time().replace(' ', "+")
    );
    let (_, page) = post_form(&app, "/shows/create", &body).await;
    assert!(page.contains("Artist is not accepting shows at the moment."));
    assert_eq!(count(&pool, "shows").await, 0);

    // Artist open, venue without seeking_talent
    post_form(&app, "/artists/create", &petals_body()).await;
    post_form(
        &app,
        "/venues/create",
        "name=Closed+Hall&city=New+York&state=NY&address=5+Main+St&genres=Jazz",
    )
    .await;

    let body = format!(
        "artist_id=2&venue_id=2&start_time={}",
        future_time().replace(' ', "+")
    );
    let (_, page) = post_form(&app, "/shows/create", &body).await;
    assert!(page.contains("Venue is not accepting shows at the moment."));
    assert_eq!(count(&pool, "shows").await, 0);
}

#[tokio::test]
async fn test_delete_venue_cascades_to_shows() {
    let (app, pool) = create_test_app().await;
    post_form(&app, "/artists/create", &petals_body()).await;
    post_form(&app, "/venues/create", &fillmore_body()).await;
    let body = format!(
        "artist_id=1&venue_id=1&start_time={}",
        future_time().replace(' ', "+")
    );
    post_form(&app, "/shows/create", &body).await;
    assert_eq!(count(&pool, "shows").await, 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/venues/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(count(&pool, "venues").await, 0);
    assert_eq!(count(&pool, "shows").await, 0);

    let (status, _) = get(&app, "/venues/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_venue_is_404() {
    let (app, _pool) = create_test_app().await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/venues/7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_venue_full_replacement() {
    let (app, _pool) = create_test_app().await;
    post_form(&app, "/venues/create", &fillmore_body()).await;

    // Edit form is pre-populated from the row
    let (status, form_page) = get(&app, "/venues/1/edit").await;
    assert_eq!(status, StatusCode::OK);
    assert!(form_page.contains("value=\"The Fillmore\""));
    assert!(form_page.contains("value=\"Rock n Roll\" checked"));

    let update = "name=The+Fillmore+West&city=San+Francisco&state=CA\
                  &address=99+Geary+St&genres=Blues&genres=Soul";
    let (status, _) = post_form(&app, "/venues/1/edit", update).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (_, detail) = get(&app, "/venues/1").await;
    assert!(detail.contains("The Fillmore West"));
    assert!(detail.contains("99 Geary St"));
    assert!(detail.contains("Blues"));
    assert!(detail.contains("Soul"));
    assert!(!detail.contains("Rock n Roll"));
    // Unchecked checkbox clears the acceptance flag
    assert!(detail.contains("Not currently seeking talent"));
}

#[tokio::test]
async fn test_edit_artist_and_detail_partition() {
    let (app, _pool) = create_test_app().await;
    post_form(&app, "/artists/create", &petals_body()).await;
    post_form(&app, "/venues/create", &fillmore_body()).await;

    let body = format!(
        "artist_id=1&venue_id=1&start_time={}",
        future_time().replace(' ', "+")
    );
    post_form(&app, "/shows/create", &body).await;

    let (_, detail) = get(&app, "/artists/1").await;
    assert!(detail.contains("Upcoming shows (1)"));
    assert!(detail.contains("Past shows (0)"));
    assert!(detail.contains("The Fillmore"));

    let update = "name=Guns+N+Petals&city=Oakland&state=CA&genres=Rock+n+Roll&seeking_venue=y";
    let (status, _) = post_form(&app, "/artists/1/edit", update).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (_, detail) = get(&app, "/artists/1").await;
    assert!(detail.contains("Oakland"));
}

#[tokio::test]
async fn test_edit_missing_artist_is_404() {
    let (app, _pool) = create_test_app().await;
    let (status, _) = get(&app, "/artists/3/edit").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_form(
        &app,
        "/artists/3/edit",
        "name=X&city=Y&state=CA&genres=Jazz",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
