//! Venue persistence

use anyhow::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};

use crate::forms::TS_FMT;

/// Venue row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// Venue list entry with its upcoming-show count, for the grouped
/// by-area listing page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub num_upcoming_shows: i64,
}

/// Validated field set for creating or replacing a venue (the explicit
/// allow-list of writable columns).
#[derive(Debug, Clone, Default)]
pub struct VenueFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

const SELECT_COLUMNS: &str = "id, name, city, state, address, phone, image_link, \
                              facebook_link, website_link, seeking_talent, seeking_description";

/// Insert a venue and its genre rows in one transaction.
pub async fn create_venue(pool: &SqlitePool, fields: &VenueFields) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO venues (
            name, city, state, address, phone, image_link, facebook_link,
            website_link, seeking_talent, seeking_description
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.address)
    .bind(&fields.phone)
    .bind(&fields.image_link)
    .bind(&fields.facebook_link)
    .bind(&fields.website_link)
    .bind(fields.seeking_talent)
    .bind(&fields.seeking_description)
    .execute(&mut *tx)
    .await?;

    let venue_id = result.last_insert_rowid();
    insert_genres(&mut tx, venue_id, &fields.genres).await?;

    tx.commit().await?;
    Ok(venue_id)
}

/// Replace every allow-listed field of an existing venue, genres included.
pub async fn update_venue(pool: &SqlitePool, venue_id: i64, fields: &VenueFields) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE venues SET
            name = ?, city = ?, state = ?, address = ?, phone = ?,
            image_link = ?, facebook_link = ?, website_link = ?,
            seeking_talent = ?, seeking_description = ?
        WHERE id = ?
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.address)
    .bind(&fields.phone)
    .bind(&fields.image_link)
    .bind(&fields.facebook_link)
    .bind(&fields.website_link)
    .bind(fields.seeking_talent)
    .bind(&fields.seeking_description)
    .bind(venue_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM venue_genres WHERE venue_id = ?")
        .bind(venue_id)
        .execute(&mut *tx)
        .await?;
    insert_genres(&mut tx, venue_id, &fields.genres).await?;

    tx.commit().await?;
    Ok(())
}

/// Delete a venue; `ON DELETE CASCADE` removes its shows and genre rows.
/// Returns false when the row did not exist.
pub async fn delete_venue(pool: &SqlitePool, venue_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM venues WHERE id = ?")
        .bind(venue_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn insert_genres(
    tx: &mut Transaction<'_, Sqlite>,
    venue_id: i64,
    genres: &[String],
) -> Result<()> {
    if genres.is_empty() {
        return Ok(());
    }
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO venue_genres (venue_id, genre) ");
    builder.push_values(genres, |mut b, genre| {
        b.push_bind(venue_id).push_bind(genre.clone());
    });
    builder.build().execute(&mut **tx).await?;
    Ok(())
}

pub async fn get_venue(pool: &SqlitePool, venue_id: i64) -> Result<Option<Venue>> {
    let venue = sqlx::query_as::<_, Venue>(&format!(
        "SELECT {SELECT_COLUMNS} FROM venues WHERE id = ?"
    ))
    .bind(venue_id)
    .fetch_optional(pool)
    .await?;
    Ok(venue)
}

pub async fn venue_genres(pool: &SqlitePool, venue_id: i64) -> Result<Vec<String>> {
    let genres = sqlx::query_scalar(
        "SELECT genre FROM venue_genres WHERE venue_id = ? ORDER BY genre",
    )
    .bind(venue_id)
    .fetch_all(pool)
    .await?;
    Ok(genres)
}

/// All venues with upcoming-show counts, ordered for (city, state)
/// grouping; newest first within an area.
pub async fn list_venues(pool: &SqlitePool, now: chrono::NaiveDateTime) -> Result<Vec<VenueSummary>> {
    let venues = sqlx::query_as::<_, VenueSummary>(
        r#"
        SELECT v.id, v.name, v.city, v.state,
               (SELECT COUNT(*) FROM shows s
                WHERE s.venue_id = v.id AND s.start_time > ?) AS num_upcoming_shows
        FROM venues v
        ORDER BY v.city, v.state, v.id DESC
        "#,
    )
    .bind(now.format(TS_FMT).to_string())
    .fetch_all(pool)
    .await?;
    Ok(venues)
}

/// Case-insensitive substring match on name.
pub async fn search_venues(pool: &SqlitePool, term: &str) -> Result<Vec<Venue>> {
    let venues = sqlx::query_as::<_, Venue>(&format!(
        "SELECT {SELECT_COLUMNS} FROM venues \
         WHERE name LIKE '%' || ? || '%' COLLATE NOCASE \
         ORDER BY id DESC"
    ))
    .bind(term)
    .fetch_all(pool)
    .await?;
    Ok(venues)
}
