//! Artist persistence

use anyhow::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};

/// Artist row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// Validated field set for creating or replacing an artist. This is the
/// explicit allow-list of writable columns; nothing else is updatable.
#[derive(Debug, Clone, Default)]
pub struct ArtistFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

const SELECT_COLUMNS: &str = "id, name, city, state, phone, image_link, facebook_link, \
                              website_link, seeking_venue, seeking_description";

/// Insert an artist and its genre rows in one transaction.
pub async fn create_artist(pool: &SqlitePool, fields: &ArtistFields) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO artists (
            name, city, state, phone, image_link, facebook_link,
            website_link, seeking_venue, seeking_description
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.phone)
    .bind(&fields.image_link)
    .bind(&fields.facebook_link)
    .bind(&fields.website_link)
    .bind(fields.seeking_venue)
    .bind(&fields.seeking_description)
    .execute(&mut *tx)
    .await?;

    let artist_id = result.last_insert_rowid();
    insert_genres(&mut tx, artist_id, &fields.genres).await?;

    tx.commit().await?;
    Ok(artist_id)
}

/// Replace every allow-listed field of an existing artist, genres included.
pub async fn update_artist(pool: &SqlitePool, artist_id: i64, fields: &ArtistFields) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE artists SET
            name = ?, city = ?, state = ?, phone = ?, image_link = ?,
            facebook_link = ?, website_link = ?, seeking_venue = ?,
            seeking_description = ?
        WHERE id = ?
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.phone)
    .bind(&fields.image_link)
    .bind(&fields.facebook_link)
    .bind(&fields.website_link)
    .bind(fields.seeking_venue)
    .bind(&fields.seeking_description)
    .bind(artist_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM artist_genres WHERE artist_id = ?")
        .bind(artist_id)
        .execute(&mut *tx)
        .await?;
    insert_genres(&mut tx, artist_id, &fields.genres).await?;

    tx.commit().await?;
    Ok(())
}

async fn insert_genres(
    tx: &mut Transaction<'_, Sqlite>,
    artist_id: i64,
    genres: &[String],
) -> Result<()> {
    if genres.is_empty() {
        return Ok(());
    }
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO artist_genres (artist_id, genre) ");
    builder.push_values(genres, |mut b, genre| {
        b.push_bind(artist_id).push_bind(genre.clone());
    });
    builder.build().execute(&mut **tx).await?;
    Ok(())
}

pub async fn get_artist(pool: &SqlitePool, artist_id: i64) -> Result<Option<Artist>> {
    let artist = sqlx::query_as::<_, Artist>(&format!(
        "SELECT {SELECT_COLUMNS} FROM artists WHERE id = ?"
    ))
    .bind(artist_id)
    .fetch_optional(pool)
    .await?;
    Ok(artist)
}

pub async fn artist_genres(pool: &SqlitePool, artist_id: i64) -> Result<Vec<String>> {
    let genres = sqlx::query_scalar(
        "SELECT genre FROM artist_genres WHERE artist_id = ? ORDER BY genre",
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?;
    Ok(genres)
}

/// All artists, newest first.
pub async fn list_artists(pool: &SqlitePool) -> Result<Vec<Artist>> {
    let artists = sqlx::query_as::<_, Artist>(&format!(
        "SELECT {SELECT_COLUMNS} FROM artists ORDER BY id DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(artists)
}

/// Case-insensitive substring match on name.
pub async fn search_artists(pool: &SqlitePool, term: &str) -> Result<Vec<Artist>> {
    let artists = sqlx::query_as::<_, Artist>(&format!(
        "SELECT {SELECT_COLUMNS} FROM artists \
         WHERE name LIKE '%' || ? || '%' COLLATE NOCASE \
         ORDER BY id DESC"
    ))
    .bind(term)
    .fetch_all(pool)
    .await?;
    Ok(artists)
}
