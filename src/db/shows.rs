//! Show persistence and joined listings

use anyhow::Result;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::forms::{parse_start_time, TS_FMT};

/// Show joined with both parties' display fields, for the all-shows page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

/// Show decorated with the counterpart entity's display fields, for an
/// artist or venue detail page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CounterpartShow {
    pub counterpart_id: i64,
    pub counterpart_name: String,
    pub counterpart_image_link: Option<String>,
    pub start_time: String,
}

pub async fn create_show(
    pool: &SqlitePool,
    artist_id: i64,
    venue_id: i64,
    start_time: NaiveDateTime,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO shows (artist_id, venue_id, start_time) VALUES (?, ?, ?)",
    )
    .bind(artist_id)
    .bind(venue_id)
    .bind(start_time.format(TS_FMT).to_string())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// All shows with artist and venue display fields, soonest first.
pub async fn list_shows(pool: &SqlitePool) -> Result<Vec<ShowListing>> {
    let shows = sqlx::query_as::<_, ShowListing>(
        r#"
        SELECT s.venue_id, v.name AS venue_name,
               s.artist_id, a.name AS artist_name,
               a.image_link AS artist_image_link,
               s.start_time
        FROM shows s
        JOIN artists a ON a.id = s.artist_id
        JOIN venues v ON v.id = s.venue_id
        ORDER BY s.start_time
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(shows)
}

/// Shows for an artist, decorated with the venue's name and image.
pub async fn shows_for_artist(pool: &SqlitePool, artist_id: i64) -> Result<Vec<CounterpartShow>> {
    let shows = sqlx::query_as::<_, CounterpartShow>(
        r#"
        SELECT s.venue_id AS counterpart_id,
               v.name AS counterpart_name,
               v.image_link AS counterpart_image_link,
               s.start_time
        FROM shows s
        JOIN venues v ON v.id = s.venue_id
        WHERE s.artist_id = ?
        ORDER BY s.start_time
        "#,
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?;
    Ok(shows)
}

/// Shows at a venue, decorated with the artist's name and image.
pub async fn shows_for_venue(pool: &SqlitePool, venue_id: i64) -> Result<Vec<CounterpartShow>> {
    let shows = sqlx::query_as::<_, CounterpartShow>(
        r#"
        SELECT s.artist_id AS counterpart_id,
               a.name AS counterpart_name,
               a.image_link AS counterpart_image_link,
               s.start_time
        FROM shows s
        JOIN artists a ON a.id = s.artist_id
        WHERE s.venue_id = ?
        ORDER BY s.start_time
        "#,
    )
    .bind(venue_id)
    .fetch_all(pool)
    .await?;
    Ok(shows)
}

/// Split shows into (upcoming, past) relative to `now`. A show starting
/// exactly at `now` counts as past, matching the listing semantics
/// (upcoming means strictly after "now").
pub fn partition_shows(
    shows: Vec<CounterpartShow>,
    now: NaiveDateTime,
) -> (Vec<CounterpartShow>, Vec<CounterpartShow>) {
    shows.into_iter().partition(|show| {
        parse_start_time(&show.start_time)
            .map(|start| start > now)
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::artists::{create_artist, ArtistFields};
    use crate::db::test_pool;
    use crate::db::venues::{create_venue, delete_venue, VenueFields};
    use chrono::{Duration, Utc};

    async fn seed(pool: &SqlitePool) -> (i64, i64) {
        let artist_id = create_artist(
            pool,
            &ArtistFields {
                name: "Guns N Petals".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                genres: vec!["Rock n Roll".to_string()],
                seeking_venue: true,
                ..Default::default()
            },
        )
        .await
        .expect("artist");

        let venue_id = create_venue(
            pool,
            &VenueFields {
                name: "The Fillmore".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                address: "123 Market St".to_string(),
                genres: vec!["Rock n Roll".to_string()],
                seeking_talent: true,
                ..Default::default()
            },
        )
        .await
        .expect("venue");

        (artist_id, venue_id)
    }

    #[tokio::test]
    async fn test_listing_joins_display_fields() {
        let pool = test_pool().await;
        let (artist_id, venue_id) = seed(&pool).await;
        let start = Utc::now().naive_utc() + Duration::days(7);

        create_show(&pool, artist_id, venue_id, start).await.expect("show");

        let listed = list_shows(&pool).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].artist_name, "Guns N Petals");
        assert_eq!(listed[0].venue_name, "The Fillmore");
    }

    #[tokio::test]
    async fn test_partition_upcoming_vs_past() {
        let pool = test_pool().await;
        let (artist_id, venue_id) = seed(&pool).await;
        let now = Utc::now().naive_utc();

        create_show(&pool, artist_id, venue_id, now - Duration::days(30))
            .await
            .expect("past show");
        create_show(&pool, artist_id, venue_id, now + Duration::days(30))
            .await
            .expect("future show");

        let shows = shows_for_venue(&pool, venue_id).await.expect("shows");
        let (upcoming, past) = partition_shows(shows, now);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(past.len(), 1);
        assert_eq!(upcoming[0].counterpart_name, "Guns N Petals");
    }

    #[tokio::test]
    async fn test_show_at_now_counts_as_past() {
        let now = Utc::now().naive_utc();
        let show = CounterpartShow {
            counterpart_id: 1,
            counterpart_name: "X".to_string(),
            counterpart_image_link: None,
            start_time: now.format(TS_FMT).to_string(),
        };
        // Re-parse so sub-second precision lost by formatting cannot flip
        // the comparison
        let now = parse_start_time(&show.start_time.clone()).unwrap();
        let (upcoming, past) = partition_shows(vec![show], now);
        assert!(upcoming.is_empty());
        assert_eq!(past.len(), 1);
    }

    #[tokio::test]
    async fn test_venue_delete_cascades_to_shows() {
        let pool = test_pool().await;
        let (artist_id, venue_id) = seed(&pool).await;
        create_show(&pool, artist_id, venue_id, Utc::now().naive_utc() + Duration::days(1))
            .await
            .expect("show");

        assert!(delete_venue(&pool, venue_id).await.expect("delete"));

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shows")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(remaining, 0);
        assert!(shows_for_artist(&pool, artist_id).await.expect("shows").is_empty());
    }
}
