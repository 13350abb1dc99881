//! PostgreSQL implementation of VideoRepository.
//!
//! Persists coach video rows in the `videos` table, joined to
//! `coaches` for listings. File bytes never pass through here; rows
//! only carry the public URL written by the storage adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::video::{CoachRef, NewVideo, Video, VideoDetails};
use crate::ports::VideoRepository;

/// PostgreSQL implementation of the VideoRepository port.
#[derive(Clone)]
pub struct PostgresVideoRepository {
    pool: PgPool,
}

impl PostgresVideoRepository {
    /// Creates a new PostgresVideoRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a video with its coach name.
#[derive(Debug, sqlx::FromRow)]
struct VideoRow {
    id: i64,
    coach_id: i64,
    title: String,
    description: Option<String>,
    video_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    coach_name: Option<String>,
}

impl From<VideoRow> for VideoDetails {
    fn from(row: VideoRow) -> Self {
        let coach = row.coach_name.clone().map(|name| CoachRef {
            id: row.coach_id,
            name,
        });

        VideoDetails {
            video: Video {
                id: row.id,
                coach_id: row.coach_id,
                title: row.title,
                description: row.description,
                video_url: row.video_url,
                created_at: Timestamp::from_datetime(row.created_at),
                updated_at: Timestamp::from_datetime(row.updated_at),
            },
            coach,
        }
    }
}

#[async_trait]
impl VideoRepository for PostgresVideoRepository {
    async fn find_all(&self) -> Result<Vec<VideoDetails>, DomainError> {
        let rows: Vec<VideoRow> = sqlx::query_as(
            r#"
            SELECT v.id, v.coach_id, v.title, v.description, v.video_url,
                   v.created_at, v.updated_at, c.name AS coach_name
            FROM videos v
            LEFT JOIN coaches c ON c.id = v.coach_id
            ORDER BY v.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list videos: {}", e),
            )
        })?;

        Ok(rows.into_iter().map(VideoDetails::from).collect())
    }

    async fn find_by_coach(&self, coach_id: i64) -> Result<Vec<VideoDetails>, DomainError> {
        let rows: Vec<VideoRow> = sqlx::query_as(
            r#"
            SELECT v.id, v.coach_id, v.title, v.description, v.video_url,
                   v.created_at, v.updated_at, c.name AS coach_name
            FROM videos v
            LEFT JOIN coaches c ON c.id = v.coach_id
            WHERE v.coach_id = $1
            ORDER BY v.id
            "#,
        )
        .bind(coach_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list videos by coach: {}", e),
            )
        })?;

        Ok(rows.into_iter().map(VideoDetails::from).collect())
    }

    async fn create(&self, video: &NewVideo) -> Result<VideoDetails, DomainError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO videos (coach_id, title, description, video_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(video.coach_id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.video_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert video: {}", e),
            )
        })?;

        let row: VideoRow = sqlx::query_as(
            r#"
            SELECT v.id, v.coach_id, v.title, v.description, v.video_url,
                   v.created_at, v.updated_at, c.name AS coach_name
            FROM videos v
            LEFT JOIN coaches c ON c.id = v.coach_id
            WHERE v.id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to reload video: {}", e),
            )
        })?;

        Ok(VideoDetails::from(row))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete video: {}", e),
                )
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn coach_exists(&self, coach_id: i64) -> Result<bool, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM coaches WHERE id = $1")
            .bind(coach_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to check coach existence: {}", e),
                )
            })?;

        Ok(result.0 > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(coach_name: Option<&str>) -> VideoRow {
        let now = Utc::now();
        VideoRow {
            id: 9,
            coach_id: 4,
            title: "Warmup routine".to_string(),
            description: None,
            video_url: "/storage/videos/abc.mp4".to_string(),
            created_at: now,
            updated_at: now,
            coach_name: coach_name.map(String::from),
        }
    }

    #[test]
    fn row_conversion_embeds_the_coach() {
        let details = VideoDetails::from(sample_row(Some("Nadia")));

        assert_eq!(details.video.id, 9);
        assert_eq!(details.video.video_url, "/storage/videos/abc.mp4");
        let coach = details.coach.expect("coach should be present");
        assert_eq!(coach.id, 4);
        assert_eq!(coach.name, "Nadia");
    }

    #[test]
    fn row_conversion_tolerates_a_dangling_coach() {
        let details = VideoDetails::from(sample_row(None));

        assert_eq!(details.video.coach_id, 4);
        assert!(details.coach.is_none());
    }
}
