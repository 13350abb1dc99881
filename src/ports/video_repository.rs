//! Video repository port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::video::{NewVideo, VideoDetails};

/// Repository port for coach video persistence.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// List every video with its coach loaded (admin listing).
    async fn find_all(&self) -> Result<Vec<VideoDetails>, DomainError>;

    /// List one coach's videos (public listing).
    async fn find_by_coach(&self, coach_id: i64) -> Result<Vec<VideoDetails>, DomainError>;

    /// Insert a video row. The file is already persisted; only its URL
    /// is recorded here.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, video: &NewVideo) -> Result<VideoDetails, DomainError>;

    /// Delete the row with the given id. Returns whether a row
    /// existed. The stored file is left in place.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// Whether a coach row exists. Used to reject bad `coach_id`
    /// before the file upload is persisted.
    async fn coach_exists(&self, coach_id: i64) -> Result<bool, DomainError>;
}
