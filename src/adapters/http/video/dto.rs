//! HTTP DTOs for video endpoints.

use serde::Serialize;

use crate::domain::foundation::Timestamp;
use crate::domain::video::{CoachRef, VideoDetails};

/// A coach training video with its coach relation.
#[derive(Debug, Clone, Serialize)]
pub struct VideoResponse {
    pub id: i64,
    pub coach_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub coach: Option<CoachRef>,
}

impl From<VideoDetails> for VideoResponse {
    fn from(details: VideoDetails) -> Self {
        let video = details.video;
        Self {
            id: video.id,
            coach_id: video.coach_id,
            title: video.title,
            description: video.description,
            video_url: video.video_url,
            created_at: video.created_at,
            updated_at: video.updated_at,
            coach: details.coach,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::video::Video;
    use serde_json::Value;

    #[test]
    fn response_embeds_the_coach() {
        let details = VideoDetails {
            video: Video {
                id: 4,
                coach_id: 2,
                title: "Warmup routine".into(),
                description: None,
                video_url: "/storage/videos/abc.mp4".into(),
                created_at: Timestamp::now(),
                updated_at: Timestamp::now(),
            },
            coach: Some(CoachRef { id: 2, name: "Sam".into() }),
        };

        let value = serde_json::to_value(VideoResponse::from(details)).unwrap();
        assert_eq!(value["title"], "Warmup routine");
        assert_eq!(value["coach"]["name"], "Sam");
        assert_eq!(value["description"], Value::Null);
    }
}
