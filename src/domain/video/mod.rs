//! Video domain - coach training videos backed by uploaded files.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// A coach training video as stored.
///
/// `video_url` points at the uploaded file under the public storage
/// tree; the row never embeds file bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub id: i64,
    pub coach_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A video together with its coach relation.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetails {
    pub video: Video,
    pub coach: Option<CoachRef>,
}

/// Coach reference as embedded in video responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachRef {
    pub id: i64,
    pub name: String,
}

/// Full field set for creating a video row.
///
/// The file itself is persisted through the storage port before this
/// struct is built; only the resulting URL lands here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideo {
    pub coach_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coach_ref_serializes_with_plain_field_names() {
        let coach = CoachRef { id: 12, name: "Nadia".into() };
        let json = serde_json::to_value(&coach).unwrap();
        assert_eq!(json["id"], 12);
        assert_eq!(json["name"], "Nadia");
    }
}
