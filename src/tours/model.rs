//! Tour and step records, plus the collaborative update payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One unit of a tour: a media reference plus a description. Order within
/// the owning tour is the array order; there is no separate rank field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub media_uri: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl Step {
    /// Media kind is carried in-band by a content-type marker on the URI
    /// string (`data:video/...` from the screen recorder, or a bare
    /// `video/...` prefix); everything else renders as an image.
    pub fn media_kind(&self) -> MediaKind {
        if self.media_uri.starts_with("data:video") || self.media_uri.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub steps: Vec<Step>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One collaborative update: a full replacement value for each top-level
/// field present. There is no finer-grained patch format; a one-character
/// title edit republishes the whole title, and any step change republishes
/// the whole sequence. A payload carrying neither field is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
}

impl TourUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), steps: None }
    }

    pub fn steps(steps: Vec<Step>) -> Self {
        Self { title: None, steps: Some(steps) }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.steps.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(uri: &str) -> Step {
        Step { media_uri: uri.to_owned(), description: String::new() }
    }

    #[test]
    fn media_kind_follows_uri_prefix() {
        assert_eq!(step("data:video/webm;base64,AAAA").media_kind(), MediaKind::Video);
        assert_eq!(step("video/mp4").media_kind(), MediaKind::Video);
        assert_eq!(step("data:image/png;base64,AAAA").media_kind(), MediaKind::Image);
        assert_eq!(step("https://cdn.example.com/shot.png").media_kind(), MediaKind::Image);
    }

    #[test]
    fn tour_serializes_with_camel_case_fields() {
        let tour = Tour {
            id: Uuid::now_v7(),
            owner_id: Uuid::now_v7(),
            title: "Onboarding".to_owned(),
            steps: vec![step("data:image/png;base64,AAAA")],
            is_public: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&tour).unwrap();
        assert!(value.get("ownerId").is_some());
        assert!(value.get("isPublic").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value["steps"][0].get("mediaUri").is_some());
    }

    #[test]
    fn update_omits_absent_fields_on_the_wire() {
        let update = TourUpdate::title("New title");
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, serde_json::json!({"title": "New title"}));

        let empty: TourUpdate = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
