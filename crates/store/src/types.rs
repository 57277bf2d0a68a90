use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::RecordId;

/// A therapist profile. The embedding is kept server-side and never
/// serialized to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Therapist {
    pub id: RecordId,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub photo: String,
    pub specialties: Vec<String>,
    pub rating: f32,
    pub reviews: u32,
    pub available: bool,
    #[serde(skip_serializing, default)]
    pub vector_embedding: Option<Vec<f32>>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for [`Therapist`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTherapist {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub photo: String,
    pub specialties: Vec<String>,
    pub rating: f32,
    pub reviews: u32,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub vector_embedding: Option<Vec<f32>>,
}

fn default_available() -> bool {
    true
}

impl NewTherapist {
    pub(crate) fn into_record(self, id: RecordId, created_at: DateTime<Utc>) -> Therapist {
        Therapist {
            id,
            name: self.name,
            title: self.title,
            bio: self.bio,
            photo: self.photo,
            specialties: self.specialties,
            rating: self.rating,
            reviews: self.reviews,
            available: self.available,
            vector_embedding: self.vector_embedding,
            created_at,
        }
    }
}

/// A platform user. Preferences are free-form JSON (goals, issues, therapist preferences).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub preferences: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub preferences: Option<JsonValue>,
}

/// Lifecycle of a community group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CommunityStatus {
    Active,
    Scheduled,
    Recurring,
    Upcoming,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub moderator_id: RecordId,
    pub member_count: u32,
    pub tags: Vec<String>,
    pub status: CommunityStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCommunity {
    pub name: String,
    pub description: String,
    pub moderator_id: RecordId,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: CommunityStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_therapist() -> Therapist {
        NewTherapist {
            name: "Dr. Test".into(),
            title: "Tester".into(),
            bio: "Bio".into(),
            photo: "https://example.com/p.jpg".into(),
            specialties: vec!["anxiety".into()],
            rating: 4.5,
            reviews: 10,
            available: true,
            vector_embedding: Some(vec![0.1, 0.2]),
        }
        .into_record(7, Utc::now())
    }

    #[test]
    fn therapist_serializes_camel_case_without_embedding() {
        let value = serde_json::to_value(sample_therapist()).unwrap();
        assert_eq!(value["id"], json!(7));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("vectorEmbedding").is_none());
        assert!(value.get("vector_embedding").is_none());
    }

    #[test]
    fn new_therapist_defaults_available() {
        let t: NewTherapist = serde_json::from_value(json!({
            "name": "n", "title": "t", "bio": "b", "photo": "p",
            "specialties": [], "rating": 4.0, "reviews": 1
        }))
        .unwrap();
        assert!(t.available);
        assert!(t.vector_embedding.is_none());
    }

    #[test]
    fn community_status_is_lowercase() {
        assert_eq!(
            serde_json::to_value(CommunityStatus::Recurring).unwrap(),
            json!("recurring")
        );
    }
}
