use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::StoreError;
use crate::memory::MemStorage;
use crate::types::{CommunityStatus, NewCommunity, NewTherapist, NewUser};
use crate::Storage;

/// Controls the demo directory inserted at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SeedConfig {
    /// RNG seed for the stand-in therapist embeddings.
    pub seed: u64,
    /// When false, [`MemStorage::seeded`] returns an empty store.
    pub seed_demo_data: bool,
    pub embedding_dim: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            seed_demo_data: true,
            embedding_dim: 384,
        }
    }
}

impl MemStorage {
    /// Builds a store pre-populated with the demo user, therapists and communities.
    pub fn seeded(cfg: &SeedConfig) -> Result<Self, StoreError> {
        let storage = Self::new();
        if !cfg.seed_demo_data {
            info!("demo seed disabled; starting with an empty directory");
            return Ok(storage);
        }

        storage.create_user(NewUser {
            username: "demo_user".into(),
            email: "user@example.com".into(),
            name: "Demo User".into(),
            preferences: Some(json!({
                "goals": ["anxiety", "productivity"],
                "issues": ["academic_stress", "sleep"],
                "therapistPreferences": "Someone experienced with anxiety and academic stress"
            })),
        })?;

        let mut rng = fastrand::Rng::with_seed(cfg.seed);
        for therapist in demo_therapists() {
            let embedding = (0..cfg.embedding_dim)
                .map(|_| rng.f32() * 2.0 - 1.0)
                .collect();
            storage.create_therapist(NewTherapist {
                vector_embedding: Some(embedding),
                ..therapist
            })?;
        }

        for community in demo_communities() {
            storage.create_community(community)?;
        }

        info!(
            users = storage.user_count()?,
            therapists = storage.therapist_count()?,
            communities = storage.community_count()?,
            seed = cfg.seed,
            dim = cfg.embedding_dim,
            "seeded demo directory"
        );
        Ok(storage)
    }
}

fn demo_therapists() -> Vec<NewTherapist> {
    vec![
        NewTherapist {
            name: "Dr. Sarah Johnson".into(),
            title: "Clinical Psychologist • Anxiety Specialist".into(),
            bio: "I specialize in helping young professionals and students manage anxiety and academic stress through evidence-based cognitive behavioral techniques.".into(),
            photo: "https://images.unsplash.com/photo-1573496359142-b8d87734a5a2?ixlib=rb-4.0.3&ixid=MnwxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8&auto=format&fit=crop&w=150&h=150".into(),
            specialties: vec!["anxiety".into(), "depression".into(), "academic_stress".into()],
            rating: 4.8,
            reviews: 387,
            available: true,
            vector_embedding: None,
        },
        NewTherapist {
            name: "Dr. Michael Chen".into(),
            title: "Licensed Therapist • Performance Coach".into(),
            bio: "Combines cognitive behavioral techniques with performance psychology to help clients achieve their academic and career goals.".into(),
            photo: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?ixlib=rb-4.0.3&ixid=MnwxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8&auto=format&fit=crop&w=100&h=100".into(),
            specialties: vec!["performance".into(), "motivation".into(), "career".into()],
            rating: 4.1,
            reviews: 219,
            available: true,
            vector_embedding: None,
        },
        NewTherapist {
            name: "Dr. Lisa Martinez".into(),
            title: "Clinical Psychologist • Trauma Specialist".into(),
            bio: "Experienced in treating complex trauma, PTSD, and stress-related disorders using evidence-based therapeutic approaches.".into(),
            photo: "https://images.unsplash.com/photo-1618835962148-cf177563c6c0?ixlib=rb-4.0.3&ixid=MnwxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8&auto=format&fit=crop&w=100&h=100".into(),
            specialties: vec!["trauma".into(), "ptsd".into(), "resilience".into()],
            rating: 4.6,
            reviews: 305,
            available: false,
            vector_embedding: None,
        },
    ]
}

fn demo_communities() -> Vec<NewCommunity> {
    let community = |name: &str,
                     description: &str,
                     moderator_id: u64,
                     member_count: u32,
                     tags: [&str; 3],
                     status: CommunityStatus| NewCommunity {
        name: name.into(),
        description: description.into(),
        moderator_id,
        member_count,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        status,
    };
    vec![
        community(
            "Anxiety Support Circle",
            "A safe space to discuss anxiety management techniques, share experiences, and support one another through challenging times.",
            1,
            2189,
            ["anxiety", "stress", "support"],
            CommunityStatus::Active,
        ),
        community(
            "Mindfulness Meditation",
            "Learn and practice various mindfulness techniques to reduce stress, improve focus, and enhance overall mental well-being.",
            2,
            1852,
            ["mindfulness", "meditation", "focus"],
            CommunityStatus::Scheduled,
        ),
        community(
            "Career Transition Support",
            "Navigate career changes and professional development challenges with support from peers and expert guidance.",
            3,
            1246,
            ["career", "transition", "professional"],
            CommunityStatus::Recurring,
        ),
        community(
            "Student Success Network",
            "A supportive community of students and young professionals sharing strategies for academic success, stress management, and career development.",
            1,
            4298,
            ["students", "academic", "career"],
            CommunityStatus::Active,
        ),
    ]
}
