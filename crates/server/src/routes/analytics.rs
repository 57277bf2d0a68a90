use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use realeader::{CommunityStatus, Storage};
use serde::Serialize;
use std::sync::Arc;

/// Dashboard payload. Counts come from the store; the rest are fixed demo figures.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub users: UserStats,
    pub sessions: SessionStats,
    pub revenue: RevenueStats,
    pub therapists: DirectoryStats,
    pub communities: DirectoryStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: usize,
    pub growth: f64,
    pub retention: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total: usize,
    pub avg_duration: f64,
    pub satisfaction: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueStats {
    pub mrr: u64,
    pub projected_arr: u64,
    pub cac: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStats {
    pub total: usize,
    pub active: usize,
    pub new_this_month: u32,
}

/// Dashboard analytics
pub async fn analytics(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let storage = state.pipeline.storage();
    let users = storage.all_users()?;
    let therapists = storage.all_therapists()?;
    let communities = storage.all_communities()?;

    Ok(Json(Analytics {
        users: UserStats {
            total: users.len(),
            growth: 24.3,
            retention: 78.4,
        },
        // Chat sessions are not tracked, so the total is always zero.
        sessions: SessionStats {
            total: 0,
            avg_duration: 18.5,
            satisfaction: 94.2,
        },
        revenue: RevenueStats {
            mrr: 842_500,
            projected_arr: 14_200_000,
            cac: 24.80,
        },
        therapists: DirectoryStats {
            total: therapists.len(),
            active: therapists.iter().filter(|t| t.available).count(),
            new_this_month: 124,
        },
        communities: DirectoryStats {
            total: communities.len(),
            active: communities
                .iter()
                .filter(|c| c.status == CommunityStatus::Active)
                .count(),
            new_this_month: 32,
        },
    }))
}
