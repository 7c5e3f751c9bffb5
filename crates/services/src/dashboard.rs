use std::collections::HashMap;
use std::sync::Arc;

use roadmap_core::model::{CareerId, CareerRoadmap, User, UserProgress, display_percent};

use crate::api::RoadmapApi;
use crate::error::DashboardError;
use crate::session::SessionContext;

/// One roadmap on the dashboard with the user's progress on it.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCard {
    pub roadmap: CareerRoadmap,
    pub progress_percentage: f64,
}

impl DashboardCard {
    #[must_use]
    pub fn display_percent(&self) -> u8 {
        display_percent(self.progress_percentage)
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.progress_percentage > 0.0
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.progress_percentage >= 100.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub started: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub user: Option<User>,
    pub cards: Vec<DashboardCard>,
    pub stats: DashboardStats,
}

/// Join roadmaps with progress records by career id.
///
/// Records for roadmaps outside the list are ignored. Each percentage is
/// recomputed against the roadmap it belongs to.
#[must_use]
pub fn aggregate(
    roadmaps: Vec<CareerRoadmap>,
    progress: Vec<UserProgress>,
) -> (Vec<DashboardCard>, DashboardStats) {
    let mut by_career: HashMap<CareerId, UserProgress> = progress
        .into_iter()
        .map(|record| (record.career_id.clone(), record))
        .collect();

    let cards: Vec<DashboardCard> = roadmaps
        .into_iter()
        .map(|roadmap| {
            let progress_percentage = match by_career.remove(&roadmap.id) {
                Some(mut record) => {
                    if let Some(reported) = record.reconcile_with(&roadmap) {
                        tracing::debug!(
                            career_id = %roadmap.id,
                            reported,
                            recomputed = record.progress_percentage,
                            "progress percentage drifted"
                        );
                    }
                    record.progress_percentage
                }
                None => 0.0,
            };
            DashboardCard {
                roadmap,
                progress_percentage,
            }
        })
        .collect();

    let stats = DashboardStats {
        total: cards.len(),
        started: cards.iter().filter(|card| card.is_started()).count(),
        completed: cards.iter().filter(|card| card.is_completed()).count(),
    };
    (cards, stats)
}

/// Loads the roadmaps for the user's stream together with their progress.
#[derive(Clone)]
pub struct DashboardService {
    api: Arc<dyn RoadmapApi>,
    session: Arc<SessionContext>,
}

impl DashboardService {
    #[must_use]
    pub fn new(api: Arc<dyn RoadmapApi>, session: Arc<SessionContext>) -> Self {
        Self { api, session }
    }

    /// # Errors
    ///
    /// Returns `DashboardError::NotAuthenticated` without a stored token and
    /// `DashboardError::Api` if either request fails. A rejected token also
    /// clears the stored session.
    pub async fn load(&self) -> Result<Dashboard, DashboardError> {
        let token = self
            .session
            .token()
            .await?
            .ok_or(DashboardError::NotAuthenticated)?;
        let user = match self.session.user().await {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable cached user");
                None
            }
        };
        let stream = user.as_ref().and_then(|user| user.selected_stream);

        let roadmaps = self
            .session
            .expire_on_rejection(self.api.list_roadmaps(&token, stream).await)
            .await?;
        let progress = self
            .session
            .expire_on_rejection(self.api.list_progress(&token).await)
            .await?;
        tracing::debug!(
            roadmaps = roadmaps.len(),
            progress = progress.len(),
            "dashboard loaded"
        );

        let (cards, stats) = aggregate(roadmaps, progress);
        Ok(Dashboard { user, cards, stats })
    }

    /// Re-fetch both resources; nothing is cached between loads.
    ///
    /// # Errors
    ///
    /// Same as [`DashboardService::load`].
    pub async fn refresh(&self) -> Result<Dashboard, DashboardError> {
        self.load().await
    }
}
