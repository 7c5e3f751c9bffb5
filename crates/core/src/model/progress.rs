use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::ids::{CareerId, StepId, UserId};
use crate::model::roadmap::CareerRoadmap;

/// Percentage of `completed` out of `total`, defined as 0 for an empty roadmap.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress_percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (completed as f64 / total as f64) * 100.0
}

/// Integer percentage shown to users (16.67 -> 17).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn display_percent(percentage: f64) -> u8 {
    if !percentage.is_finite() {
        return 0;
    }
    percentage.clamp(0.0, 100.0).round() as u8
}

/// Per-user, per-roadmap completion record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub user_id: UserId,
    pub career_id: CareerId,
    #[serde(default)]
    pub completed_steps: BTreeSet<StepId>,
    #[serde(default)]
    pub progress_percentage: f64,
    #[serde(default, with = "crate::model::timestamp::option")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl UserProgress {
    /// Record for a roadmap the user has not touched yet.
    #[must_use]
    pub fn empty(user_id: UserId, career_id: CareerId) -> Self {
        Self {
            user_id,
            career_id,
            completed_steps: BTreeSet::new(),
            progress_percentage: 0.0,
            last_updated: None,
        }
    }

    /// Add or remove `step_id`, then recompute the percentage.
    ///
    /// Membership is set-based, so marking a completed step complete again
    /// leaves the record unchanged.
    pub fn apply_toggle(&mut self, step_id: &StepId, completed: bool, total_steps: usize) {
        if completed {
            self.completed_steps.insert(step_id.clone());
        } else {
            self.completed_steps.remove(step_id);
        }
        self.recompute(total_steps);
    }

    pub fn recompute(&mut self, total_steps: usize) {
        self.progress_percentage = progress_percentage(self.completed_steps.len(), total_steps);
    }

    /// Drop step ids the roadmap doesn't know and recompute the percentage.
    ///
    /// Returns the server-reported percentage when it disagreed with the
    /// recomputed value, so callers can log the drift.
    pub fn reconcile_with(&mut self, roadmap: &CareerRoadmap) -> Option<f64> {
        let reported = self.progress_percentage;
        self.completed_steps
            .retain(|step_id| roadmap.contains_step(step_id));
        self.recompute(roadmap.total_steps());
        let drifted = (reported - self.progress_percentage).abs() > 0.01;
        drifted.then_some(reported)
    }

    #[must_use]
    pub fn is_step_completed(&self, step_id: &StepId) -> bool {
        self.completed_steps.contains(step_id)
    }

    /// True when every step of `roadmap` is marked complete.
    #[must_use]
    pub fn is_complete_for(&self, roadmap: &CareerRoadmap) -> bool {
        roadmap
            .step_ids()
            .all(|step_id| self.completed_steps.contains(step_id))
    }

    #[must_use]
    pub fn display_percent(&self) -> u8 {
        display_percent(self.progress_percentage)
    }
}

/// Body of `POST /api/progress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub career_id: CareerId,
    pub step_id: StepId,
    pub completed: bool,
}
