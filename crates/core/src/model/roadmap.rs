use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{CareerId, StepId};
use crate::model::resource::ResourceLink;
use crate::model::stream::{DifficultyLevel, Stream};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoadmapError {
    #[error("roadmap title cannot be empty")]
    EmptyTitle,

    #[error("duplicate step id {0} in roadmap")]
    DuplicateStepId(StepId),
}

//
// ─── STEP ──────────────────────────────────────────────────────────────────────
//

/// One unit of a roadmap. Position in `CareerRoadmap::steps` is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub id: StepId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub duration: String,
}

impl RoadmapStep {
    /// Resources classified as openable links or plain labels.
    #[must_use]
    pub fn resource_links(&self) -> Vec<ResourceLink> {
        self.resources
            .iter()
            .map(|raw| ResourceLink::classify(raw))
            .collect()
    }
}

//
// ─── ROADMAP ───────────────────────────────────────────────────────────────────
//

/// Read-only curriculum toward a named career.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerRoadmap {
    pub id: CareerId,
    pub title: String,
    pub stream: Stream,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<RoadmapStep>,
    #[serde(default)]
    pub estimated_duration: String,
    pub difficulty_level: DifficultyLevel,
}

impl CareerRoadmap {
    /// Checks the structural invariants the client relies on.
    ///
    /// # Errors
    ///
    /// Returns `RoadmapError::EmptyTitle` for a blank title and
    /// `RoadmapError::DuplicateStepId` if two steps share an id.
    pub fn validate(&self) -> Result<(), RoadmapError> {
        if self.title.trim().is_empty() {
            return Err(RoadmapError::EmptyTitle);
        }
        let mut seen = HashSet::with_capacity(self.steps.len());
        for step in &self.steps {
            if !seen.insert(&step.id) {
                return Err(RoadmapError::DuplicateStepId(step.id.clone()));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn contains_step(&self, step_id: &StepId) -> bool {
        self.steps.iter().any(|step| &step.id == step_id)
    }

    #[must_use]
    pub fn step(&self, step_id: &StepId) -> Option<&RoadmapStep> {
        self.steps.iter().find(|step| &step.id == step_id)
    }

    pub fn step_ids(&self) -> impl Iterator<Item = &StepId> {
        self.steps.iter().map(|step| &step.id)
    }
}
