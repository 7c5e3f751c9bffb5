use roadmap_core::model::{CareerRoadmap, ResourceLink, StepId};
use services::ProgressSnapshot;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceVm {
    pub label: String,
    pub link: ResourceLink,
    pub openable: bool,
}

/// One step in display order; `number` starts at 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoadmapStepVm {
    pub id: StepId,
    pub number: usize,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub completed: bool,
    pub in_flight: bool,
    /// Whether a connector line follows this step.
    pub has_next: bool,
    pub resources: Vec<ResourceVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoadmapVm {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub difficulty: &'static str,
    pub percent: u8,
    pub completed_count: usize,
    pub total_steps: usize,
    pub steps: Vec<RoadmapStepVm>,
}

#[must_use]
pub fn map_roadmap(roadmap: &CareerRoadmap, snapshot: &ProgressSnapshot) -> RoadmapVm {
    let total_steps = roadmap.total_steps();
    let steps = roadmap
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| RoadmapStepVm {
            id: step.id.clone(),
            number: index + 1,
            title: step.title.clone(),
            description: step.description.clone(),
            duration: step.duration.clone(),
            completed: snapshot.is_completed(&step.id),
            in_flight: snapshot.is_in_flight(&step.id),
            has_next: index + 1 < total_steps,
            resources: step
                .resource_links()
                .into_iter()
                .map(|link| ResourceVm {
                    label: link.label(),
                    openable: link.as_url().is_some(),
                    link,
                })
                .collect(),
        })
        .collect();

    RoadmapVm {
        title: roadmap.title.clone(),
        description: roadmap.description.clone(),
        duration: roadmap.estimated_duration.clone(),
        difficulty: roadmap.difficulty_level.as_str(),
        percent: snapshot.display_percent,
        completed_count: snapshot.completed_steps.len(),
        total_steps,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use roadmap_core::model::{CareerId, DifficultyLevel, RoadmapStep, Stream};

    fn roadmap() -> CareerRoadmap {
        let step = |id: &str, resources: Vec<&str>| RoadmapStep {
            id: StepId::from(id),
            title: format!("Step {id}"),
            description: String::new(),
            resources: resources.into_iter().map(String::from).collect(),
            duration: "2 years".into(),
        };
        CareerRoadmap {
            id: CareerId::new("science-doctor"),
            title: "Doctor".into(),
            stream: Stream::Science,
            description: String::new(),
            steps: vec![
                step("1", vec!["https://neet.nta.nic.in/"]),
                step("2", vec!["Medical Colleges"]),
                step("3", Vec::new()),
            ],
            estimated_duration: "5.5 years".into(),
            difficulty_level: DifficultyLevel::Advanced,
        }
    }

    #[test]
    fn steps_are_numbered_with_connectors_between() {
        let snapshot = ProgressSnapshot {
            completed_steps: BTreeSet::from([StepId::from("2")]),
            percentage: 100.0 / 3.0,
            display_percent: 33,
            in_flight: BTreeSet::from([StepId::from("3")]),
        };
        let vm = map_roadmap(&roadmap(), &snapshot);

        let numbers: Vec<usize> = vm.steps.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        let connectors: Vec<bool> = vm.steps.iter().map(|s| s.has_next).collect();
        assert_eq!(connectors, vec![true, true, false]);
        assert!(vm.steps[1].completed);
        assert!(vm.steps[2].in_flight);
        assert_eq!(vm.completed_count, 1);
        assert_eq!(vm.percent, 33);
    }

    #[test]
    fn resources_are_classified() {
        let snapshot = ProgressSnapshot {
            completed_steps: BTreeSet::new(),
            percentage: 0.0,
            display_percent: 0,
            in_flight: BTreeSet::new(),
        };
        let vm = map_roadmap(&roadmap(), &snapshot);
        assert!(vm.steps[0].resources[0].openable);
        assert_eq!(vm.steps[0].resources[0].label, "neet.nta.nic.in");
        assert!(!vm.steps[1].resources[0].openable);
        assert_eq!(vm.steps[1].resources[0].label, "Medical Colleges");
    }
}
