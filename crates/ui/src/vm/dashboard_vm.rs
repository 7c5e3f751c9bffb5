use services::{Dashboard, DashboardCard, DashboardStats};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardCardVm {
    pub career_id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub difficulty: &'static str,
    pub step_count: usize,
    pub percent: u8,
    pub status: &'static str,
}

impl From<&DashboardCard> for DashboardCardVm {
    fn from(card: &DashboardCard) -> Self {
        let status = if card.is_completed() {
            "Completed"
        } else if card.is_started() {
            "In progress"
        } else {
            "Not started"
        };
        Self {
            career_id: card.roadmap.id.to_string(),
            title: card.roadmap.title.clone(),
            description: card.roadmap.description.clone(),
            duration: card.roadmap.estimated_duration.clone(),
            difficulty: card.roadmap.difficulty_level.as_str(),
            step_count: card.roadmap.total_steps(),
            percent: card.display_percent(),
            status,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardVm {
    pub greeting: String,
    pub stream_label: Option<String>,
    pub stats: DashboardStats,
    pub cards: Vec<DashboardCardVm>,
}

#[must_use]
pub fn map_dashboard(dashboard: &Dashboard) -> DashboardVm {
    let greeting = dashboard.user.as_ref().map_or_else(
        || "Welcome back!".to_string(),
        |user| format!("Hello, {}!", user.first_name()),
    );
    let stream_label = dashboard
        .user
        .as_ref()
        .and_then(|user| user.selected_stream)
        .map(|stream| format!("{stream} Stream"));
    DashboardVm {
        greeting,
        stream_label,
        stats: dashboard.stats,
        cards: dashboard.cards.iter().map(DashboardCardVm::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadmap_core::model::{
        CareerId, CareerRoadmap, DifficultyLevel, Stream, User, UserId,
    };

    fn card(percentage: f64) -> DashboardCard {
        DashboardCard {
            roadmap: CareerRoadmap {
                id: CareerId::new("arts-teacher"),
                title: "Teacher".into(),
                stream: Stream::Arts,
                description: "Shape young minds".into(),
                steps: Vec::new(),
                estimated_duration: "4-5 years".into(),
                difficulty_level: DifficultyLevel::Intermediate,
            },
            progress_percentage: percentage,
        }
    }

    #[test]
    fn card_status_follows_percentage() {
        assert_eq!(DashboardCardVm::from(&card(0.0)).status, "Not started");
        assert_eq!(DashboardCardVm::from(&card(50.0)).status, "In progress");
        assert_eq!(DashboardCardVm::from(&card(100.0)).status, "Completed");
    }

    #[test]
    fn greeting_uses_first_name_and_stream() {
        let user = User::new(UserId::new("u1"), "Kavya Nair", "k@example.com")
            .with_stream(Stream::Arts);
        let dashboard = Dashboard {
            user: Some(user),
            cards: vec![card(16.7)],
            stats: DashboardStats {
                total: 1,
                started: 1,
                completed: 0,
            },
        };
        let vm = map_dashboard(&dashboard);
        assert_eq!(vm.greeting, "Hello, Kavya!");
        assert_eq!(vm.stream_label.as_deref(), Some("Arts Stream"));
        assert_eq!(vm.cards[0].percent, 17);
    }
}
