mod auth;
mod ids;
mod progress;
mod resource;
mod roadmap;
mod stream;
pub mod timestamp;
mod user;

pub use auth::{LoginDraft, RegistrationDraft, ValidLogin, ValidRegistration, ValidationError};
pub use ids::{CareerId, StepId, UserId};
pub use progress::{ProgressUpdate, UserProgress, display_percent, progress_percentage};
pub use resource::ResourceLink;
pub use roadmap::{CareerRoadmap, RoadmapError, RoadmapStep};
pub use stream::{DifficultyLevel, ParseStreamError, Stream};
pub use user::{AuthToken, User};
