use thiserror::Error;

use crate::model::{ParseStreamError, RoadmapError, ValidationError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Roadmap(#[from] RoadmapError),
    #[error(transparent)]
    Stream(#[from] ParseStreamError),
}
