use crate::{crud_api, value_router};
use kisahloka_dal::story_type::{CreateStoryType, StoryTypeRepository, UpdateStoryType};

crud_api!(StoryType);

value_router!();
