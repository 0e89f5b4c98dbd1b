use crate::macros::value_entity;

value_entity!(StoryType, table = "type", id = type_id, name = type_name);
