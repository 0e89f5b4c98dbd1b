use crate::macros::value_entity;

value_entity!(Origin, table = "origin", id = origin_id, name = origin_name);
