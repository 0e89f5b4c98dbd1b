use crate::macros::value_entity;

value_entity!(Role, table = "role", id = role_id, name = role_name);
