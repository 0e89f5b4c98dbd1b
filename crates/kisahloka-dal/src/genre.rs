use crate::macros::value_entity;

value_entity!(Genre, table = "genre", id = genre_id, name = genre_name);
