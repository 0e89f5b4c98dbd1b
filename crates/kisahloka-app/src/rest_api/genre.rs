use crate::{crud_api, value_router};
use kisahloka_dal::genre::{CreateGenre, GenreRepository, UpdateGenre};

crud_api!(Genre);

value_router!();
