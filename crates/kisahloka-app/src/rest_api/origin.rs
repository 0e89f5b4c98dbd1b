use crate::{crud_api, value_router};
use kisahloka_dal::origin::{CreateOrigin, OriginRepository, UpdateOrigin};

crud_api!(Origin);

value_router!();
