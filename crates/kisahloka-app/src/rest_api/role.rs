use crate::{crud_api, value_router};
use kisahloka_dal::role::{CreateRole, RoleRepository, UpdateRole};

crud_api!(Role);

value_router!();
