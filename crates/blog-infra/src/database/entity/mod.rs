//! SeaORM entities. Table definitions double as schema source for `init_schema`.

pub mod comment;
pub mod post;
pub mod user;
