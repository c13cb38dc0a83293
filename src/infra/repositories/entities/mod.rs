//! SeaORM entities. Rows convert into domain types at the repository edge.

pub mod user;
