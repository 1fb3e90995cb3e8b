//! Systems module - ECS glue around the ballistics core.

pub mod firing;
pub mod profile;
