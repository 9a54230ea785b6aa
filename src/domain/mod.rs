//! Domain layer: aggregates, value objects and diagnostic notices.

pub mod aggregates;
pub mod events;
pub mod value_objects;
