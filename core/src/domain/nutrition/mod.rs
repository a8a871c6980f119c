pub mod aggregation;
pub mod engine;
pub mod entities;
pub mod gauges;
pub mod recommendations;
pub mod standards;
pub mod value_objects;

pub use engine::NutritionEngine;
pub use entities::*;
pub use standards::StandardsTable;
pub use value_objects::*;
