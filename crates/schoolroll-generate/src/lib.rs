//! Seeded data generation for the school roster.
//!
//! The engine drives an [`EntityFactory`] and a set of quota allocators
//! through the `Store` interface, one awaited write at a time.

pub mod address;
pub mod allocator;
pub mod engine;
pub mod errors;
pub mod factory;
pub mod model;

pub use allocator::{ClassificationAxes, QuotaAllocator, StudentDraws, WeightedPool};
pub use engine::DataGenerator;
pub use errors::GenerationError;
pub use factory::EntityFactory;
pub use model::{AxisCount, AxisReport, GenerateOptions, GenerationReport, TableReport};
