pub mod builder;
pub mod entities;
pub mod projector;
pub mod store;

pub use builder::{BuildError, Formulation, formulate};
pub use entities::{Blend, Country, Mine, Plant};
pub use projector::{
    DistributionRow, OreShipmentRow, ProductionRow, SolveError, SolveReport, TONNAGE_TOLERANCE,
    project, solve,
};
pub use store::EntityStore;
