/// Catalog bounded context
///
/// Target entity tables for the content database (seven media types, three
/// person types, studios, genres) and the Change Applier that materializes
/// approved contributions into them.
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use domain::{GenreFields, MediaFields, PersonFields, StudioFields};
pub use infrastructure::{CatalogApplier, ChangeApplier};
