pub mod applier;

pub use applier::{CatalogApplier, ChangeApplier};
