pub mod entities;

pub use entities::{parse_fields, GenreFields, MediaFields, PersonFields, StudioFields};
