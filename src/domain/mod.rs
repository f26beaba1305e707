//! Domain - element definitions, built-in content and the declarative bundle loader

pub mod builtin;
pub mod content;
pub mod elements;

pub use content::{ElementCatalog, ReactionRule};
pub use elements::{Category, ElementDef, ElementId, Flammability, PhaseTarget};
