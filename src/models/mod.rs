pub mod data;
pub mod rules;

pub use data::*;
pub use rules::{DocumentKind, GovernmentSource, IdRule, NameRule};
