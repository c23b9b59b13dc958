pub mod best_match;
pub mod fuzzy;

pub use best_match::*;
pub use fuzzy::*;
