pub mod product_lookup;

pub use product_lookup::*;
