pub mod batch;
pub mod progress;

pub use batch::*;
pub use progress::*;
