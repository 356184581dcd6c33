pub mod fillers;
pub mod words;

pub use fillers::*;
pub use words::*;
