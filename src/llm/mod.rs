pub mod client;
pub mod error;
pub mod model;
pub mod prompts;
pub mod validation;

pub use client::*;
pub use error::*;
pub use model::*;
pub use prompts::*;
pub use validation::*;
