pub mod analysis;
pub mod coaching;
pub mod interpretation;
pub mod metrics;
pub mod transcript;

pub use analysis::*;
pub use coaching::*;
pub use interpretation::*;
pub use metrics::*;
pub use transcript::*;
