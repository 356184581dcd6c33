pub mod pipeline;
pub mod stage0_parse;
pub mod stage1_metrics;
pub mod stage2_interpret;
pub mod stage3_coaching;
pub mod stage4_render;
pub mod stage_speaker_id;

pub use pipeline::*;
pub use stage0_parse::*;
pub use stage1_metrics::*;
pub use stage2_interpret::*;
pub use stage3_coaching::*;
pub use stage4_render::*;
pub use stage_speaker_id::*;
