pub mod stage0_ingest;
pub mod stage1_segment;
pub mod stage2_aggregate;
pub mod stage3_render;
pub mod stage_generate;

pub use stage0_ingest::*;
pub use stage1_segment::*;
pub use stage2_aggregate::*;
pub use stage3_render::*;
pub use stage_generate::*;
