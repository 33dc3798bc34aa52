pub mod stage0_chunk;
pub mod stage1_request;
pub mod stage2_merge;
pub mod stage3_reconcile;
pub mod stage4_dedupe;
pub mod stage5_finalize;

pub use stage0_chunk::*;
pub use stage1_request::*;
pub use stage2_merge::*;
pub use stage3_reconcile::*;
pub use stage4_dedupe::*;
pub use stage5_finalize::*;
