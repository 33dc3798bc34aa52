pub mod backfill;
pub mod compose;
pub mod generate;

pub use backfill::*;
pub use compose::*;
pub use generate::*;
