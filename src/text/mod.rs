pub mod anonymize;
pub mod normalize;
pub mod timestamp;

pub use anonymize::*;
pub use normalize::*;
pub use timestamp::*;
