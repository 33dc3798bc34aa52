pub mod document;
pub mod merge_state;
pub mod minutes;
pub mod segment;

pub use document::*;
pub use merge_state::*;
pub use minutes::*;
pub use segment::*;
