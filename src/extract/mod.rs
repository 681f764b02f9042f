//! Message extraction: semantic grouping and the flight summary
pub mod groups;
pub mod summary;

pub use groups::*;
pub use summary::*;
