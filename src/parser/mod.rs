pub mod binary;
pub mod format;
pub mod main;
pub mod stream;
pub mod text;
pub mod ulog;

pub use binary::*;
pub use format::*;
pub use main::*;
pub use stream::*;
pub use text::*;
pub use ulog::*;
