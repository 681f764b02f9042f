pub mod message;
pub mod series;
pub mod trend;

pub use message::*;
pub use series::*;
pub use trend::*;
