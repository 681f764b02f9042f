//! Parameter reference tables and name lookups
//!
//! Three layers resolve a parameter: raw log name -> canonical internal name
//! -> display name and [`ParameterDefinition`]. All tables are immutable and
//! indexed once per process.

pub mod definitions;
pub mod mapper;
pub mod mapping;

pub use definitions::*;
pub use mapper::*;
pub use mapping::*;
