//! Core data types, scales, unit conversions and report rendering for the
//! weather observer.
//!
//! Everything in this crate is pure: provider I/O lives in `wobs-sources`,
//! delivery in `wobs-sinks`.

pub mod pipeline;
pub mod policy;
pub mod render;
pub mod scales;
pub mod schedule;
pub mod types;
pub mod units;

pub use pipeline::*;
pub use policy::*;
pub use render::*;
pub use scales::*;
pub use schedule::*;
pub use types::*;
pub use units::*;
