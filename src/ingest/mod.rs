pub mod fetch;
pub mod merge;

pub use fetch::*;
pub use merge::*;
