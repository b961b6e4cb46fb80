pub mod encoding;
pub mod rolling;

pub use encoding::*;
pub use rolling::*;
