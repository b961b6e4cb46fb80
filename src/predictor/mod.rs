pub mod forest;
pub mod metrics;
pub mod training;

pub use forest::*;
pub use metrics::*;
pub use training::*;
