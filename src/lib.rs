pub mod config;
pub mod error;
pub mod math;
pub mod operations;
pub mod records;
pub mod stripe;
pub mod topology;

pub use config::{FailurePolicy, LayoutConfig};
pub use error::{LayoutError, Result};
pub use operations::assemble::{CompileLayout, Layout, LayoutSources};
