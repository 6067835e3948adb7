pub mod detector;
pub mod registry;

pub use detector::{Placeholders, VariableDetector};
pub use registry::VariableRegistry;
