pub mod errors;
pub mod graph;
pub mod module_name;

pub use errors::{AnalysisError, AnalysisResult};
pub use graph::Graph;
pub use graph::layers::{PackageDependency, Route};
