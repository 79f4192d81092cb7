pub mod highlight;
pub mod output;

pub use highlight::MarkdownRenderer;
pub use output::*;
