pub mod chart_renderer;
pub mod report_writer;

pub use chart_renderer::*;
pub use report_writer::*;
