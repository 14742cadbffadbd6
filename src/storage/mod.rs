pub mod output_paths;
pub mod table_io;

pub use output_paths::*;
pub use table_io::*;
