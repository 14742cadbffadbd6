pub mod column_validator;
pub mod frequency_aggregator;
pub mod game_cleaner;
pub mod platform_parser;
pub mod release_calendar;

pub use column_validator::*;
pub use frequency_aggregator::*;
pub use game_cleaner::*;
pub use platform_parser::*;
pub use release_calendar::*;
