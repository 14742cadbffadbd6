pub mod frequency;
pub mod game_record;

pub use frequency::*;
pub use game_record::*;
