pub mod constants;
pub mod markdown;
pub mod render;
pub mod terminal;
