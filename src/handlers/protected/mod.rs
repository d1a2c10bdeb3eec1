pub mod items;
pub mod lists;
mod utils;
