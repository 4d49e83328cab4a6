pub mod assign;
pub mod details;
pub mod list;
