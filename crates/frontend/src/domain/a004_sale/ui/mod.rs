pub mod details;
pub mod entry;
pub mod list;
