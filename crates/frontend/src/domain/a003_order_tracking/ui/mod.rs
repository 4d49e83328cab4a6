pub mod list;
pub mod reject;
