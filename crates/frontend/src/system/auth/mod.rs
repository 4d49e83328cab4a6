pub mod guard;
pub mod storage;
