pub mod common;
pub mod health;
pub mod meal;
pub mod nutrition;
pub mod storage;
