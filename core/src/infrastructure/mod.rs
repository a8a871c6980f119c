pub mod db;
pub mod health;
pub mod meal;
pub mod object_storage;
pub mod recognition;
