pub mod health;
pub mod meal;
pub mod server;
