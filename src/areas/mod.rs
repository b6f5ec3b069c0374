pub mod database;
pub mod refs;
pub mod repository;
pub mod stage;
pub mod state;
pub mod workspace;
