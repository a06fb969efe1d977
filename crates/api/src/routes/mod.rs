pub mod functions;
pub mod health;
