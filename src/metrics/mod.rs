pub mod cpu;
pub mod health;
pub mod history;
