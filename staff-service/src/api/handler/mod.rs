pub mod health;
pub mod staff;
