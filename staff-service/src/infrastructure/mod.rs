pub mod cache;
pub mod memory;
pub mod staff;
