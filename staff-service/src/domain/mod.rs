pub mod export;
pub mod pipeline;
pub mod search;
pub mod service;
pub mod staff;
pub mod validation;
