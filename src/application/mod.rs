//! Application layer - Use cases over the domain and the ports they need

pub mod dto;
pub mod ports;
pub mod services;
