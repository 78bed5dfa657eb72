//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so the HTTP adapter can serialize
//! responses without exposing the domain model's internals.

pub mod adventure;
pub mod cache;
pub mod mogwai;

pub use adventure::*;
pub use cache::*;
pub use mogwai::*;
