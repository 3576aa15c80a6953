//! Progress indicators

pub mod typing;
