//! Core domain concepts shared across all subdomains.
//!
//! - [`generation::GenerationParams`]: static model/sampling parameters sent with every request
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod generation;
