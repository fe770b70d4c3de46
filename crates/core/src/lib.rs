//! `parlo-core`: shared domain logic with zero internal dependencies.
//!
//! Everything here is pure: type aliases, the domain error enum, CEFR
//! level ordering with the automated transition rules, and the message
//! sender/category vocabulary. Both the repository layer and the analysis
//! pipeline build on this crate.

pub mod error;
pub mod message;
pub mod proficiency;
pub mod types;
