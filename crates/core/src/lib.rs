//! Core types for contact-identity
//!
//! Domain types shared across the storage, service and HTTP crates: the
//! `Contact` record, validated request attributes and the identity view
//! returned to callers.

mod constants;
mod contact;
pub mod env_config;
mod error;
mod identity;
mod request;

pub use constants::*;
pub use contact::*;
pub use error::*;
pub use identity::*;
pub use request::*;
