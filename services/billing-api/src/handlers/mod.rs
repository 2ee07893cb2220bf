//! REST API handlers

pub mod billing;
pub mod health;
pub mod plans;
pub mod profile;

pub use billing::*;
pub use health::*;
pub use plans::*;
pub use profile::*;
