//! VideoCut Types - Shared domain types
//!
//! This crate contains domain types used across VideoCut services:
//! - User identity and profiles
//! - Subscription tiers and the plan catalog
//! - Subscription status and entitlements
//! - Billing and checkout types

pub mod billing;
pub mod entitlement;
pub mod plan;
pub mod subscription;
pub mod tier;
pub mod user;

pub use billing::*;
pub use entitlement::*;
pub use plan::*;
pub use subscription::*;
pub use tier::*;
pub use user::*;
