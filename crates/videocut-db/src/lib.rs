//! VideoCut DB - Database abstractions
//!
//! SQLx-based database layer for VideoCut services.
//!
//! # Example
//!
//! ```rust,ignore
//! use videocut_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/videocut").await?;
//! let repos = Repositories::new(pool);
//!
//! let profile = repos.profiles.find_by_id(user_id).await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, DbPool};
pub use repo::*;
