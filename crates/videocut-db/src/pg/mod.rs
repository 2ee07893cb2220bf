//! PostgreSQL repository implementations

mod profile;
mod session;
mod subscriber;

pub use profile::PgProfileRepository;
pub use session::PgSessionRepository;
pub use subscriber::PgSubscriberRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub profiles: PgProfileRepository,
    pub subscribers: PgSubscriberRepository,
    pub sessions: PgSessionRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            profiles: PgProfileRepository::new(pool.clone()),
            subscribers: PgSubscriberRepository::new(pool.clone()),
            sessions: PgSessionRepository::new(pool),
        }
    }
}
