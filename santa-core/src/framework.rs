use sqlx::PgPool;

pub struct DatabaseProcessor {
    pub pool: PgPool,
}

/// How an event scope holds its event.
///
/// `Shared` scopes run alongside each other; an `Exclusive` scope waits for
/// every other scope on the same event and blocks new ones until it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockMode {
    Shared,
    Exclusive,
}

impl LockMode {
    /// The Postgres row-locking clause matching this mode.
    pub fn row_lock_clause(self) -> &'static str {
        match self {
            LockMode::Shared => "FOR SHARE",
            LockMode::Exclusive => "FOR UPDATE",
        }
    }
}
