//! Optional process-wide default context.
//!
//! Convenience only: every core API takes an explicit `Db`, and tests
//! should construct isolated in-memory contexts instead of touching this.
//! Using the default before `init` is a fatal misconfiguration.

use crate::db::Db;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Db> = OnceLock::new();

/// Install the process-wide default context. Returns false (and keeps
/// the existing context) if one was already installed.
pub fn init(db: Db) -> bool {
    let installed = GLOBAL.set(db).is_ok();
    if !installed {
        log::warn!("global database context already initialized; keeping the existing one");
    }

    installed
}

/// The process-wide default context.
///
/// # Panics
/// Panics when called before `init`; an unconfigured default context is
/// unrecoverable misuse, not a runtime condition.
#[must_use]
pub fn db() -> &'static Db {
    GLOBAL.get().map_or_else(
        || {
            log::error!("global database context used before global::init");
            panic!("global database context used before global::init");
        },
        |db| db,
    )
}

/// Non-panicking accessor.
#[must_use]
pub fn try_db() -> Option<&'static Db> {
    GLOBAL.get()
}
