//! Visitor Identity
//!
//! A pseudonymous token generated once per browser and reused across
//! sessions, for page-view attribution and vote deduplication. Stored in a
//! cookie durable for one year; not guaranteed globally unique, but random
//! generation makes collisions negligible.

use uuid::Uuid;

use crate::widget::host::HostEnv;

pub const VISITOR_COOKIE: &str = "updeck_visitor_id";

const ONE_YEAR_SECS: u64 = 60 * 60 * 24 * 365;

/// Get the stored visitor token, generating and persisting one when absent.
pub fn visitor_id(env: &mut dyn HostEnv) -> String {
    if let Some(stored) = env.cookie(VISITOR_COOKIE) {
        if !stored.is_empty() {
            return stored;
        }
    }

    let id = Uuid::new_v4().simple().to_string();
    env.set_cookie(VISITOR_COOKIE, &id, ONE_YEAR_SECS);
    id
}
