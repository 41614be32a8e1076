//! Admin access predicate for the payout surface.
//!
//! Advisory only: it gates the payout route, not the aggregation endpoint.
//! The identity is whatever the session boundary hands us (an opaque email,
//! possibly absent); the allow-list comes from `AppConfig` so there is a
//! single copy per process.

/// True if the demo override is set, or the email is an exact member of the
/// allow-list. No case folding; the list holds emails as configured.
pub fn is_admin(email: Option<&str>, demo_override: bool, admins: &[String]) -> bool {
    if demo_override {
        return true;
    }
    match email {
        Some(e) => admins.iter().any(|a| a == e),
        None => false,
    }
}
