//! Store (tenant) rules: subdomain format and lifecycle transitions.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::status::StoreStatus;

pub const MIN_SUBDOMAIN_LEN: usize = 3;
pub const MAX_SUBDOMAIN_LEN: usize = 63;
pub const MAX_STORE_NAME_LEN: usize = 120;

/// Subdomains the platform keeps for itself.
pub const RESERVED_SUBDOMAINS: &[&str] = &["www", "api", "admin", "app", "mail", "static"];

static SUBDOMAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$").expect("valid regex"));

/// Normalize a requested subdomain (trim + lowercase) and validate it.
///
/// Returns the normalized value to persist.
pub fn normalize_subdomain(raw: &str) -> Result<String, CoreError> {
    let subdomain = raw.trim().to_ascii_lowercase();
    let len = subdomain.len();
    if !(MIN_SUBDOMAIN_LEN..=MAX_SUBDOMAIN_LEN).contains(&len) {
        return Err(CoreError::Validation(format!(
            "Subdomain must be between {MIN_SUBDOMAIN_LEN} and {MAX_SUBDOMAIN_LEN} characters"
        )));
    }
    if !SUBDOMAIN_RE.is_match(&subdomain) {
        return Err(CoreError::Validation(
            "Subdomain may only contain lowercase letters, digits and inner hyphens".into(),
        ));
    }
    if RESERVED_SUBDOMAINS.contains(&subdomain.as_str()) {
        return Err(CoreError::Validation(format!(
            "Subdomain '{subdomain}' is reserved"
        )));
    }
    Ok(subdomain)
}

pub fn validate_store_name(name: &str) -> Result<(), CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Store name must not be empty".into()));
    }
    if name.chars().count() > MAX_STORE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Store name must be at most {MAX_STORE_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Who is asking for a status change. Suspension is an operator action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusActor {
    Owner,
    Operator,
}

/// Validate a store status transition.
///
/// ```text
/// Borrador   -> Activa (needs a plan), Inactiva
/// Activa     -> Suspendida (operator), Inactiva
/// Suspendida -> Activa (operator), Inactiva
/// Inactiva   -> (terminal)
/// ```
pub fn check_status_transition(
    from: StoreStatus,
    to: StoreStatus,
    has_plan: bool,
    actor: StatusActor,
) -> Result<(), CoreError> {
    use StoreStatus::*;

    if from == to {
        return Err(CoreError::Conflict(format!("Store is already {to}")));
    }

    let allowed = match (from, to) {
        (Draft, Active) => {
            if !has_plan {
                return Err(CoreError::Conflict(
                    "A subscription plan is required before activating the store".into(),
                ));
            }
            true
        }
        (Active, Suspended) | (Suspended, Active) => {
            if actor != StatusActor::Operator {
                return Err(CoreError::Forbidden(
                    "Only the platform operator can suspend or reinstate a store".into(),
                ));
            }
            true
        }
        (Draft | Active | Suspended, Inactive) => true,
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot change store status from {from} to {to}"
        )))
    }
}

/// Whether customers can browse and buy from a store in this status.
pub fn is_open_for_business(status: StoreStatus) -> bool {
    status == StoreStatus::Active
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn subdomain_is_normalized() {
        assert_eq!(normalize_subdomain("  Mi-Tienda ").unwrap(), "mi-tienda");
        assert_eq!(normalize_subdomain("abc").unwrap(), "abc");
        assert_eq!(normalize_subdomain("tienda42").unwrap(), "tienda42");
    }

    #[test]
    fn subdomain_rejects_bad_shapes() {
        assert!(normalize_subdomain("ab").is_err());
        assert!(normalize_subdomain("-tienda").is_err());
        assert!(normalize_subdomain("tienda-").is_err());
        assert!(normalize_subdomain("mi_tienda").is_err());
        assert!(normalize_subdomain("mi.tienda").is_err());
        assert!(normalize_subdomain("tiénda").is_err());
        assert!(normalize_subdomain(&"a".repeat(64)).is_err());
    }

    #[test]
    fn subdomain_rejects_reserved() {
        assert_matches!(normalize_subdomain("WWW"), Err(CoreError::Validation(msg)) if msg.contains("reserved"));
        assert!(normalize_subdomain("admin").is_err());
    }

    #[test]
    fn store_name_validation() {
        assert!(validate_store_name("La Esquina").is_ok());
        assert!(validate_store_name("   ").is_err());
        assert!(validate_store_name(&"x".repeat(121)).is_err());
    }

    #[test]
    fn activation_requires_plan() {
        use StoreStatus::*;
        assert_matches!(
            check_status_transition(Draft, Active, false, StatusActor::Owner),
            Err(CoreError::Conflict(_))
        );
        assert!(check_status_transition(Draft, Active, true, StatusActor::Owner).is_ok());
    }

    #[test]
    fn suspension_is_operator_only() {
        use StoreStatus::*;
        assert_matches!(
            check_status_transition(Active, Suspended, true, StatusActor::Owner),
            Err(CoreError::Forbidden(_))
        );
        assert!(check_status_transition(Active, Suspended, true, StatusActor::Operator).is_ok());
        assert!(check_status_transition(Suspended, Active, true, StatusActor::Operator).is_ok());
        assert!(check_status_transition(Suspended, Active, true, StatusActor::Owner).is_err());
    }

    #[test]
    fn inactive_is_terminal() {
        use StoreStatus::*;
        for to in [Draft, Active, Suspended] {
            assert!(check_status_transition(Inactive, to, true, StatusActor::Operator).is_err());
        }
        assert!(check_status_transition(Inactive, Inactive, true, StatusActor::Operator).is_err());
    }

    #[test]
    fn anything_open_can_be_closed() {
        use StoreStatus::*;
        for from in [Draft, Active, Suspended] {
            assert!(check_status_transition(from, Inactive, false, StatusActor::Owner).is_ok());
        }
    }

    #[test]
    fn only_active_stores_sell() {
        assert!(is_open_for_business(StoreStatus::Active));
        assert!(!is_open_for_business(StoreStatus::Draft));
        assert!(!is_open_for_business(StoreStatus::Suspended));
    }
}
