//! Multi-tenant access gate.
//!
//! Decides whether a session may open a route (client navigation) or touch a
//! store's resources (server-side checks). Both sides share the same
//! precedence so a route the SPA lets through never hits a 403 it could
//! have predicted.
//!
//! Precedence for [`authorize`]:
//!
//! 1. No session: redirect to `/login?returnUrl=<path>`.
//! 2. Role not allowed: redirect to `/`.
//! 3. Store required, session is an Admin without a store: redirect to
//!    `/onboarding` (unless the path is already under `/onboarding`).
//! 4. Otherwise allow.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
pub const ONBOARDING_PATH: &str = "/onboarding";

/// The identity facts an access decision depends on.
///
/// Built from verified JWT claims on the server; the client builds the same
/// thing from its stored session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: DbId,
    pub role: Role,
    pub store_id: Option<DbId>,
    pub email_verified: bool,
}

impl Session {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }
}

/// What a route demands of the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequirement {
    /// Allowed roles. Empty means any authenticated user.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Whether store staff must already own/belong to a store.
    #[serde(default)]
    pub require_store: bool,
}

impl AccessRequirement {
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn roles(roles: &[Role]) -> Self {
        Self {
            roles: roles.to_vec(),
            require_store: false,
        }
    }

    pub fn with_store(mut self) -> Self {
        self.require_store = true;
        self
    }

    /// Whether `role` satisfies the role list. SuperAdmin passes anywhere
    /// Admin does.
    pub fn allows_role(&self, role: Role) -> bool {
        if self.roles.is_empty() || self.roles.contains(&role) {
            return true;
        }
        role == Role::SuperAdmin && self.roles.contains(&Role::Admin)
    }
}

/// Outcome of a navigation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "redirect_to", rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    RedirectTo(String),
}

/// Decide whether `session` may open `path` under `requirement`.
pub fn authorize(
    session: Option<&Session>,
    requirement: &AccessRequirement,
    path: &str,
) -> AccessDecision {
    let Some(session) = session else {
        return AccessDecision::RedirectTo(login_redirect(path));
    };

    if !requirement.allows_role(session.role) {
        return AccessDecision::RedirectTo(HOME_PATH.to_string());
    }

    if requirement.require_store && session.store_id.is_none() {
        match session.role {
            Role::Admin if is_under(path, ONBOARDING_PATH) => {}
            Role::Admin => return AccessDecision::RedirectTo(ONBOARDING_PATH.to_string()),
            // Warehouse staff cannot onboard a store themselves.
            Role::Deposito => return AccessDecision::RedirectTo(HOME_PATH.to_string()),
            Role::SuperAdmin | Role::Cliente => {}
        }
    }

    AccessDecision::Allow
}

/// Resolve the requirement for a SPA route, or `None` for public routes.
pub fn requirement_for_path(path: &str) -> Option<AccessRequirement> {
    if is_under(path, "/superadmin") {
        return Some(AccessRequirement::roles(&[Role::SuperAdmin]));
    }
    if is_under(path, "/admin") || is_under(path, ONBOARDING_PATH) {
        return Some(AccessRequirement::roles(&[Role::Admin]).with_store());
    }
    if is_under(path, "/deposito") {
        return Some(AccessRequirement::roles(&[Role::Deposito, Role::Admin]).with_store());
    }
    const AUTHENTICATED: &[&str] = &[
        "/carrito",
        "/checkout",
        "/mis-pedidos",
        "/perfil",
        "/verificar-email",
        "/planes",
    ];
    if AUTHENTICATED.iter().any(|prefix| is_under(path, prefix)) {
        return Some(AccessRequirement::authenticated());
    }
    None
}

/// Convenience wrapper: resolve the route requirement and authorize.
pub fn authorize_path(session: Option<&Session>, path: &str) -> AccessDecision {
    match requirement_for_path(path) {
        Some(requirement) => authorize(session, &requirement, path),
        None => AccessDecision::Allow,
    }
}

/// Server-side tenant check: may `session` manage resources of `store_id`?
///
/// SuperAdmin may touch any store; Admin and Deposito only their own.
/// Customers never manage a store.
pub fn ensure_store_access(session: &Session, store_id: DbId) -> Result<(), CoreError> {
    match session.role {
        Role::SuperAdmin => Ok(()),
        Role::Admin | Role::Deposito if session.store_id == Some(store_id) => Ok(()),
        Role::Admin | Role::Deposito => Err(CoreError::Forbidden(
            "You do not have access to this store".into(),
        )),
        Role::Cliente => Err(CoreError::Forbidden(
            "Customers cannot manage stores".into(),
        )),
    }
}

/// Server-side role check mirroring [`AccessRequirement::allows_role`].
pub fn ensure_role(session: &Session, allowed: &[Role]) -> Result<(), CoreError> {
    if AccessRequirement::roles(allowed).allows_role(session.role) {
        Ok(())
    } else {
        let names: Vec<&str> = allowed.iter().map(|r| r.as_str()).collect();
        Err(CoreError::Forbidden(format!(
            "One of the following roles is required: {}",
            names.join(", ")
        )))
    }
}

/// Build `/login?returnUrl=...` with the path URL-encoded.
pub fn login_redirect(path: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("{LOGIN_PATH}?returnUrl={encoded}")
}

/// Segment-aware prefix match: `/admin` matches `/admin` and `/admin/x`
/// but not `/administrar`. Query strings and fragments are ignored.
fn is_under(path: &str, prefix: &str) -> bool {
    let path = path
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn session(role: Role, store_id: Option<DbId>) -> Session {
        Session {
            user_id: 7,
            role,
            store_id,
            email_verified: true,
        }
    }

    // -- authorize ---------------------------------------------------------

    #[test]
    fn unauthenticated_redirects_to_login_with_return_url() {
        let req = AccessRequirement::authenticated();
        let decision = authorize(None, &req, "/mis-pedidos");
        assert_eq!(
            decision,
            AccessDecision::RedirectTo("/login?returnUrl=%2Fmis-pedidos".into())
        );
    }

    #[test]
    fn return_url_encodes_query_string() {
        assert_eq!(
            login_redirect("/admin/productos?page=2"),
            "/login?returnUrl=%2Fadmin%2Fproductos%3Fpage%3D2"
        );
    }

    #[test]
    fn wrong_role_redirects_home() {
        let req = AccessRequirement::roles(&[Role::Admin]);
        let decision = authorize(Some(&session(Role::Cliente, None)), &req, "/admin");
        assert_eq!(decision, AccessDecision::RedirectTo("/".into()));
    }

    #[test]
    fn role_check_precedes_store_check() {
        let req = AccessRequirement::roles(&[Role::SuperAdmin]).with_store();
        let decision = authorize(Some(&session(Role::Admin, None)), &req, "/superadmin");
        assert_eq!(decision, AccessDecision::RedirectTo("/".into()));
    }

    #[test]
    fn admin_without_store_goes_to_onboarding() {
        let req = AccessRequirement::roles(&[Role::Admin]).with_store();
        let decision = authorize(Some(&session(Role::Admin, None)), &req, "/admin/productos");
        assert_eq!(decision, AccessDecision::RedirectTo("/onboarding".into()));
    }

    #[test]
    fn admin_without_store_may_stay_on_onboarding() {
        let req = AccessRequirement::roles(&[Role::Admin]).with_store();
        let s = session(Role::Admin, None);
        assert_eq!(authorize(Some(&s), &req, "/onboarding"), AccessDecision::Allow);
        assert_eq!(
            authorize(Some(&s), &req, "/onboarding/plan"),
            AccessDecision::Allow
        );
    }

    #[test]
    fn admin_with_store_is_allowed() {
        let req = AccessRequirement::roles(&[Role::Admin]).with_store();
        let decision = authorize(Some(&session(Role::Admin, Some(3))), &req, "/admin");
        assert_eq!(decision, AccessDecision::Allow);
    }

    #[test]
    fn super_admin_passes_admin_routes_without_store() {
        let req = AccessRequirement::roles(&[Role::Admin]).with_store();
        let decision = authorize(Some(&session(Role::SuperAdmin, None)), &req, "/admin");
        assert_eq!(decision, AccessDecision::Allow);
    }

    #[test]
    fn deposito_without_store_goes_home() {
        let req = AccessRequirement::roles(&[Role::Deposito]).with_store();
        let decision = authorize(Some(&session(Role::Deposito, None)), &req, "/deposito");
        assert_eq!(decision, AccessDecision::RedirectTo("/".into()));
    }

    // -- route table -------------------------------------------------------

    #[test]
    fn public_paths_have_no_requirement() {
        assert!(requirement_for_path("/").is_none());
        assert!(requirement_for_path("/tienda/demo").is_none());
        assert!(requirement_for_path("/login").is_none());
        assert!(requirement_for_path("/administrar").is_none());
    }

    #[test]
    fn authorize_path_uses_route_table() {
        assert_eq!(authorize_path(None, "/productos"), AccessDecision::Allow);
        assert_matches!(authorize_path(None, "/carrito"), AccessDecision::RedirectTo(to) if to.starts_with("/login"));
        assert_eq!(
            authorize_path(Some(&session(Role::Cliente, None)), "/deposito/pedidos"),
            AccessDecision::RedirectTo("/".into())
        );
        assert_eq!(
            authorize_path(Some(&session(Role::Admin, Some(1))), "/deposito/pedidos"),
            AccessDecision::Allow
        );
    }

    // -- server-side checks ------------------------------------------------

    #[test]
    fn store_access_rules() {
        assert!(ensure_store_access(&session(Role::SuperAdmin, None), 9).is_ok());
        assert!(ensure_store_access(&session(Role::Admin, Some(9)), 9).is_ok());
        assert!(ensure_store_access(&session(Role::Deposito, Some(9)), 9).is_ok());
        assert_matches!(
            ensure_store_access(&session(Role::Admin, Some(8)), 9),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            ensure_store_access(&session(Role::Admin, None), 9),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            ensure_store_access(&session(Role::Cliente, None), 9),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn ensure_role_lists_required_roles() {
        let err = ensure_role(&session(Role::Cliente, None), &[Role::Admin, Role::Deposito])
            .unwrap_err();
        assert_matches!(err, CoreError::Forbidden(msg) if msg.contains("Admin, Deposito"));
        assert!(ensure_role(&session(Role::SuperAdmin, None), &[Role::Admin]).is_ok());
    }

    #[test]
    fn decision_serializes_with_tag() {
        let json = serde_json::to_value(AccessDecision::RedirectTo("/".into())).unwrap();
        assert_eq!(json["decision"], "redirect_to");
        assert_eq!(json["redirect_to"], "/");
        let json = serde_json::to_value(AccessDecision::Allow).unwrap();
        assert_eq!(json["decision"], "allow");
    }
}
