//! Session-stored types.

use serde::{Deserialize, Serialize};

/// How a dashboard session was authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "method")]
pub enum AuthMethod {
    /// Username + password against the `dashboard_user` table.
    Identity { username: String },
    /// The shared gate password from configuration.
    SharedSecret,
}

/// Authenticated dashboard context stored in the session.
///
/// Every dashboard operation requires this marker; it is produced by one
/// of the two credential checks in `services::auth` and checked by the
/// `RequireDashboardAuth` extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub auth: AuthMethod,
}

impl AuthContext {
    /// Display name for logs and greetings.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match &self.auth {
            AuthMethod::Identity { username } => username,
            AuthMethod::SharedSecret => "operator",
        }
    }
}

/// Session keys for storefront data.
pub mod session_keys {
    /// Key for the cart contents map.
    pub const CART: &str = "cart";

    /// Key for the authenticated dashboard context.
    pub const DASHBOARD_AUTH: &str = "dashboard_auth";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let identity = AuthContext {
            auth: AuthMethod::Identity {
                username: "amira".to_string(),
            },
        };
        assert_eq!(identity.display_name(), "amira");

        let shared = AuthContext {
            auth: AuthMethod::SharedSecret,
        };
        assert_eq!(shared.display_name(), "operator");
    }

    #[test]
    fn test_serde_roundtrip() {
        let ctx = AuthContext {
            auth: AuthMethod::SharedSecret,
        };
        let json = serde_json::to_string(&ctx).expect("serialize");
        let back: AuthContext = serde_json::from_str(&json).expect("deserialize");
        assert!(matches!(back.auth, AuthMethod::SharedSecret));
    }
}
