//! Admin gate.
//!
//! A single shared PIN compared by exact equality. There is no rate limiting,
//! lockout or session expiry: this keeps guests away from the admin commands
//! at a breakfast counter and is not meant to protect anything more valuable.

use serde::Serialize;

/// Result of presenting a PIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// The PIN matched.
    Granted,
    /// A PIN was given and did not match.
    Denied,
    /// No PIN was given. Nothing is unlocked, but nothing failed either.
    NotAttempted,
}

/// Checks PINs against the configured secret.
#[derive(Clone)]
pub struct AdminGate {
    secret: String,
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate").finish_non_exhaustive()
    }
}

impl AdminGate {
    /// Create a gate for the given secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Check a PIN.
    #[must_use]
    pub fn check(&self, pin: &str) -> Access {
        if pin.is_empty() {
            Access::NotAttempted
        } else if pin == self.secret {
            Access::Granted
        } else {
            Access::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_pin_is_granted() {
        let gate = AdminGate::new("1234");
        assert_eq!(gate.check("1234"), Access::Granted);
    }

    #[test]
    fn test_wrong_pin_is_denied() {
        let gate = AdminGate::new("1234");
        assert_eq!(gate.check("4321"), Access::Denied);
    }

    #[test]
    fn test_comparison_is_exact() {
        let gate = AdminGate::new("1234");
        assert_eq!(gate.check(" 1234"), Access::Denied);
        assert_eq!(gate.check("1234\n"), Access::Denied);
        assert_eq!(gate.check("123"), Access::Denied);
    }

    #[test]
    fn test_empty_pin_is_neutral() {
        let gate = AdminGate::new("1234");
        assert_eq!(gate.check(""), Access::NotAttempted);
    }

    #[test]
    fn test_debug_hides_secret() {
        let gate = AdminGate::new("super-secret");
        assert!(!format!("{gate:?}").contains("super-secret"));
    }
}
