//! Authenticated principal

use uuid::Uuid;

/// The single role every account holds. There is no role hierarchy.
pub const ROLE_USER: &str = "USER";

/// The authenticated identity attached to a request.
///
/// Materialized from the credential store once per request and held by
/// reference for the request's duration; never mutated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl Principal {
    pub fn new(id: Uuid, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            name: name.into(),
        }
    }

    /// Every account carries the same fixed role.
    pub fn role(&self) -> &'static str {
        ROLE_USER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_is_fixed() {
        let p = Principal::new(Uuid::new_v4(), "a@example.com", "A");
        assert_eq!(p.role(), "USER");
    }
}
