//! Saved-cart keys.

use std::fmt;

/// Which column a saved cart is keyed on.
///
/// A cart row carries exactly one of these, so a user cart and a guest cart
/// never share storage even when the strings happen to match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CartKey {
    User(String),
    Session(String),
}

impl CartKey {
    /// Pick the key from request fields. `user_id` wins when both are sent;
    /// blank strings count as absent.
    #[must_use]
    pub fn from_parts(user_id: Option<&str>, session_id: Option<&str>) -> Option<Self> {
        fn non_blank(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }

        non_blank(user_id)
            .map(|id| Self::User(id.to_string()))
            .or_else(|| non_blank(session_id).map(|id| Self::Session(id.to_string())))
    }

    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::User(_) => "user_id",
            Self::Session(_) => "session_id",
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::User(id) | Self::Session(id) => id,
        }
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.column(), self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_wins() {
        assert_eq!(
            CartKey::from_parts(Some("u1"), Some("s1")),
            Some(CartKey::User("u1".to_string()))
        );
    }

    #[test]
    fn test_session_fallback() {
        assert_eq!(
            CartKey::from_parts(Some("  "), Some("s1")),
            Some(CartKey::Session("s1".to_string()))
        );
        assert_eq!(CartKey::from_parts(None, None), None);
        assert_eq!(CartKey::from_parts(Some(""), Some("")), None);
    }

    #[test]
    fn test_keys_are_trimmed() {
        let key = CartKey::from_parts(Some("  u-7 \n"), None);
        assert_eq!(key, Some(CartKey::User("u-7".to_string())));
        assert_eq!(
            key.map(|k| k.to_string()).as_deref(),
            Some("user_id=u-7")
        );
    }
}
