/// Credentials of the viewer a client acts for. Every [`crate::Api`] carries
/// its own session; there is no process-wide auth header.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    username: Option<String>,
    token: Option<String>,
}

impl Session {
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn logged_in(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            token: Some(token.into()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some() && self.username.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Bearer {token}"))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[cfg(test)]
mod session_tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::Session;

    #[test]
    fn test_session() {
        let guest = Session::guest();
        assert!(!guest.is_logged_in());
        assert_eq!(guest.bearer(), None);
        assert_eq!(guest.username(), None);

        let session = Session::logged_in("hey", "abc");
        assert!(session.is_logged_in());
        assert_eq!(session.bearer().as_deref(), Some("Bearer abc"));
        assert_eq!(session.username(), Some("hey"));
        assert!(!format!("{session:?}").contains("abc"));
    }
}
