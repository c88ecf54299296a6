/// Proof that the caller's authentication gate passed. The pipeline takes a
/// `Session` by reference instead of consulting any ambient login state, so
/// gating stays entirely with the embedding application.
#[derive(Debug, Clone)]
pub struct Session {
    _private: (),
}

impl Session {
    /// Checks the supplied password against the shared secret.
    pub fn authenticate(supplied: &str, expected: &str) -> Option<Session> {
        if !expected.is_empty() && supplied == expected {
            Some(Session { _private: () })
        } else {
            None
        }
    }

    /// A session for callers that perform their own gating (or none).
    pub fn open() -> Session {
        Session { _private: () }
    }
}
