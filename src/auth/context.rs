/// Credentials of the admin making the current request.
///
/// The token is never inspected here; the marketplace backend owns
/// verification and role checks, so it is forwarded verbatim.
#[derive(Clone)]
pub struct AdminContext {
    token: String,

    /// Request ID assigned by the request-id middleware, forwarded downstream
    pub request_id: Option<String>,
}

impl AdminContext {
    pub fn new(token: impl Into<String>, request_id: Option<String>) -> Self {
        Self {
            token: token.into(),
            request_id,
        }
    }

    /// Get the raw bearer token
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

impl std::fmt::Debug for AdminContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminContext")
            .field("token", &"<redacted>")
            .field("request_id", &self.request_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_token() {
        let ctx = AdminContext::new("secret-token", Some("req-1".into()));
        let rendered = format!("{ctx:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("req-1"));
        assert_eq!(ctx.token(), "secret-token");
    }
}
