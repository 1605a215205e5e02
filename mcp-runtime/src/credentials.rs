use std::fmt;

/// Environment variable holding the Edgee API bearer token.
pub const TOKEN_ENV: &str = "EDGEE_TOKEN";

/// Source of the bearer token attached to every API request.
///
/// Consulted on each request; implementations must not cache on the caller's
/// behalf.
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    fn bearer_token(&self) -> Option<String>;

    /// Where the token is expected to come from, for error messages.
    fn source(&self) -> String;
}

/// Reads the token from an environment variable at request time.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new(TOKEN_ENV)
    }
}

impl CredentialProvider for EnvToken {
    fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }

    fn source(&self) -> String {
        format!("{} environment variable", self.var)
    }
}

/// A token fixed at startup (e.g. passed with `--token`).
#[derive(Clone)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.trim().is_empty() {
            Self(None)
        } else {
            Self(Some(token))
        }
    }

    /// A provider that never yields a token.
    pub fn none() -> Self {
        Self(None)
    }
}

// Never print the secret.
impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StaticToken")
            .field(&self.0.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }

    fn source(&self) -> String {
        "--token argument".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_static_token_counts_as_missing() {
        assert!(StaticToken::new("   ").bearer_token().is_none());
        assert_eq!(
            StaticToken::new("tok").bearer_token().as_deref(),
            Some("tok")
        );
    }

    #[test]
    fn static_token_debug_redacts_secret() {
        let debug = format!("{:?}", StaticToken::new("super-secret"));
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn env_token_reports_missing_variable() {
        let provider = EnvToken::new("EDGEE_MCP_TEST_TOKEN_THAT_IS_NEVER_SET");
        assert!(provider.bearer_token().is_none());
        assert_eq!(
            provider.source(),
            "EDGEE_MCP_TEST_TOKEN_THAT_IS_NEVER_SET environment variable"
        );
    }
}
