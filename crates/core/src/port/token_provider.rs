// Token Provider Port (for deterministic testing)

/// Claim token generator (allows deterministic tokens in tests)
pub trait TokenProvider: Send + Sync {
    /// Generate a token unique to one claim call
    fn generate_token(&self) -> String;
}

/// UUID v4 provider (production)
pub struct UuidTokenProvider;

impl TokenProvider for UuidTokenProvider {
    fn generate_token(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique_and_non_empty() {
        let provider = UuidTokenProvider;
        let a = provider.generate_token();
        let b = provider.generate_token();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }
}
