//! API handlers module

pub mod articles;
pub mod auth;
pub mod categories;
pub mod health;
pub mod interactions;
pub mod moderation;
pub mod profile;
pub mod users;

/// Where a mutating handler sends the client afterwards: the caller's
/// preferred return target when one was supplied, the canonical path
/// for the touched resource otherwise.
pub fn redirect_target(return_to: Option<String>, canonical: String) -> String {
    match return_to {
        Some(target) if !target.trim().is_empty() => target,
        _ => canonical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_prefers_return_target() {
        assert_eq!(
            redirect_target(Some("/api/articles".into()), "/api/articles/abc".into()),
            "/api/articles"
        );
    }

    #[test]
    fn test_redirect_falls_back_to_canonical() {
        assert_eq!(
            redirect_target(None, "/api/articles/abc".into()),
            "/api/articles/abc"
        );
        assert_eq!(
            redirect_target(Some("   ".into()), "/api/articles/abc".into()),
            "/api/articles/abc"
        );
    }
}
