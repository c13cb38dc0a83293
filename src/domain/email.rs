//! Email address normalization.

/// Normalize an email address for storage and lookup.
///
/// Strips surrounding whitespace and lowercases the domain part (after the
/// last `@`). The local part is kept as entered. Strings without `@` are
/// only trimmed.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_is_lowercased() {
        assert_eq!(normalize_email("reza@GMAIL.com"), "reza@gmail.com");
    }

    #[test]
    fn test_local_part_is_preserved() {
        assert_eq!(normalize_email("Reza.Ahmadi@Example.ORG"), "Reza.Ahmadi@example.org");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(normalize_email("  reza@gmail.com \n"), "reza@gmail.com");
    }

    #[test]
    fn test_last_at_sign_splits() {
        assert_eq!(normalize_email("\"a@b\"@EXAMPLE.com"), "\"a@b\"@example.com");
    }

    #[test]
    fn test_missing_at_sign() {
        assert_eq!(normalize_email(" not-an-email "), "not-an-email");
        assert_eq!(normalize_email(""), "");
    }
}
