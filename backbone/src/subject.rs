//! Subject syntax helpers.
//!
//! Subjects are `.`-separated token lists. Two wildcards are understood:
//! `*` matches exactly one token and `>` matches one or more trailing tokens.

pub const SEPARATOR: char = '.';
const SINGLE_WILDCARD: &str = "*";
const FULL_WILDCARD: &str = ">";

/// Returns true when some concrete subject could match both `a` and `b`.
///
/// Either side may carry wildcards, so this answers both "does this pattern match
/// this subject" and "may this permission pattern cover this subscription".
pub fn collide(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    let mut left = a.split(SEPARATOR);
    let mut right = b.split(SEPARATOR);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(FULL_WILDCARD), Some(_)) | (Some(_), Some(FULL_WILDCARD)) => return true,
            (Some(l), Some(r)) => {
                if l.is_empty() || r.is_empty() {
                    return false;
                }
                if l != r && l != SINGLE_WILDCARD && r != SINGLE_WILDCARD {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

/// Returns true when every concrete subject matched by `subject` is also matched by
/// `pattern`. Used for grants, where `users.john.>` must not admit `users.>`.
pub fn covers(pattern: &str, subject: &str) -> bool {
    if pattern.is_empty() || subject.is_empty() {
        return false;
    }

    let mut left = pattern.split(SEPARATOR);
    let mut right = subject.split(SEPARATOR);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (_, Some("")) | (Some(""), _) => return false,
            (Some(FULL_WILDCARD), Some(_)) => return true,
            (Some(SINGLE_WILDCARD), Some(r)) if r != FULL_WILDCARD => {}
            (Some(l), Some(r)) if l == r && is_literal(r) => {}
            _ => return false,
        }
    }
}

/// True when `subject` contains no wildcard tokens.
pub fn is_literal(subject: &str) -> bool {
    subject
        .split(SEPARATOR)
        .all(|token| token != SINGLE_WILDCARD && token != FULL_WILDCARD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_subjects_collide_only_when_equal() {
        assert!(collide("users.john.inbox", "users.john.inbox"));
        assert!(!collide("users.john.inbox", "users.pete.inbox"));
        assert!(!collide("users.john", "users.john.inbox"));
    }

    #[test]
    fn single_wildcard_matches_exactly_one_token() {
        assert!(collide("users.john.*", "users.john.inbox"));
        assert!(!collide("users.john.*", "users.john"));
        assert!(!collide("users.john.*", "users.john.inbox.archive"));
    }

    #[test]
    fn full_wildcard_matches_trailing_tokens() {
        assert!(collide("users.pete.>", "users.pete.inbox"));
        assert!(collide("users.pete.>", "users.pete.inbox.archive"));
        assert!(!collide("users.pete.>", "users.pete"));
    }

    #[test]
    fn wildcards_on_both_sides() {
        assert!(collide("users.*.inbox", "users.john.*"));
        assert!(collide("users.>", "*.john"));
        assert!(!collide("orders.>", "users.*"));
    }

    #[test]
    fn empty_subjects_and_tokens_never_collide() {
        assert!(!collide("", "users"));
        assert!(!collide("users..inbox", "users..inbox"));
    }

    #[test]
    fn covers_requires_containment() {
        assert!(covers("users.john.>", "users.john.inbox"));
        assert!(covers("users.john.>", "users.john.*.archive"));
        assert!(covers("users.*.inbox", "users.*.inbox"));
        assert!(covers("users.john", "users.john"));
        assert!(!covers("users.john.>", "users.>"));
        assert!(!covers("users.john.*", "users.john.>"));
        assert!(!covers("users.john", "users.*"));
        assert!(!covers("users.john", "users.john.inbox"));
        assert!(!covers("", "users"));
    }

    #[test]
    fn is_literal_detects_wildcards() {
        assert!(is_literal("a.b.c"));
        assert!(!is_literal("a.*.c"));
        assert!(!is_literal("a.>"));
    }
}
