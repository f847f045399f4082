//! Expo push token format checks.

const TOKEN_PREFIXES: &[&str] = &["ExponentPushToken[", "ExpoPushToken["];

/// Whether `token` is shaped like a token the Expo push service accepts:
/// `ExponentPushToken[...]`, `ExpoPushToken[...]`, or an 8-4-4-4-12
/// hyphenated alphanumeric identifier.
pub fn is_expo_push_token(token: &str) -> bool {
    let bracketed = TOKEN_PREFIXES
        .iter()
        .any(|prefix| token.starts_with(prefix))
        && token.ends_with(']');

    bracketed || is_hyphenated_id(token)
}

fn is_hyphenated_id(token: &str) -> bool {
    let groups: Vec<&str> = token.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(group, len)| {
                group.len() == len && group.chars().all(|c| c.is_ascii_alphanumeric())
            })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed_tokens() {
        assert!(is_expo_push_token("ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]"));
        assert!(is_expo_push_token("ExpoPushToken[abc]"));
        assert!(!is_expo_push_token("ExponentPushToken[unterminated"));
        assert!(!is_expo_push_token("FcmToken[abc]"));
    }

    #[test]
    fn test_hyphenated_tokens() {
        assert!(is_expo_push_token("f3c1a2b4-9d8e-4c7b-a6f5-0e1d2c3b4a59"));
        assert!(is_expo_push_token("ZZZZZZZZ-zzzz-1234-abcd-ABCDEFGHIJKL"));
        assert!(!is_expo_push_token("f3c1a2b4-9d8e-4c7b-a6f5-0e1d2c3b4a5"));
        assert!(!is_expo_push_token("f3c1a2b4_9d8e-4c7b-a6f5-0e1d2c3b4a59"));
    }

    #[test]
    fn test_empty_and_junk() {
        assert!(!is_expo_push_token(""));
        assert!(!is_expo_push_token("not-a-token"));
    }
}
