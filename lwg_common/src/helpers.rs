/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Produce a display-safe version of a token or key: the first ten characters followed by an ellipsis.
/// Anything short enough to be fully revealed by that prefix is masked entirely.
pub fn mask_secret(value: &str) -> String {
    if value.len() <= 10 {
        return "...".to_string();
    }
    let prefix: String = value.chars().take(10).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn boolean_flags() {
        assert!(parse_boolean_flag(Some("1".into()), false));
        assert!(parse_boolean_flag(Some("TRUE".into()), false));
        assert!(!parse_boolean_flag(Some("off".into()), true));
        assert!(parse_boolean_flag(None, true));
        assert!(!parse_boolean_flag(Some("bananas".into()), false));
    }

    #[test]
    fn masking_leaves_a_recognisable_prefix() {
        assert_eq!(mask_secret("RT1-9f3a7c2e55d1"), "RT1-9f3a7c...");
        assert_eq!(mask_secret("short"), "...");
        assert_eq!(mask_secret(""), "...");
    }
}
