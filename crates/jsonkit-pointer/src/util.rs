use crate::PointerError;

/// Unescapes a reference token: `~1` becomes `/` and `~0` becomes `~`.
///
/// Any other `~` sequence, including a trailing `~`, is rejected.
///
/// ```
/// use jsonkit_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~1b~0c").unwrap(), "a/b~c");
/// assert!(unescape_component("a~2").is_err());
/// ```
pub fn unescape_component(component: &str) -> Result<String, PointerError> {
    if !component.contains('~') {
        return Ok(component.to_string());
    }
    let mut out = String::with_capacity(component.len());
    let mut chars = component.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            Some(other) => {
                return Err(PointerError::Syntax(format!("invalid escape ~{other} in {component:?}")))
            }
            None => return Err(PointerError::Syntax(format!("dangling ~ in {component:?}"))),
        }
    }
    Ok(out)
}

/// Escapes a reference token: `~` becomes `~0` and `/` becomes `~1`.
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    // `~` first, otherwise the `~1` we emit would be escaped again.
    component.replace('~', "~0").replace('/', "~1")
}

/// True for `0` or a digit string without a leading zero.
pub fn is_valid_index(token: &str) -> bool {
    let bytes = token.as_bytes();
    match bytes {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        _ => bytes.iter().all(u8::is_ascii_digit),
    }
}

/// Parses an array index token. Tokens too large for `usize` are treated
/// as out of range by returning `None`.
pub(crate) fn parse_index(token: &str) -> Option<usize> {
    if !is_valid_index(token) {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_roundtrip() {
        for raw in ["", "a", "a/b", "~", "~1", "/~/", "m~n"] {
            assert_eq!(unescape_component(&escape_component(raw)).unwrap(), raw);
        }
        assert_eq!(escape_component("~1"), "~01");
        assert_eq!(unescape_component("~01").unwrap(), "~1");
    }

    #[test]
    fn rejects_unknown_escapes() {
        assert!(matches!(unescape_component("~"), Err(PointerError::Syntax(_))));
        assert!(matches!(unescape_component("a~x"), Err(PointerError::Syntax(_))));
        assert!(matches!(unescape_component("~~0"), Err(PointerError::Syntax(_))));
    }

    #[test]
    fn index_tokens() {
        assert!(is_valid_index("0"));
        assert!(is_valid_index("10"));
        assert!(!is_valid_index(""));
        assert!(!is_valid_index("01"));
        assert!(!is_valid_index("-1"));
        assert!(!is_valid_index("1a"));
        assert!(!is_valid_index("-"));
        assert_eq!(parse_index("42"), Some(42));
        assert_eq!(parse_index("99999999999999999999999999"), None);
    }
}
