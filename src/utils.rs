/// Validate a city code path segment: non-empty and ASCII digits only
pub fn validate_city_code(code: &str) -> Result<(), String> {
    if code.is_empty() {
        return Err("City code is empty".to_string());
    }
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("City code is not numeric: {}", code));
    }
    Ok(())
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Compare bearer tokens without short-circuiting on the first differing byte
pub fn tokens_match(presented: &str, expected: &str) -> bool {
    use subtle::ConstantTimeEq;
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}
