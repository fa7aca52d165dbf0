//! Identifier normalisation.

/// Convert `CamelCase`, `kebab-case` or `spaced words` to `snake_case`.
///
/// Acronym runs stay together: `HTTPStatus` becomes `http_status`.
pub fn snake_case(input: &str) -> String {
    let chars: Vec<char> = input.trim().chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("BudgetLineController"), "budget_line_controller");
        assert_eq!(snake_case("refreshToken"), "refresh_token");
        assert_eq!(snake_case("HTTPStatus"), "http_status");
        assert_eq!(snake_case("purchase-order"), "purchase_order");
        assert_eq!(snake_case("already_snake"), "already_snake");
        assert_eq!(snake_case("Report2024Export"), "report2024_export");
        assert_eq!(snake_case(""), "");
    }
}
