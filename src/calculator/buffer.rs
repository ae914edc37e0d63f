//! Canonicalization of the expression buffer.
//!
//! The editor runs [`normalize`] after every accepted edit so numeric tokens
//! never carry leading zeros, a bare point, or a second point.

/// Normalize every numeric token in `buffer`.
///
/// Idempotent. Characters outside numeric tokens pass through unchanged.
pub fn normalize(buffer: &str) -> String {
    let mut out = String::with_capacity(buffer.len() + 1);
    let mut token = String::new();

    for c in buffer.chars() {
        if c.is_ascii_digit() || c == '.' {
            token.push(c);
        } else {
            if !token.is_empty() {
                out.push_str(&normalize_number(&token));
                token.clear();
            }
            out.push(c);
        }
    }

    if !token.is_empty() {
        out.push_str(&normalize_number(&token));
    }

    out
}

/// Normalize a single run of digits and points.
fn normalize_number(token: &str) -> String {
    // Keep the first point only: "1.2.3" -> "1.23"
    let (int_part, frac_part) = match token.split_once('.') {
        Some((int_part, rest)) => (int_part, Some(rest.replace('.', ""))),
        None => (token, None),
    };

    let stripped = int_part.trim_start_matches('0');
    let int_part = if stripped.is_empty() { "0" } else { stripped };

    match frac_part {
        Some(frac) => format!("{int_part}.{frac}"),
        None => int_part.to_string(),
    }
}

/// Count `(` and `)` in the buffer.
pub fn paren_balance(buffer: &str) -> (usize, usize) {
    buffer.chars().fold((0, 0), |(open, close), c| match c {
        '(' => (open + 1, close),
        ')' => (open, close + 1),
        _ => (open, close),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_zeros() {
        assert_eq!(normalize("007"), "7");
        assert_eq!(normalize("000"), "0");
        assert_eq!(normalize("00.5"), "0.5");
        assert_eq!(normalize("0.05"), "0.05");
        assert_eq!(normalize("100"), "100");
        assert_eq!(normalize("5+007"), "5+7");
    }

    #[test]
    fn test_lone_point() {
        assert_eq!(normalize("."), "0.");
        assert_eq!(normalize("5+."), "5+0.");
        assert_eq!(normalize(".5+1"), "0.5+1");
    }

    #[test]
    fn test_duplicate_points() {
        assert_eq!(normalize("1.2.3"), "1.23");
        assert_eq!(normalize("1..2"), "1.2");
        assert_eq!(normalize("3.."), "3.");
    }

    #[test]
    fn test_non_numeric_untouched() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("(-)*/+"), "(-)*/+");
        assert_eq!(normalize("3*(02-1)"), "3*(2-1)");
    }

    #[test]
    fn test_idempotent() {
        for input in ["007.0.1", ".", "0..", "12+0003*(.5)", "1.2.3-..4", "0"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "{input}");
        }
    }

    #[test]
    fn test_paren_balance() {
        assert_eq!(paren_balance("((1+2)"), (2, 1));
        assert_eq!(paren_balance("12"), (0, 0));
    }
}
