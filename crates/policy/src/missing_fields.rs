/// Heuristically pull candidate missing-field names out of a validator
/// error string, per §4.3 / §9's open question on this extraction.
///
/// Prefers single-quoted identifiers (our own `ao-validation` error strings
/// quote field names, e.g. `"required property 'query' is missing"`).
/// Falls back to alphabetic tokens longer than two characters in the
/// vicinity of the word "required" when no quoted identifier is present.
pub fn extract_missing_fields(details: &str) -> Vec<String> {
    let quoted = extract_quoted(details);
    if !quoted.is_empty() {
        return quoted;
    }
    window_heuristic(details)
}

fn extract_quoted(details: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut chars = details.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            let token: String = chars.by_ref().take_while(|&c| c != '\'').collect();
            if !token.is_empty() {
                out.push(token);
            }
        }
    }
    out
}

fn window_heuristic(details: &str) -> Vec<String> {
    const WINDOW: usize = 2;
    let tokens: Vec<String> = details
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect();

    let Some(anchor) = tokens.iter().position(|t| t.eq_ignore_ascii_case("required")) else {
        return Vec::new();
    };

    let start = anchor.saturating_sub(WINDOW);
    let end = (anchor + WINDOW + 1).min(tokens.len());

    tokens[start..end]
        .iter()
        .filter(|t| t.chars().all(|c| c.is_alphabetic()) && t.len() > 2)
        .filter(|t| !t.eq_ignore_ascii_case("required"))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_quoted_field_name() {
        let fields = extract_missing_fields("$: required property 'query' is missing");
        assert_eq!(fields, vec!["query".to_string()]);
    }

    #[test]
    fn falls_back_to_window_heuristic_without_quotes() {
        let fields = extract_missing_fields("field query is required for this call");
        assert!(fields.contains(&"required".to_string()) == false);
        assert!(!fields.is_empty());
    }

    #[test]
    fn no_required_keyword_yields_empty() {
        assert!(extract_missing_fields("totally unrelated error").is_empty());
    }
}
