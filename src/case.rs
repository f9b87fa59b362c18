//! Case conversion for column names: record field identifiers (PascalCase, camelCase or already snake_case) -> snake_case.

/// Convert a single identifier to snake_case.
/// e.g. "UpdatedAt" -> "updated_at", "TaskID" -> "task_id", "IDName" -> "id_name"
///
/// A separator goes before an uppercase letter that follows a lowercase letter or digit, and before the
/// last letter of an acronym when a lowercase letter follows it. Existing underscores are kept as-is.
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let starts_word = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if starts_word {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_capitalized_words() {
        assert_eq!(to_snake_case("HelloHowAreYou"), "hello_how_are_you");
        assert_eq!(to_snake_case("UpdatedAt"), "updated_at");
        assert_eq!(to_snake_case("createdAt"), "created_at");
    }

    #[test]
    fn keeps_acronyms_together() {
        assert_eq!(to_snake_case("TaskID"), "task_id");
        assert_eq!(to_snake_case("ID"), "id");
        assert_eq!(to_snake_case("IDName"), "id_name");
        assert_eq!(to_snake_case("HTTPServerURL"), "http_server_url");
    }

    #[test]
    fn digits_end_a_word() {
        assert_eq!(to_snake_case("Version2Beta"), "version2_beta");
        assert_eq!(to_snake_case("Sha256Sum"), "sha256_sum");
    }

    #[test]
    fn snake_case_is_unchanged() {
        assert_eq!(to_snake_case("updated_at"), "updated_at");
        assert_eq!(to_snake_case("task_id"), "task_id");
        assert_eq!(to_snake_case("Updated_At"), "updated_at");
        assert_eq!(to_snake_case(""), "");
    }
}
