//! Input validation predicates shared by the HTTP handlers.
//!
//! All of these are pure and total: bad input yields `false`, never an error.

/// Permissive `local@domain.tld` shape check: no whitespace, exactly one `@`,
/// a non-empty local part, and a `.` inside the domain with at least one
/// character on each side.
pub fn validate_email(input: &str) -> bool {
    if input.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Minimum length only. No upper bound, no character-class rules.
pub fn validate_password(input: &str) -> bool {
    input.chars().count() >= 6
}

/// Trimmed title must be 1 to 200 characters.
pub fn validate_survey_title(input: &str) -> bool {
    let length = input.trim().chars().count();

    (1..=200).contains(&length)
}
