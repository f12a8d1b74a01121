//! Project-name rules and case conversion.

use crate::domain::error::DomainError;

/// Checks a name can be used as a single directory component.
///
/// This is the rule for flag input. Interactive input additionally goes
/// through [`validate_interactive_name`].
pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
    let reject = |reason: &str| {
        Err(DomainError::InvalidProjectName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.trim().is_empty() {
        return reject("name cannot be empty");
    }
    if name == "." || name == ".." {
        return reject("name cannot be a relative directory marker");
    }
    if name.contains(['/', '\\', '\0']) {
        return reject("name cannot contain path separators");
    }
    Ok(())
}

/// Interactive names must match `^[a-z0-9-]+$`.
pub fn validate_interactive_name(name: &str) -> Result<(), DomainError> {
    if !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        Ok(())
    } else {
        Err(DomainError::InvalidProjectName {
            name: name.to_string(),
            reason: "use only lowercase letters, numbers, and hyphens".into(),
        })
    }
}

/// Contract-name derivation.
///
/// Splits on `-`, `_` and whitespace, upper-cases the first character of
/// each word and lower-cases the rest.
///
/// | Input | Output |
/// |-------|--------|
/// | "my-token-app" | "MyTokenApp" |
/// | "my_token app" | "MyTokenApp" |
/// | "NFT-drop" | "NftDrop" |
pub fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::with_capacity(w.len());
                    out.extend(first.to_uppercase());
                    out.push_str(&chars.as_str().to_lowercase());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_is_stable() {
        assert_eq!(to_pascal_case("my-token-app"), "MyTokenApp");
        assert_eq!(to_pascal_case("my_token app"), "MyTokenApp");
    }

    #[test]
    fn pascal_case_skips_repeated_separators() {
        assert_eq!(to_pascal_case("--my__app  "), "MyApp");
        assert_eq!(to_pascal_case("token2"), "Token2");
    }

    #[test]
    fn flag_names_reject_paths() {
        assert!(validate_project_name("../evil").is_err());
        assert!(validate_project_name("..").is_err());
        assert!(validate_project_name("   ").is_err());
        assert!(validate_project_name("My App").is_ok());
    }

    #[test]
    fn interactive_names_are_strict() {
        assert!(validate_interactive_name("my-app-2").is_ok());
        assert!(validate_interactive_name("My-App").is_err());
        assert!(validate_interactive_name("my_app").is_err());
        assert!(validate_interactive_name("").is_err());
    }
}
