use crate::{Error, Result};

/// Owner and name halves of a repository's full name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName {
    pub owner: String,
    pub name: String,
}

/// Parse a repository full name of the form `owner/name`
pub fn parse_full_name(full_name: &str) -> Result<RepositoryName> {
    let (owner, name) = full_name.split_once('/').ok_or_else(|| {
        Error::Validation(format!(
            "Invalid repository name '{full_name}'. Expected: owner/name"
        ))
    })?;

    if owner.is_empty() || name.is_empty() {
        return Err(Error::Validation(format!(
            "Repository owner and name cannot be empty: '{full_name}'"
        )));
    }

    if name.contains('/') || full_name.chars().any(char::is_whitespace) {
        return Err(Error::Validation(format!(
            "Invalid repository name '{full_name}'. Expected: owner/name"
        )));
    }

    Ok(RepositoryName {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_name() {
        let name = parse_full_name("rust-lang/rust").unwrap();
        assert_eq!(name.owner, "rust-lang");
        assert_eq!(name.name, "rust");
    }

    #[test]
    fn test_parse_invalid_single_part() {
        assert!(parse_full_name("rust").is_err());
    }

    #[test]
    fn test_parse_empty_owner() {
        assert!(parse_full_name("/rust").is_err());
    }

    #[test]
    fn test_parse_empty_name() {
        assert!(parse_full_name("rust-lang/").is_err());
    }

    #[test]
    fn test_parse_extra_segments() {
        assert!(parse_full_name("rust-lang/rust/tree").is_err());
    }

    #[test]
    fn test_parse_whitespace() {
        assert!(parse_full_name("rust lang/rust").is_err());
    }
}
