use anyhow::{anyhow, Result};

/// Task descriptions are free text but must be non-empty and fit in a single
/// chat message.
pub fn validate_description(description: &str) -> Result<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(anyhow!("Task description cannot be empty"));
    }

    if description.len() > 500 {
        return Err(anyhow!("Task description cannot be longer than 500 characters"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_description_valid() {
        assert!(validate_description("Buy milk").is_ok());
        assert!(validate_description("Call the dentist at 9, then pick up the parcel").is_ok());
        assert!(validate_description("  trimmed  ").is_ok());
    }

    #[test]
    fn test_validate_description_empty() {
        assert!(validate_description("").is_err());
        assert!(validate_description("   ").is_err());
        assert!(validate_description("\t\n").is_err());
    }

    #[test]
    fn test_validate_description_too_long() {
        let long = "a".repeat(501);
        assert!(validate_description(&long).is_err());

        let max = "a".repeat(500);
        assert!(validate_description(&max).is_ok());
    }
}
