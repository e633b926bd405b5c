//! Common type definitions shared across crates.

use std::fmt;

/// Named AWS profile (a section of the shared credentials file).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileName(String);

impl ProfileName {
    /// Create a new profile name.
    ///
    /// # Errors
    /// Returns an error if the name is empty or contains characters that would
    /// break the INI section header or the derived file names.
    pub fn new(name: impl Into<String>) -> Result<Self, crate::CoreError> {
        let name = name.into();
        let valid = !name.is_empty()
            && !name
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '[' | ']' | '/' | '\\'));
        if !valid {
            return Err(crate::CoreError::InvalidProfileName(name));
        }
        Ok(Self(name))
    }

    /// Get the profile name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProfileName {
    type Error = crate::CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProfileName> for String {
    fn from(value: ProfileName) -> Self {
        value.0
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Region the credential API and the data buckets live in by default.
    pub const DEFAULT: &str = "us-west-2";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_valid_profile_name() {
        let name = ProfileName::new("nasa-disasters-temp-creds").unwrap();
        assert_eq!(name.as_str(), "nasa-disasters-temp-creds");
    }

    #[test]
    fn test_should_reject_invalid_profile_name() {
        assert!(ProfileName::new("").is_err());
        assert!(ProfileName::new("has space").is_err());
        assert!(ProfileName::new("[evil]").is_err());
        assert!(ProfileName::new("../escape").is_err());
    }

    #[test]
    fn test_should_deserialize_profile_name_with_validation() {
        let ok: ProfileName = serde_json::from_str("\"dev\"").unwrap();
        assert_eq!(ok.as_str(), "dev");
        assert!(serde_json::from_str::<ProfileName>("\"a b\"").is_err());
    }

    #[test]
    fn test_should_create_region() {
        let region = AwsRegion::new("eu-west-1");
        assert_eq!(region.as_str(), "eu-west-1");
    }

    #[test]
    fn test_should_use_default_region() {
        let region = AwsRegion::default();
        assert_eq!(region.as_str(), "us-west-2");
    }
}
