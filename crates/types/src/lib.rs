//! Validated value types shared across the bidsprep crates.

use std::str::FromStr;

/// Directory-name prefix that marks a patient directory in a BIDS-like workspace.
pub const PATIENT_ID_PREFIX: &str = "sub-";

/// Errors that can occur when creating a [`PatientId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatientIdError {
    /// The input was empty
    #[error("Patient id cannot be empty")]
    Empty,

    /// The input does not start with `sub-`
    #[error("Patient id must start with 'sub-': {0}")]
    MissingPrefix(String),

    /// The input could not be used as a single directory name
    #[error("Patient id is not a valid directory name: {0}")]
    InvalidDirectoryName(String),
}

/// A patient identifier such as `sub-01`.
///
/// A `PatientId` is always a single path component that starts with `sub-`, so it
/// can be joined onto a workspace root or a derivatives directory without escaping it.
/// Uniqueness is not a property of the type: two directories at different depths can
/// carry the same id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new `PatientId` from the given input.
    ///
    /// The input is taken verbatim (no trimming) because it names a directory on disk.
    ///
    /// # Errors
    ///
    /// Returns `PatientIdError` if the input is empty, lacks the `sub-` prefix, or
    /// contains a path separator / is a relative path component after the prefix.
    pub fn new(input: impl AsRef<str>) -> Result<Self, PatientIdError> {
        let input = input.as_ref();
        if input.is_empty() {
            return Err(PatientIdError::Empty);
        }

        let Some(rest) = input.strip_prefix(PATIENT_ID_PREFIX) else {
            return Err(PatientIdError::MissingPrefix(input.to_owned()));
        };

        if input.contains(['/', '\\', '\0']) || rest == "." || rest == ".." {
            return Err(PatientIdError::InvalidDirectoryName(input.to_owned()));
        }

        Ok(Self(input.to_owned()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `name` looks like a patient directory name.
    ///
    /// This is the cheap prefix test used while walking a workspace; it does not
    /// perform the full validation of [`PatientId::new`].
    pub fn is_patient_dir_name(name: &str) -> bool {
        name.starts_with(PATIENT_ID_PREFIX)
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PatientId {
    type Err = PatientIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for PatientId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PatientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PatientId::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_patient_id_accepts_prefixed_name() {
        let id = PatientId::new("sub-01").unwrap();
        assert_eq!(id.as_str(), "sub-01");
        assert_eq!(id.to_string(), "sub-01");
    }

    #[test]
    fn test_patient_id_rejects_empty() {
        assert_eq!(PatientId::new(""), Err(PatientIdError::Empty));
    }

    #[test]
    fn test_patient_id_rejects_missing_prefix() {
        assert!(matches!(
            PatientId::new("patient-01"),
            Err(PatientIdError::MissingPrefix(_))
        ));
        assert!(matches!(
            PatientId::new(" sub-01"),
            Err(PatientIdError::MissingPrefix(_))
        ));
    }

    #[test]
    fn test_patient_id_rejects_path_like_input() {
        for input in ["sub-01/anat", "sub-..", "sub-.", "sub-a\\b"] {
            assert!(
                matches!(
                    PatientId::new(input),
                    Err(PatientIdError::InvalidDirectoryName(_))
                ),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_patient_id_bare_prefix_is_allowed() {
        // A directory literally named `sub-` is still classified as a patient.
        assert!(PatientId::new("sub-").is_ok());
    }

    #[test]
    fn test_patient_id_parse() {
        let id: PatientId = "sub-07".parse().unwrap();
        assert_eq!(id, PatientId::new("sub-07").unwrap());
    }

    #[test]
    fn test_patient_id_as_json_map_key() {
        let mut map = BTreeMap::new();
        map.insert(PatientId::new("sub-02").unwrap(), 2);
        map.insert(PatientId::new("sub-01").unwrap(), 1);

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"sub-01":1,"sub-02":2}"#);

        let back: BTreeMap<PatientId, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_patient_id_deserialize_rejects_invalid() {
        let result: Result<PatientId, _> = serde_json::from_str(r#""ses-01""#);
        assert!(result.is_err());
    }
}
