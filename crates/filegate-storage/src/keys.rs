//! Shared key handling for storage backends.
//!
//! Key format: `{subfolder}/{storage_name}`, or just `{storage_name}` when the
//! subfolder is empty.

use crate::traits::{StorageError, StorageResult};

/// Build the backend key for a file. Both parts are validated.
pub fn build_key(subfolder: &str, storage_name: &str) -> StorageResult<String> {
    if storage_name.is_empty() || storage_name.contains(['/', '\\']) {
        return Err(StorageError::InvalidKey(format!(
            "Invalid storage name: {:?}",
            storage_name
        )));
    }

    let subfolder = subfolder.trim_matches('/');
    let key = if subfolder.is_empty() {
        storage_name.to_string()
    } else {
        format!("{}/{}", subfolder, storage_name)
    };

    validate_key(&key)?;
    Ok(key)
}

/// Reject keys that could escape the backend root.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.contains('\0')
        || key.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..")
        || key.contains("..")
    {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_key() {
        assert_eq!(
            build_key("application/banner", "abc.jpg").unwrap(),
            "application/banner/abc.jpg"
        );
        assert_eq!(build_key("/nested/", "abc.jpg").unwrap(), "nested/abc.jpg");
        assert_eq!(build_key("", "abc.jpg").unwrap(), "abc.jpg");
    }

    #[test]
    fn test_build_key_rejects_traversal() {
        assert!(build_key("../etc", "passwd").is_err());
        assert!(build_key("a", "../passwd").is_err());
        assert!(build_key("a//b", "c.txt").is_err());
        assert!(build_key("a", "").is_err());
        assert!(build_key("a\\b", "c.txt").is_err());
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("a/b/c.txt").is_ok());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("a/./b").is_err());
        assert!(validate_key("a/../../b").is_err());
        assert!(validate_key("").is_err());
    }
}
