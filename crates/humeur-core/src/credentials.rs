//! Login form domain model and validation.
//!
//! Credentials are transient form state: they live in the login flow only and
//! are never persisted anywhere.

/// Minimum accepted username length.
pub const MIN_USERNAME_LEN: usize = 3;
/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// The two fields of the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
}

/// The login form state.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Writes a value into one field of the form.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        match field {
            Field::Username => self.username = value.into(),
            Field::Password => self.password = value.into(),
        }
    }

    /// Runs the submit-time validation rules.
    ///
    /// Both fields are evaluated independently, even when the first one
    /// already failed, so the user sees every problem at once.
    pub fn validate(&self) -> FieldErrors {
        let username = if self.username.trim().is_empty() {
            "username required".to_string()
        } else if self.username.chars().count() < MIN_USERNAME_LEN {
            "username too short".to_string()
        } else {
            String::new()
        };

        let password = if self.password.trim().is_empty() {
            "password required".to_string()
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            "password too short".to_string()
        } else {
            String::new()
        };

        FieldErrors { username, password }
    }
}

/// One human-readable validation message per form field, or an empty string
/// when the field is valid.
///
/// Messages are recomputed on every submit attempt and cleared per-field as
/// the user edits that field (stale-on-edit, not re-validated until the next
/// submit).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub username: String,
    pub password: String,
}

impl FieldErrors {
    /// True when neither field carries a message. Submission is blocked
    /// unless this holds.
    pub fn is_clear(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }

    /// Clears the message for one field, leaving the other untouched.
    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Username => self.username.clear(),
            Field::Password => self.password.clear(),
        }
    }

    /// Returns the message for one field, if any.
    pub fn get(&self, field: Field) -> Option<&str> {
        let msg = match field {
            Field::Username => &self.username,
            Field::Password => &self.password,
        };
        (!msg.is_empty()).then_some(msg.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_credentials_pass() {
        let creds = Credentials::new("alice", "secret123");
        assert!(creds.validate().is_clear());
    }

    #[test]
    fn test_empty_username_required() {
        let creds = Credentials::new("", "secret123");
        let errors = creds.validate();
        assert_eq!(errors.username, "username required");
        assert!(errors.password.is_empty());
    }

    #[test]
    fn test_whitespace_username_required() {
        let creds = Credentials::new("   ", "secret123");
        assert_eq!(creds.validate().username, "username required");
    }

    #[test]
    fn test_short_username() {
        let creds = Credentials::new("ab", "secret123");
        assert_eq!(creds.validate().username, "username too short");
    }

    #[test]
    fn test_empty_password_required() {
        let creds = Credentials::new("alice", "");
        assert_eq!(creds.validate().password, "password required");
    }

    #[test]
    fn test_short_password() {
        let creds = Credentials::new("alice", "abc12");
        assert_eq!(creds.validate().password, "password too short");
    }

    #[test]
    fn test_both_fields_reported_together() {
        let creds = Credentials::new("ab", "abc");
        let errors = creds.validate();
        assert_eq!(errors.username, "username too short");
        assert_eq!(errors.password, "password too short");
        assert!(!errors.is_clear());
    }

    #[test]
    fn test_clear_single_field() {
        let creds = Credentials::new("", "");
        let mut errors = creds.validate();
        errors.clear(Field::Username);
        assert!(errors.username.is_empty());
        assert_eq!(errors.password, "password required");
        assert_eq!(errors.get(Field::Password), Some("password required"));
        assert_eq!(errors.get(Field::Username), None);
    }

    #[test]
    fn test_boundary_lengths() {
        assert!(Credentials::new("abc", "abcdef").validate().is_clear());
        assert!(!Credentials::new("abc", "abcde").validate().is_clear());
    }
}
