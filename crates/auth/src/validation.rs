// Input validation for the signup and login forms
//
// Every rule runs on each submission; nothing short-circuits. A field holds
// at most one error, and a later rule for the same field replaces an
// earlier one.

use serde::Serialize;

use super::forms::{FieldKey, FormName, LoginForm, SignupForm};

// =============================================================================
// Limits and Messages
// =============================================================================

/// Default minimum password length, in UTF-16 code units
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// Shown on the password field when no record matches the login pair.
/// Intentionally does not say which of the two fields was wrong.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid name or password";

pub const DUPLICATE_STUDENT_NUMBER_MESSAGE: &str = "Student number already exists";

pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";

pub const CONFIRM_PASSWORD_REQUIRED_MESSAGE: &str = "Please confirm your password";

// =============================================================================
// Error Types
// =============================================================================

/// Error taxonomy surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Missing or malformed input
    FieldValidation,
    /// Student number already registered
    DuplicateKey,
    /// No stored record matches the login pair
    Authentication,
}

/// What is wrong with a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    TooShort { min: usize },
    Mismatch,
    Duplicate,
    InvalidCredentials,
}

impl FieldErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FieldErrorKind::Required
            | FieldErrorKind::TooShort { .. }
            | FieldErrorKind::Mismatch => ErrorCategory::FieldValidation,
            FieldErrorKind::Duplicate => ErrorCategory::DuplicateKey,
            FieldErrorKind::InvalidCredentials => ErrorCategory::Authentication,
        }
    }
}

/// A validation error attached to one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FieldKey,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: FieldKey, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Message shown next to the field
    pub fn message(&self) -> String {
        match (self.field, self.kind) {
            (FieldKey::SignupConfirmPassword, FieldErrorKind::Required) => {
                CONFIRM_PASSWORD_REQUIRED_MESSAGE.to_string()
            }
            (field, FieldErrorKind::Required) => format!("{} is required", field.label()),
            (_, FieldErrorKind::TooShort { min }) => {
                format!("Password must be at least {} characters", min)
            }
            (_, FieldErrorKind::Mismatch) => PASSWORD_MISMATCH_MESSAGE.to_string(),
            (_, FieldErrorKind::Duplicate) => DUPLICATE_STUDENT_NUMBER_MESSAGE.to_string(),
            (_, FieldErrorKind::InvalidCredentials) => INVALID_CREDENTIALS_MESSAGE.to_string(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field.element_id(), self.message())
    }
}

impl std::error::Error for FieldError {}

// =============================================================================
// Error Set
// =============================================================================

/// Errors of one form submission, at most one per field, in the order the
/// fields were first flagged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error, replacing any earlier error on the same field
    pub fn insert(&mut self, error: FieldError) {
        match self.errors.iter_mut().find(|e| e.field == error.field) {
            Some(existing) => *existing = error,
            None => self.errors.push(error),
        }
    }

    pub fn get(&self, field: FieldKey) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn contains(&self, field: FieldKey) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Reset as a batch
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn to_vec(&self) -> Vec<FieldError> {
        self.errors.clone()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

// =============================================================================
// Validation Functions
// =============================================================================

fn require(errors: &mut FieldErrors, field: FieldKey, value: &str) -> bool {
    if value.is_empty() {
        errors.insert(FieldError::new(field, FieldErrorKind::Required));
        return false;
    }
    true
}

/// Validate a normalized signup form
///
/// `is_registered` reports whether a student number already exists.
pub fn validate_signup(
    form: &SignupForm,
    min_password_length: usize,
    is_registered: impl Fn(&str) -> bool,
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    require(&mut errors, FieldKey::SignupName, &form.name);
    require(&mut errors, FieldKey::SignupStudentNumber, &form.student_number);
    require(&mut errors, FieldKey::SignupCourse, &form.course);
    require(&mut errors, FieldKey::SignupYear, &form.year);

    if require(&mut errors, FieldKey::SignupPassword, &form.password)
        && form.password.encode_utf16().count() < min_password_length
    {
        errors.insert(FieldError::new(
            FieldKey::SignupPassword,
            FieldErrorKind::TooShort {
                min: min_password_length,
            },
        ));
    }

    if require(
        &mut errors,
        FieldKey::SignupConfirmPassword,
        &form.confirm_password,
    ) && form.password != form.confirm_password
    {
        errors.insert(FieldError::new(
            FieldKey::SignupConfirmPassword,
            FieldErrorKind::Mismatch,
        ));
    }

    if is_registered(&form.student_number) {
        errors.insert(FieldError::new(
            FieldKey::SignupStudentNumber,
            FieldErrorKind::Duplicate,
        ));
    }

    if !errors.is_empty() {
        tracing::debug!(
            form = %FormName::Signup,
            errors = errors.len(),
            "Signup input rejected"
        );
    }

    errors
}

/// Validate a normalized login form (presence only)
pub fn validate_login(form: &LoginForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require(&mut errors, FieldKey::LoginName, &form.name);
    require(&mut errors, FieldKey::LoginPassword, &form.password);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_signup() -> SignupForm {
        SignupForm::new("Ana Cruz", "2023-0001", "BSCS", "1st", "secret1", "secret1")
    }

    fn nobody_registered(_: &str) -> bool {
        false
    }

    #[test]
    fn test_valid_signup() {
        let errors = validate_signup(&valid_signup(), 6, nobody_registered);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_empty_signup_reports_every_field() {
        let errors = validate_signup(&SignupForm::default(), 6, nobody_registered);
        assert_eq!(errors.len(), 6);
        let messages: Vec<_> = errors.iter().map(|e| e.message()).collect();
        assert_eq!(
            messages,
            vec![
                "Name is required",
                "Student number is required",
                "Course is required",
                "Year is required",
                "Password is required",
                "Please confirm your password",
            ]
        );
        assert!(errors
            .iter()
            .all(|e| e.category() == ErrorCategory::FieldValidation));
    }

    #[test]
    fn test_short_password() {
        let form = SignupForm {
            password: "abc".to_string(),
            confirm_password: "abc".to_string(),
            ..valid_signup()
        };
        let errors = validate_signup(&form, 6, nobody_registered);
        assert_eq!(errors.len(), 1);
        let error = errors.get(FieldKey::SignupPassword).unwrap();
        assert_eq!(error.kind, FieldErrorKind::TooShort { min: 6 });
        assert_eq!(error.message(), "Password must be at least 6 characters");
    }

    #[test]
    fn test_password_length_counts_utf16_units() {
        let form = SignupForm {
            password: "ñañaña".to_string(),
            confirm_password: "ñañaña".to_string(),
            ..valid_signup()
        };
        assert!(validate_signup(&form, 6, nobody_registered).is_empty());

        // Each emoji is a surrogate pair, so three of them reach six units
        let form = SignupForm {
            password: "😀😀😀".to_string(),
            confirm_password: "😀😀😀".to_string(),
            ..valid_signup()
        };
        assert!(validate_signup(&form, 6, nobody_registered).is_empty());

        let form = SignupForm {
            password: "😀😀".to_string(),
            confirm_password: "😀😀".to_string(),
            ..valid_signup()
        };
        assert!(validate_signup(&form, 6, nobody_registered).contains(FieldKey::SignupPassword));
    }

    #[test]
    fn test_mismatch_regardless_of_other_fields() {
        let form = SignupForm {
            name: String::new(),
            course: String::new(),
            password: "abc".to_string(),
            confirm_password: "abd".to_string(),
            ..valid_signup()
        };
        let errors = validate_signup(&form, 6, nobody_registered);
        let mismatch = errors.get(FieldKey::SignupConfirmPassword).unwrap();
        assert_eq!(mismatch.kind, FieldErrorKind::Mismatch);
        assert_eq!(mismatch.message(), PASSWORD_MISMATCH_MESSAGE);
        assert!(errors.contains(FieldKey::SignupName));
        assert!(errors.contains(FieldKey::SignupCourse));
        assert!(errors.contains(FieldKey::SignupPassword));
    }

    #[test]
    fn test_duplicate_student_number() {
        let errors = validate_signup(&valid_signup(), 6, |n| n == "2023-0001");
        assert_eq!(errors.len(), 1);
        let error = errors.get(FieldKey::SignupStudentNumber).unwrap();
        assert_eq!(error.category(), ErrorCategory::DuplicateKey);
        assert_eq!(error.message(), DUPLICATE_STUDENT_NUMBER_MESSAGE);
    }

    #[test]
    fn test_configurable_min_length() {
        let errors = validate_signup(&valid_signup(), 8, nobody_registered);
        assert_eq!(
            errors.get(FieldKey::SignupPassword).unwrap().message(),
            "Password must be at least 8 characters"
        );
    }

    #[test]
    fn test_login_checks_fields_independently() {
        let errors = validate_login(&LoginForm::default());
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get(FieldKey::LoginName).unwrap().message(),
            "Name is required"
        );
        assert_eq!(
            errors.get(FieldKey::LoginPassword).unwrap().message(),
            "Password is required"
        );

        let errors = validate_login(&LoginForm::new("Ana Cruz", ""));
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(FieldKey::LoginPassword));

        assert!(validate_login(&LoginForm::new("Ana Cruz", "x")).is_empty());
    }

    #[test]
    fn test_insert_replaces_same_field() {
        let mut errors = FieldErrors::new();
        errors.insert(FieldError::new(
            FieldKey::SignupStudentNumber,
            FieldErrorKind::Required,
        ));
        errors.insert(FieldError::new(FieldKey::SignupName, FieldErrorKind::Required));
        errors.insert(FieldError::new(
            FieldKey::SignupStudentNumber,
            FieldErrorKind::Duplicate,
        ));

        assert_eq!(errors.len(), 2);
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![FieldKey::SignupStudentNumber, FieldKey::SignupName]
        );
        assert_eq!(
            errors.get(FieldKey::SignupStudentNumber).unwrap().kind,
            FieldErrorKind::Duplicate
        );
    }

    #[test]
    fn test_invalid_credentials_category() {
        let error = FieldError::new(FieldKey::LoginPassword, FieldErrorKind::InvalidCredentials);
        assert_eq!(error.category(), ErrorCategory::Authentication);
        assert_eq!(error.to_string(), "login-password-error: Invalid name or password");
    }

    #[test]
    fn test_error_serializes_flat() {
        let error = FieldError::new(FieldKey::SignupPassword, FieldErrorKind::TooShort { min: 6 });
        let value = serde_json::to_value(error).unwrap();
        assert_eq!(value["field"], "signup_password");
        assert_eq!(value["kind"], "too_short");
        assert_eq!(value["min"], 6);
    }
}
