// Form input types
//
// The display layer collects raw field values and hands them over as-is.
// Names and student numbers are trimmed here; course, year and passwords
// are taken verbatim.

use serde::{Deserialize, Serialize};

/// The two forms of the auth view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormName {
    Login,
    Signup,
}

impl FormName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormName::Login => "login",
            FormName::Signup => "signup",
        }
    }

    /// Element id of the form container
    pub fn element_id(&self) -> String {
        format!("{}-form", self.as_str())
    }
}

impl std::fmt::Display for FormName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field that can carry a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    LoginName,
    LoginPassword,
    SignupName,
    SignupStudentNumber,
    SignupCourse,
    SignupYear,
    SignupPassword,
    SignupConfirmPassword,
}

impl FieldKey {
    /// Form the field belongs to
    pub fn form(&self) -> FormName {
        match self {
            FieldKey::LoginName | FieldKey::LoginPassword => FormName::Login,
            _ => FormName::Signup,
        }
    }

    /// Element id of the field's error slot
    pub fn element_id(&self) -> &'static str {
        match self {
            FieldKey::LoginName => "login-name-error",
            FieldKey::LoginPassword => "login-password-error",
            FieldKey::SignupName => "signup-name-error",
            FieldKey::SignupStudentNumber => "signup-student-number-error",
            FieldKey::SignupCourse => "signup-course-error",
            FieldKey::SignupYear => "signup-year-error",
            FieldKey::SignupPassword => "signup-password-error",
            FieldKey::SignupConfirmPassword => "signup-confirm-password-error",
        }
    }

    /// Human label used in "is required" messages
    pub fn label(&self) -> &'static str {
        match self {
            FieldKey::LoginName | FieldKey::SignupName => "Name",
            FieldKey::SignupStudentNumber => "Student number",
            FieldKey::SignupCourse => "Course",
            FieldKey::SignupYear => "Year",
            FieldKey::LoginPassword | FieldKey::SignupPassword => "Password",
            FieldKey::SignupConfirmPassword => "Password confirmation",
        }
    }
}

/// Raw signup form input
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    pub student_number: String,
    /// Selected course value; empty when nothing is selected
    pub course: String,
    /// Selected year value; empty when nothing is selected
    pub year: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn new(
        name: impl Into<String>,
        student_number: impl Into<String>,
        course: impl Into<String>,
        year: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            student_number: student_number.into(),
            course: course.into(),
            year: year.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Copy with name and student number trimmed
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            student_number: self.student_number.trim().to_string(),
            ..self.clone()
        }
    }
}

/// Raw login form input
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub name: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }

    /// Copy with the name trimmed
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            password: self.password.clone(),
        }
    }
}
