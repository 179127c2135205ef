// Student domain types
//
// UserRecord is the registered student as persisted under the `students`
// key, and also the shape of the active session under `currentStudent`.

use serde::{Deserialize, Serialize};

/// A registered student: profile plus credential.
///
/// The serialized field names match the data written by the
/// browser client (`studentNumber`, `year`), so existing stores load as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub name: String,
    /// Unique across the collection, enforced at signup only.
    pub student_number: String,
    pub course: String,
    #[serde(rename = "year")]
    pub year_level: String,
    /// Plain text.
    pub password: String,
}

impl UserRecord {
    pub fn new(
        name: impl Into<String>,
        student_number: impl Into<String>,
        course: impl Into<String>,
        year_level: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            student_number: student_number.into(),
            course: course.into(),
            year_level: year_level.into(),
            password: password.into(),
        }
    }

    /// Exact match on name and password, as used by login.
    pub fn matches_credentials(&self, name: &str, password: &str) -> bool {
        self.name == name && self.password == password
    }

    /// Read-only profile for display; never includes the password.
    pub fn profile(&self) -> StudentProfile {
        StudentProfile {
            name: self.name.clone(),
            student_number: self.student_number.clone(),
            course: self.course.clone(),
            year_level: self.year_level.clone(),
        }
    }
}

/// Student information shown on the records page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub name: String,
    pub student_number: String,
    pub course: String,
    pub year_level: String,
}

impl StudentProfile {
    /// Labelled fields in display order
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("Name", self.name.as_str()),
            ("Student Number", self.student_number.as_str()),
            ("Course", self.course.as_str()),
            ("Year", self.year_level.as_str()),
        ]
    }
}
