// Credential store
// Decision: Load the whole collection at open, rewrite it in full on every append
// Decision: Missing or unreadable persisted data means "no users" / "no session", never an error
//
// Persistent keys:
// - `students`: JSON array of UserRecord, in registration order
// - `currentStudent`: JSON UserRecord of the signed-in student, absent when logged out

use studentportal_core::{KeyValueStore, Result, UserRecord};

use super::backend::StorageBackend;

/// Key holding the serialized credential collection
pub const STUDENTS_KEY: &str = "students";

/// Key holding the serialized active session
pub const CURRENT_STUDENT_KEY: &str = "currentStudent";

/// Durable owner of the registered students and the active session
pub struct CredentialStore<S = StorageBackend> {
    backend: S,
    users: Vec<UserRecord>,
    session: Option<UserRecord>,
}

impl<S: KeyValueStore> CredentialStore<S> {
    /// Open the store, loading the collection and any persisted session
    pub fn open(backend: S) -> Self {
        let users = load_all(&backend);
        let session = load_session(&backend);

        tracing::debug!(
            users = users.len(),
            has_session = session.is_some(),
            "Credential store opened"
        );

        Self {
            backend,
            users,
            session,
        }
    }

    /// Re-read the collection and session from the backend
    pub fn reload(&mut self) {
        self.users = load_all(&self.backend);
        self.session = load_session(&self.backend);
    }

    /// Registered students in registration order
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// First record with this student number
    pub fn find_by_student_number(&self, student_number: &str) -> Option<&UserRecord> {
        self.users
            .iter()
            .find(|u| u.student_number == student_number)
    }

    /// First record whose name and password both match exactly
    pub fn find_by_name_and_password(&self, name: &str, password: &str) -> Option<&UserRecord> {
        self.users
            .iter()
            .find(|u| u.matches_credentials(name, password))
    }

    /// Add a record and rewrite the persisted collection
    ///
    /// A failed write leaves the in-memory collection unchanged. Uniqueness
    /// of the student number is the caller's concern.
    pub fn append(&mut self, record: UserRecord) -> Result<()> {
        tracing::debug!(student_number = %record.student_number, "Appending student record");
        self.users.push(record);
        if let Err(e) = self.persist_users() {
            self.users.pop();
            return Err(e);
        }
        Ok(())
    }

    fn persist_users(&self) -> Result<()> {
        let payload = serde_json::to_string(&self.users)?;
        self.backend.set(STUDENTS_KEY, &payload).inspect_err(|e| {
            tracing::error!(error = %e, "Failed to persist student records");
        })
    }

    // ============================================
    // Session
    // ============================================

    /// The signed-in student, if any
    pub fn session(&self) -> Option<&UserRecord> {
        self.session.as_ref()
    }

    /// Persist a session for `record`, then make it the active one
    pub fn set_session(&mut self, record: UserRecord) -> Result<()> {
        let payload = serde_json::to_string(&record)?;
        self.backend
            .set(CURRENT_STUDENT_KEY, &payload)
            .inspect_err(|e| {
                tracing::error!(error = %e, "Failed to persist session");
            })?;
        self.session = Some(record);
        Ok(())
    }

    /// Remove the persisted session, then end the active one
    pub fn clear_session(&mut self) -> Result<()> {
        self.backend
            .remove(CURRENT_STUDENT_KEY)
            .inspect_err(|e| {
                tracing::error!(error = %e, "Failed to remove persisted session");
            })?;
        self.session = None;
        Ok(())
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }
}

/// Read the persisted collection; absent or unparsable means empty
pub fn load_all<S: KeyValueStore + ?Sized>(backend: &S) -> Vec<UserRecord> {
    read_json(backend, STUDENTS_KEY).unwrap_or_default()
}

/// Read the persisted session; absent or unparsable means logged out
pub fn load_session<S: KeyValueStore + ?Sized>(backend: &S) -> Option<UserRecord> {
    read_json(backend, CURRENT_STUDENT_KEY)
}

fn read_json<S, T>(backend: &S, key: &str) -> Option<T>
where
    S: KeyValueStore + ?Sized,
    T: serde::de::DeserializeOwned,
{
    let raw = match backend.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read persisted value, treating as absent");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Persisted value is not valid, treating as absent");
            None
        }
    }
}
