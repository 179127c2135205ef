// Auth flow controller
// Decision: The controller owns the credential store and is the only writer to it
// Decision: Operations return display commands; nothing here renders
// Decision: Validation failures are values in FlowOutcome; only store failures are Err
//
// State machine:
//
//   Unauthenticated(Login) <--switch_tab--> Unauthenticated(Signup)
//          |        ^                               |
//    submit_login   |                        submit_signup (ok)
//          v        |                               |
//   Authenticated(section) --logout--> Unauthenticated(Login) <--+
//
// Operations sent in the wrong state are ignored and return no commands.

use serde::Serialize;
use studentportal_core::{
    welcome_message, KeyValueStore, PortalSection, Result, StudentProfile, UserRecord,
};
use studentportal_storage::{CredentialStore, StorageBackend};

use super::config::AuthConfig;
use super::display::{AuthTab, DisplayCommand, DisplayLayer, View};
use super::forms::{FieldKey, FormName, LoginForm, SignupForm};
use super::validation::{
    validate_login, validate_signup, FieldError, FieldErrorKind, FieldErrors,
};

/// Message shown after a successful registration
pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Registration successful! Please login.";

/// Where the flow currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "at", rename_all = "snake_case")]
pub enum FlowState {
    Unauthenticated(AuthTab),
    Authenticated(PortalSection),
}

impl FlowState {
    pub fn view(&self) -> View {
        match self {
            FlowState::Unauthenticated(_) => View::Auth,
            FlowState::Authenticated(_) => View::Portal,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, FlowState::Authenticated(_))
    }

    /// Whether `form` is the one on screen
    pub fn shows_form(&self, form: FormName) -> bool {
        matches!(self, FlowState::Unauthenticated(tab) if tab.form() == form)
    }
}

/// Result of one controller operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowOutcome {
    /// Commands for the display layer, in order
    pub commands: Vec<DisplayCommand>,
    /// Field errors raised by this operation
    pub errors: Vec<FieldError>,
    pub succeeded: bool,
}

impl FlowOutcome {
    fn ignored() -> Self {
        Self::default()
    }

    fn success(commands: Vec<DisplayCommand>) -> Self {
        Self {
            commands,
            errors: Vec::new(),
            succeeded: true,
        }
    }

    fn rejected(mut commands: Vec<DisplayCommand>, errors: &FieldErrors) -> Self {
        commands.extend(errors.iter().map(|e| DisplayCommand::ShowError {
            field: e.field,
            message: e.message(),
        }));
        Self {
            commands,
            errors: errors.to_vec(),
            succeeded: false,
        }
    }

    /// True when the operation was ignored in the current state
    pub fn is_noop(&self) -> bool {
        self.commands.is_empty() && self.errors.is_empty() && !self.succeeded
    }

    /// Replay the commands on `layer`
    pub fn render<D: DisplayLayer + ?Sized>(&self, layer: &mut D) {
        super::display::render(&self.commands, layer);
    }
}

/// Drives signup, login, logout and portal navigation
pub struct AuthFlowController<S = StorageBackend> {
    store: CredentialStore<S>,
    config: AuthConfig,
    state: FlowState,
    login_errors: FieldErrors,
    signup_errors: FieldErrors,
}

impl<S: KeyValueStore> AuthFlowController<S> {
    /// Build the controller; a persisted session starts it authenticated
    pub fn new(store: CredentialStore<S>, config: AuthConfig) -> Self {
        let state = if store.session().is_some() {
            FlowState::Authenticated(config.default_section)
        } else {
            FlowState::Unauthenticated(AuthTab::Login)
        };

        tracing::debug!(?state, users = store.len(), "Auth flow initialized");

        Self {
            store,
            config,
            state,
            login_errors: FieldErrors::new(),
            signup_errors: FieldErrors::new(),
        }
    }

    /// Commands that bring a fresh display in line with the current state
    pub fn startup(&self) -> Vec<DisplayCommand> {
        match (self.state, self.store.session()) {
            (FlowState::Authenticated(section), Some(user)) => vec![
                DisplayCommand::SwitchView { view: View::Portal },
                DisplayCommand::ShowWelcome {
                    text: welcome_message(&user.name),
                },
                DisplayCommand::ShowSection { section },
            ],
            (FlowState::Unauthenticated(tab), _) => vec![
                DisplayCommand::SwitchView { view: View::Auth },
                DisplayCommand::SwitchSubTab { tab },
            ],
            (FlowState::Authenticated(_), None) => vec![
                DisplayCommand::SwitchView { view: View::Auth },
                DisplayCommand::SwitchSubTab { tab: AuthTab::Login },
            ],
        }
    }

    /// Switch between the login and signup tabs
    pub fn switch_tab(&mut self, tab: AuthTab) -> FlowOutcome {
        let FlowState::Unauthenticated(current) = self.state else {
            tracing::debug!(?tab, "Ignoring tab switch while authenticated");
            return FlowOutcome::ignored();
        };

        if current != tab {
            tracing::debug!(from = ?current, to = ?tab, "Switching auth tab");
        }
        self.state = FlowState::Unauthenticated(tab);
        FlowOutcome::success(vec![DisplayCommand::SwitchSubTab { tab }])
    }

    /// Register a new student
    ///
    /// On success the student is stored and the flow returns to the login
    /// tab; there is no automatic login.
    pub fn submit_signup(&mut self, form: &SignupForm) -> Result<FlowOutcome> {
        if !self.state.shows_form(FormName::Signup) {
            tracing::debug!(state = ?self.state, "Ignoring signup outside the signup tab");
            return Ok(FlowOutcome::ignored());
        }

        let form = form.normalized();
        let reset = vec![DisplayCommand::ResetErrors {
            form: FormName::Signup,
        }];

        let store = &self.store;
        self.signup_errors = validate_signup(&form, self.config.min_password_length, |number| {
            store.find_by_student_number(number).is_some()
        });

        if !self.signup_errors.is_empty() {
            tracing::warn!(
                errors = self.signup_errors.len(),
                duplicate = self.signup_errors.iter().any(|e| e.kind == FieldErrorKind::Duplicate),
                "Signup rejected"
            );
            return Ok(FlowOutcome::rejected(reset, &self.signup_errors));
        }

        let record = UserRecord::new(
            form.name,
            form.student_number,
            form.course,
            form.year,
            form.password,
        );
        let student_number = record.student_number.clone();
        self.store.append(record)?;

        self.state = FlowState::Unauthenticated(AuthTab::Login);
        tracing::info!(%student_number, users = self.store.len(), "Student registered");

        let mut commands = reset;
        commands.extend([
            DisplayCommand::SwitchSubTab { tab: AuthTab::Login },
            DisplayCommand::ResetForm {
                form: FormName::Signup,
            },
            DisplayCommand::Notify {
                message: REGISTRATION_SUCCESS_MESSAGE.to_string(),
            },
        ]);
        Ok(FlowOutcome::success(commands))
    }

    /// Sign in with a name and password
    pub fn submit_login(&mut self, form: &LoginForm) -> Result<FlowOutcome> {
        if !self.state.shows_form(FormName::Login) {
            tracing::debug!(state = ?self.state, "Ignoring login outside the login tab");
            return Ok(FlowOutcome::ignored());
        }

        let form = form.normalized();
        let reset = vec![DisplayCommand::ResetErrors {
            form: FormName::Login,
        }];

        self.login_errors = validate_login(&form);
        if !self.login_errors.is_empty() {
            tracing::debug!(errors = self.login_errors.len(), "Login input incomplete");
            return Ok(FlowOutcome::rejected(reset, &self.login_errors));
        }

        let Some(user) = self
            .store
            .find_by_name_and_password(&form.name, &form.password)
            .cloned()
        else {
            self.login_errors.insert(FieldError::new(
                FieldKey::LoginPassword,
                FieldErrorKind::InvalidCredentials,
            ));
            tracing::warn!("Login failed: no matching credentials");
            return Ok(FlowOutcome::rejected(reset, &self.login_errors));
        };

        let welcome = welcome_message(&user.name);
        let student_number = user.student_number.clone();
        self.store.set_session(user)?;

        let section = self.config.default_section;
        self.state = FlowState::Authenticated(section);
        tracing::info!(%student_number, %section, "Student logged in");

        let mut commands = reset;
        commands.extend([
            DisplayCommand::SwitchView { view: View::Portal },
            DisplayCommand::ShowWelcome { text: welcome },
            DisplayCommand::ShowSection { section },
        ]);
        Ok(FlowOutcome::success(commands))
    }

    /// End the session and return to the login form
    pub fn logout(&mut self) -> Result<FlowOutcome> {
        if !self.state.is_authenticated() {
            tracing::debug!("Ignoring logout while unauthenticated");
            return Ok(FlowOutcome::ignored());
        }

        let student_number = self.store.session().map(|u| u.student_number.clone());
        self.store.clear_session()?;
        self.state = FlowState::Unauthenticated(AuthTab::Login);
        self.login_errors.clear();

        tracing::info!(student_number = ?student_number, "Student logged out");

        Ok(FlowOutcome::success(vec![
            DisplayCommand::SwitchView { view: View::Auth },
            DisplayCommand::SwitchSubTab { tab: AuthTab::Login },
            DisplayCommand::ResetForm {
                form: FormName::Login,
            },
            DisplayCommand::ResetErrors {
                form: FormName::Login,
            },
        ]))
    }

    /// Show another portal section
    pub fn navigate(&mut self, section: PortalSection) -> FlowOutcome {
        let FlowState::Authenticated(current) = self.state else {
            tracing::debug!(%section, "Ignoring navigation while unauthenticated");
            return FlowOutcome::ignored();
        };

        tracing::debug!(from = %current, to = %section, "Navigating portal");
        self.state = FlowState::Authenticated(section);
        FlowOutcome::success(vec![DisplayCommand::ShowSection { section }])
    }

    // ============================================
    // Accessors
    // ============================================

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn view(&self) -> View {
        self.state.view()
    }

    /// The signed-in student, if any
    pub fn session(&self) -> Option<&UserRecord> {
        self.store.session()
    }

    pub fn store(&self) -> &CredentialStore<S> {
        &self.store
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Errors from the last submission of `form`
    pub fn errors(&self, form: FormName) -> &FieldErrors {
        match form {
            FormName::Login => &self.login_errors,
            FormName::Signup => &self.signup_errors,
        }
    }

    /// Portal header text for the signed-in student
    pub fn welcome_message(&self) -> Option<String> {
        self.session().map(|u| welcome_message(&u.name))
    }

    /// Records page profile of the signed-in student
    pub fn profile(&self) -> Option<StudentProfile> {
        self.session().map(UserRecord::profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studentportal_core::InMemoryKeyValueStore;

    fn controller() -> AuthFlowController<InMemoryKeyValueStore> {
        AuthFlowController::new(
            CredentialStore::open(InMemoryKeyValueStore::new()),
            AuthConfig::default(),
        )
    }

    fn ana_signup() -> SignupForm {
        SignupForm::new("Ana Cruz", "2023-0001", "BSCS", "1st", "secret1", "secret1")
    }

    #[test]
    fn test_initial_state_without_session() {
        let flow = controller();
        assert_eq!(flow.state(), FlowState::Unauthenticated(AuthTab::Login));
        assert_eq!(
            flow.startup(),
            vec![
                DisplayCommand::SwitchView { view: View::Auth },
                DisplayCommand::SwitchSubTab { tab: AuthTab::Login },
            ]
        );
    }

    #[test]
    fn test_switch_tab() {
        let mut flow = controller();
        let outcome = flow.switch_tab(AuthTab::Signup);
        assert!(outcome.succeeded);
        assert_eq!(flow.state(), FlowState::Unauthenticated(AuthTab::Signup));
    }

    #[test]
    fn test_signup_success_returns_to_login() {
        let mut flow = controller();
        flow.switch_tab(AuthTab::Signup);

        let outcome = flow.submit_signup(&ana_signup()).unwrap();
        assert!(outcome.succeeded);
        assert!(outcome.errors.is_empty());
        assert_eq!(flow.store().len(), 1);
        assert_eq!(flow.state(), FlowState::Unauthenticated(AuthTab::Login));
        assert!(flow.session().is_none());
        assert_eq!(
            outcome.commands,
            vec![
                DisplayCommand::ResetErrors {
                    form: FormName::Signup
                },
                DisplayCommand::SwitchSubTab { tab: AuthTab::Login },
                DisplayCommand::ResetForm {
                    form: FormName::Signup
                },
                DisplayCommand::Notify {
                    message: REGISTRATION_SUCCESS_MESSAGE.to_string()
                },
            ]
        );
    }

    #[test]
    fn test_signup_trims_identity_fields() {
        let mut flow = controller();
        flow.switch_tab(AuthTab::Signup);
        let form = SignupForm::new(" Ana Cruz ", " 2023-0001 ", "BSCS", "1st", "secret1", "secret1");
        flow.submit_signup(&form).unwrap();

        let stored = &flow.store().users()[0];
        assert_eq!(stored.name, "Ana Cruz");
        assert_eq!(stored.student_number, "2023-0001");
    }

    #[test]
    fn test_signup_failure_emits_errors_after_reset() {
        let mut flow = controller();
        flow.switch_tab(AuthTab::Signup);

        let outcome = flow.submit_signup(&SignupForm::default()).unwrap();
        assert!(!outcome.succeeded);
        assert_eq!(outcome.errors.len(), 6);
        assert_eq!(
            outcome.commands[0],
            DisplayCommand::ResetErrors {
                form: FormName::Signup
            }
        );
        assert_eq!(outcome.commands.len(), 7);
        assert_eq!(flow.state(), FlowState::Unauthenticated(AuthTab::Signup));
        assert_eq!(flow.errors(FormName::Signup).len(), 6);
    }

    #[test]
    fn test_resubmission_replaces_error_batch() {
        let mut flow = controller();
        flow.switch_tab(AuthTab::Signup);
        flow.submit_signup(&SignupForm::default()).unwrap();

        let form = SignupForm {
            year: String::new(),
            ..ana_signup()
        };
        let outcome = flow.submit_signup(&form).unwrap();
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(flow.errors(FormName::Signup).len(), 1);
        assert!(flow.errors(FormName::Signup).contains(FieldKey::SignupYear));
    }

    #[test]
    fn test_login_and_navigation() {
        let mut flow = controller();
        flow.switch_tab(AuthTab::Signup);
        flow.submit_signup(&ana_signup()).unwrap();

        let outcome = flow
            .submit_login(&LoginForm::new("Ana Cruz", "secret1"))
            .unwrap();
        assert!(outcome.succeeded);
        assert_eq!(
            flow.state(),
            FlowState::Authenticated(PortalSection::Schedule)
        );
        assert_eq!(
            flow.welcome_message().as_deref(),
            Some("Welcome to Your Portal, Ana Cruz!")
        );
        assert_eq!(flow.profile().unwrap().student_number, "2023-0001");

        let outcome = flow.navigate(PortalSection::Ledger);
        assert_eq!(
            outcome.commands,
            vec![DisplayCommand::ShowSection {
                section: PortalSection::Ledger
            }]
        );
        assert_eq!(flow.state(), FlowState::Authenticated(PortalSection::Ledger));
    }

    #[test]
    fn test_wrong_state_operations_are_ignored() {
        let mut flow = controller();
        assert!(flow.navigate(PortalSection::Grades).is_noop());
        assert!(flow.logout().unwrap().is_noop());

        flow.switch_tab(AuthTab::Signup);
        flow.submit_signup(&ana_signup()).unwrap();
        flow.submit_login(&LoginForm::new("Ana Cruz", "secret1"))
            .unwrap();

        assert!(flow.switch_tab(AuthTab::Signup).is_noop());
        assert!(flow.submit_signup(&ana_signup()).unwrap().is_noop());
        assert!(flow
            .submit_login(&LoginForm::new("Ana Cruz", "secret1"))
            .unwrap()
            .is_noop());
        assert!(flow.state().is_authenticated());
    }

    #[test]
    fn test_submit_needs_its_tab() {
        let mut flow = controller();
        assert!(flow.submit_signup(&ana_signup()).unwrap().is_noop());
        assert!(flow.store().is_empty());

        flow.switch_tab(AuthTab::Signup);
        assert!(flow
            .submit_login(&LoginForm::new("Ana Cruz", "secret1"))
            .unwrap()
            .is_noop());

        let outcome = flow.submit_signup(&SignupForm::default()).unwrap();
        assert!(!outcome.succeeded);
        assert_eq!(flow.state(), FlowState::Unauthenticated(AuthTab::Signup));
    }

    #[test]
    fn test_custom_default_section() {
        let backend = InMemoryKeyValueStore::new();
        let mut store = CredentialStore::open(backend.clone());
        store
            .set_session(UserRecord::new("Ana Cruz", "2023-0001", "BSCS", "1st", "secret1"))
            .unwrap();

        let config = AuthConfig {
            default_section: PortalSection::Records,
            ..AuthConfig::default()
        };
        let flow = AuthFlowController::new(CredentialStore::open(backend), config);
        assert_eq!(flow.state(), FlowState::Authenticated(PortalSection::Records));
        assert_eq!(
            flow.startup(),
            vec![
                DisplayCommand::SwitchView { view: View::Portal },
                DisplayCommand::ShowWelcome {
                    text: "Welcome to Your Portal, Ana Cruz!".to_string()
                },
                DisplayCommand::ShowSection {
                    section: PortalSection::Records
                },
            ]
        );
    }
}
