// Student Portal Auth Flow
// Decision: One controller owns the credential store; no global state
//
// Modules:
// - forms: raw signup/login input and field keys
// - validation: field rules, error messages, error categories
// - display: display layer contract and the commands the controller emits
// - controller: the login/signup/logout state machine
// - config: portal configuration (storage, auth policy, telemetry)

pub mod config;
pub mod controller;
pub mod display;
pub mod forms;
pub mod validation;

pub use config::{AuthConfig, PortalConfig};
pub use controller::{AuthFlowController, FlowOutcome, FlowState};
pub use display::{render, AuthTab, DisplayCommand, DisplayLayer, RecordingDisplay, View};
pub use forms::{FieldKey, FormName, LoginForm, SignupForm};
pub use validation::{ErrorCategory, FieldError, FieldErrorKind, FieldErrors};
