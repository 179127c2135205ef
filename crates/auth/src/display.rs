// Display layer contract
// Decision: The controller emits DisplayCommand records; rendering is a separate consumer
//
// A display layer (web page, terminal UI, test recorder) implements
// DisplayLayer. `render` replays a list of commands against it in order.

use serde::Serialize;
use studentportal_core::PortalSection;

use super::forms::{FieldKey, FormName};

/// Top-level view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Login/signup forms
    Auth,
    /// Authenticated portal
    Portal,
}

/// Sub-tab of the auth view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthTab {
    #[default]
    Login,
    Signup,
}

impl AuthTab {
    pub fn form(&self) -> FormName {
        match self {
            AuthTab::Login => FormName::Login,
            AuthTab::Signup => FormName::Signup,
        }
    }
}

/// One instruction for the display layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum DisplayCommand {
    ShowError { field: FieldKey, message: String },
    ResetErrors { form: FormName },
    SwitchView { view: View },
    SwitchSubTab { tab: AuthTab },
    ResetForm { form: FormName },
    Notify { message: String },
    ShowSection { section: PortalSection },
    ShowWelcome { text: String },
}

/// Trait for whatever renders the portal
///
/// The first four methods are the contract the flow relies on. The rest
/// have no-op defaults for layers that don't care.
pub trait DisplayLayer {
    fn show_error(&mut self, field: FieldKey, message: &str);

    fn reset_errors(&mut self, form: FormName);

    fn switch_view(&mut self, view: View);

    fn switch_sub_tab(&mut self, tab: AuthTab);

    fn reset_form(&mut self, _form: FormName) {}

    fn notify(&mut self, _message: &str) {}

    fn show_section(&mut self, _section: PortalSection) {}

    fn show_welcome(&mut self, _text: &str) {}

    /// Apply one command
    fn apply(&mut self, command: &DisplayCommand) {
        dispatch(self, command);
    }
}

/// Route a command to the matching layer method
pub fn dispatch<D: DisplayLayer + ?Sized>(layer: &mut D, command: &DisplayCommand) {
    match command {
        DisplayCommand::ShowError { field, message } => layer.show_error(*field, message),
        DisplayCommand::ResetErrors { form } => layer.reset_errors(*form),
        DisplayCommand::SwitchView { view } => layer.switch_view(*view),
        DisplayCommand::SwitchSubTab { tab } => layer.switch_sub_tab(*tab),
        DisplayCommand::ResetForm { form } => layer.reset_form(*form),
        DisplayCommand::Notify { message } => layer.notify(message),
        DisplayCommand::ShowSection { section } => layer.show_section(*section),
        DisplayCommand::ShowWelcome { text } => layer.show_welcome(text),
    }
}

/// Apply `commands` to `layer` in order
pub fn render<'a, D, I>(commands: I, layer: &mut D)
where
    D: DisplayLayer + ?Sized,
    I: IntoIterator<Item = &'a DisplayCommand>,
{
    for command in commands {
        layer.apply(command);
    }
}

// ============================================================================
// RecordingDisplay - Keeps what a real display would show
// ============================================================================

/// Display layer that tracks the visible state and every applied command
#[derive(Debug, Clone)]
pub struct RecordingDisplay {
    pub view: View,
    pub tab: AuthTab,
    pub section: Option<PortalSection>,
    pub welcome: Option<String>,
    /// Currently visible error messages
    pub errors: Vec<(FieldKey, String)>,
    pub notifications: Vec<String>,
    pub forms_reset: Vec<FormName>,
    pub history: Vec<DisplayCommand>,
}

impl Default for RecordingDisplay {
    fn default() -> Self {
        Self {
            view: View::Auth,
            tab: AuthTab::Login,
            section: None,
            welcome: None,
            errors: Vec::new(),
            notifications: Vec::new(),
            forms_reset: Vec::new(),
            history: Vec::new(),
        }
    }
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible message on `field`, if any
    pub fn error(&self, field: FieldKey) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }
}

impl DisplayLayer for RecordingDisplay {
    fn show_error(&mut self, field: FieldKey, message: &str) {
        self.errors.retain(|(f, _)| *f != field);
        self.errors.push((field, message.to_string()));
    }

    fn reset_errors(&mut self, form: FormName) {
        self.errors.retain(|(f, _)| f.form() != form);
    }

    fn switch_view(&mut self, view: View) {
        self.view = view;
        if view == View::Auth {
            self.section = None;
            self.welcome = None;
        }
    }

    fn switch_sub_tab(&mut self, tab: AuthTab) {
        self.tab = tab;
    }

    fn reset_form(&mut self, form: FormName) {
        self.forms_reset.push(form);
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }

    fn show_section(&mut self, section: PortalSection) {
        self.section = Some(section);
    }

    fn show_welcome(&mut self, text: &str) {
        self.welcome = Some(text.to_string());
    }

    fn apply(&mut self, command: &DisplayCommand) {
        self.history.push(command.clone());
        dispatch(self, command);
    }
}
