// Portal navigation types
//
// The authenticated view is a set of tabbed sections. Their contents are
// rendered by the display layer; the core only tracks which one is active.

use serde::{Deserialize, Serialize};

/// A tab of the authenticated portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortalSection {
    /// Class schedule (shown after login)
    #[default]
    Schedule,
    Grades,
    Records,
    /// Tuition ledger
    Ledger,
}

impl PortalSection {
    pub const ALL: [PortalSection; 4] = [
        PortalSection::Schedule,
        PortalSection::Grades,
        PortalSection::Records,
        PortalSection::Ledger,
    ];

    /// Stable identifier used by navigation items
    pub fn as_str(&self) -> &'static str {
        match self {
            PortalSection::Schedule => "schedule",
            PortalSection::Grades => "grades",
            PortalSection::Records => "records",
            PortalSection::Ledger => "ledger",
        }
    }

    /// Element id of the section container
    pub fn element_id(&self) -> String {
        format!("{}-section", self.as_str())
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.as_str() == s)
    }
}

impl std::fmt::Display for PortalSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Greeting shown in the portal header for the signed-in student
pub fn welcome_message(name: &str) -> String {
    format!("Welcome to Your Portal, {}!", name)
}
