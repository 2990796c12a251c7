//! # Navigation Module
//!
//! Decides which section is visible and which loads entering it requires.
//!
//! ## Section Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌───────────┐   select(s)   ┌───────────┐                             │
//! │   │ Dashboard │ ◄───────────► │ Suppliers │      Any section can be     │
//! │   └─────▲─────┘               └─────▲─────┘      selected from any      │
//! │         │                           │            other, including       │
//! │         ▼                           ▼            itself.                │
//! │   ┌───────────┐               ┌───────────┐                             │
//! │   │ Products  │ ◄───────────► │Categories │      No terminal state.     │
//! │   └───────────┘               └───────────┘                             │
//! │                                                                         │
//! │   Every select() returns the section's loads again: nothing is          │
//! │   memoized, re-entering always refreshes.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The navigator only decides. Executing the loads is the client's job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::types::EntityKind;

// =============================================================================
// Section
// =============================================================================

/// A top-level section of the admin tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Dashboard,
    Suppliers,
    Categories,
    Products,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Dashboard,
        Section::Suppliers,
        Section::Categories,
        Section::Products,
    ];

    /// Page header title.
    pub const fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Suppliers => "Supplier Management",
            Section::Categories => "Category Management",
            Section::Products => "Product Management",
        }
    }

    /// Page header subtitle.
    pub const fn subtitle(&self) -> &'static str {
        match self {
            Section::Dashboard => "Overview of your inventory system",
            Section::Suppliers => "Add, update, and view your suppliers",
            Section::Categories => "Organize your products with categories",
            Section::Products => "Track all your products in one place",
        }
    }

    /// The entity kind managed in this section, if any.
    pub const fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            Section::Dashboard => None,
            Section::Suppliers => Some(EntityKind::Supplier),
            Section::Categories => Some(EntityKind::Category),
            Section::Products => Some(EntityKind::Product),
        }
    }

    /// Loads issued on entering this section, in execution order.
    pub fn loads(&self) -> Vec<LoadCommand> {
        match self {
            Section::Dashboard => vec![LoadCommand::RefreshSummary],
            Section::Suppliers => vec![LoadCommand::Reload(EntityKind::Supplier)],
            Section::Categories => vec![LoadCommand::Reload(EntityKind::Category)],
            Section::Products => vec![
                LoadCommand::Reload(EntityKind::Product),
                LoadCommand::PopulateReferenceOptions,
                LoadCommand::RebuildCurrencySelector,
            ],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dashboard" | "home" => Ok(Section::Dashboard),
            other => other
                .parse::<EntityKind>()
                .map(Section::from)
                .map_err(|_| format!("unknown section '{other}'")),
        }
    }
}

impl From<EntityKind> for Section {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Supplier => Section::Suppliers,
            EntityKind::Category => Section::Categories,
            EntityKind::Product => Section::Products,
        }
    }
}

// =============================================================================
// Load Commands
// =============================================================================

/// A data load the client must perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadCommand {
    /// Fetch `/api/dashboard_summary`.
    RefreshSummary,
    /// Re-fetch a whole collection.
    Reload(EntityKind),
    /// Re-fetch categories and suppliers and rebuild the product form's
    /// reference selectors.
    PopulateReferenceOptions,
    /// Rebuild the product form's currency selector.
    RebuildCurrencySelector,
}

/// Title and subtitle currently shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Header {
    pub title: String,
    pub subtitle: String,
}

// =============================================================================
// Navigator
// =============================================================================

/// Section state machine. Starts on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: Section,
}

impl Navigator {
    pub fn new() -> Self {
        Navigator::default()
    }

    pub fn current(&self) -> Section {
        self.current
    }

    /// Makes `section` the only visible one and returns its loads.
    pub fn select(&mut self, section: Section) -> Vec<LoadCommand> {
        self.current = section;
        section.loads()
    }

    /// Loads for the current section, without changing it.
    pub fn reload(&self) -> Vec<LoadCommand> {
        self.current.loads()
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.current == section
    }

    pub fn header(&self) -> Header {
        Header {
            title: self.current.title().to_string(),
            subtitle: self.current.subtitle().to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_dashboard() {
        let nav = Navigator::new();
        assert_eq!(nav.current(), Section::Dashboard);
        assert_eq!(nav.header().subtitle, "Overview of your inventory system");
    }

    #[test]
    fn test_select_sets_single_visible_section() {
        let mut nav = Navigator::new();
        nav.select(Section::Categories);

        let visible: Vec<Section> = Section::ALL
            .into_iter()
            .filter(|s| nav.is_visible(*s))
            .collect();
        assert_eq!(visible, vec![Section::Categories]);
        assert_eq!(nav.header().title, "Category Management");
    }

    #[test]
    fn test_products_loads() {
        let mut nav = Navigator::new();
        let loads = nav.select(Section::Products);
        assert_eq!(
            loads,
            vec![
                LoadCommand::Reload(EntityKind::Product),
                LoadCommand::PopulateReferenceOptions,
                LoadCommand::RebuildCurrencySelector,
            ]
        );
    }

    #[test]
    fn test_reentering_reissues_loads() {
        let mut nav = Navigator::new();
        let first = nav.select(Section::Suppliers);
        let second = nav.select(Section::Suppliers);
        assert_eq!(first, second);
        assert_eq!(second, vec![LoadCommand::Reload(EntityKind::Supplier)]);
    }

    #[test]
    fn test_section_from_str() {
        assert_eq!("products".parse::<Section>(), Ok(Section::Products));
        assert_eq!("Supplier".parse::<Section>(), Ok(Section::Suppliers));
        assert_eq!("dashboard".parse::<Section>(), Ok(Section::Dashboard));
        assert!("reports".parse::<Section>().is_err());
    }
}
