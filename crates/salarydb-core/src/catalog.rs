//! Preset "top paid" queries.
//!
//! The query submenu is a table of numbered entries. Each entry either runs a
//! fixed [`Query`], asks for a free-text value for one [`Category`], or returns
//! to the main menu. Keys are assigned in table order starting at 0.

use std::fmt;

use crate::error::CoreResult;
use crate::model::{Column, JobRecord};
use crate::store::{FilterColumn, RecordStore, SortOrder};

/// Companies offered as presets.
pub const COMPANY_PRESETS: [&str; 5] = ["Apple", "Microsoft", "Google", "Facebook", "Amazon"];

/// Locations offered as presets.
pub const LOCATION_PRESETS: [&str; 6] = [
    "Idaho Falls, ID",
    "Boise, ID",
    "Salt Lake City, UT",
    "Seattle, WA",
    "San Francisco, CA",
    "Arlington, VA",
];

/// Job titles offered as presets.
pub const TITLE_PRESETS: [&str; 4] = [
    "Software Engineer",
    "Software Engineering Manager",
    "Product Manager",
    "Data Scientist",
];

/// What a filtered query is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Scoped to one company.
    Company,
    /// Scoped to one location.
    Location,
    /// Scoped to one job title.
    Title,
}

impl Category {
    /// Returns the filter column for this category.
    pub fn filter_column(&self) -> FilterColumn {
        match self {
            Category::Company => FilterColumn::Company,
            Category::Location => FilterColumn::Location,
            Category::Title => FilterColumn::Title,
        }
    }

    /// Returns the prompt used when asking for a custom value.
    pub fn prompt(&self) -> &'static str {
        match self {
            Category::Company => "Company to search for: ",
            Category::Location => "Location to search for: ",
            Category::Title => "Job Title to search for: ",
        }
    }

    /// Returns the menu heading for this category.
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Company => "Most paid at:",
            Category::Location => "Most paid in:",
            Category::Title => "Most paid by job:",
        }
    }
}

/// A read-only query against the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Everything, highest paid first.
    MostPaidOverall,
    /// Everything, lowest paid first.
    LeastPaidOverall,
    /// One company, highest paid first.
    TopPaidAt(String),
    /// One location, highest paid first.
    TopPaidIn(String),
    /// One job title, highest paid first.
    TopPaidByTitle(String),
}

impl Query {
    /// Builds the filtered query for a category.
    pub fn scoped(category: Category, value: impl Into<String>) -> Self {
        let value = value.into();
        match category {
            Category::Company => Query::TopPaidAt(value),
            Category::Location => Query::TopPaidIn(value),
            Category::Title => Query::TopPaidByTitle(value),
        }
    }

    /// Returns the category and value a filtered query is scoped to.
    pub fn scope(&self) -> Option<(Category, &str)> {
        match self {
            Query::MostPaidOverall | Query::LeastPaidOverall => None,
            Query::TopPaidAt(v) => Some((Category::Company, v.as_str())),
            Query::TopPaidIn(v) => Some((Category::Location, v.as_str())),
            Query::TopPaidByTitle(v) => Some((Category::Title, v.as_str())),
        }
    }

    /// Executes the query.
    pub fn run(&self, store: &RecordStore) -> CoreResult<Vec<JobRecord>> {
        if let Some((category, value)) = self.scope() {
            return store.select_where(category.filter_column(), value);
        }
        let order = match self {
            Query::LeastPaidOverall => SortOrder::Ascending,
            _ => SortOrder::Descending,
        };
        store.select_ordered(Column::TotalYearlyCompensation, order)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::MostPaidOverall => write!(f, "most paid overall"),
            Query::LeastPaidOverall => write!(f, "least paid overall"),
            Query::TopPaidAt(v) => write!(f, "most paid at {}", v),
            Query::TopPaidIn(v) => write!(f, "most paid in {}", v),
            Query::TopPaidByTitle(v) => write!(f, "most paid by job {}", v),
        }
    }
}

/// What selecting a menu entry does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Return to the main menu.
    Back,
    /// Run a fixed query.
    Run(Query),
    /// Ask for a value, then run the category's filtered query.
    Custom(Category),
}

/// One numbered line of the query submenu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Number the user types.
    pub key: u8,
    /// Section the entry is listed under; empty for the back entry.
    pub heading: &'static str,
    /// Text shown next to the key.
    pub label: String,
    /// Behavior when selected.
    pub action: MenuAction,
}

/// The numbered query submenu.
#[derive(Debug, Clone)]
pub struct QueryCatalog {
    entries: Vec<MenuEntry>,
}

impl Default for QueryCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl QueryCatalog {
    /// Builds the standard catalog: back, two overall sorts, then presets
    /// plus a custom entry for each category.
    pub fn standard() -> Self {
        let mut catalog = Self {
            entries: Vec::new(),
        };
        catalog.push("", "Back to main menu", MenuAction::Back);
        catalog.push("Overall:", "Most paid overall", MenuAction::Run(Query::MostPaidOverall));
        catalog.push("Overall:", "Least paid overall", MenuAction::Run(Query::LeastPaidOverall));

        let sections: [(Category, &[&str]); 3] = [
            (Category::Company, &COMPANY_PRESETS),
            (Category::Location, &LOCATION_PRESETS),
            (Category::Title, &TITLE_PRESETS),
        ];
        for (category, presets) in sections {
            for preset in presets {
                catalog.push(
                    category.heading(),
                    preset,
                    MenuAction::Run(Query::scoped(category, *preset)),
                );
            }
            catalog.push(category.heading(), "Custom", MenuAction::Custom(category));
        }
        catalog
    }

    fn push(&mut self, heading: &'static str, label: &str, action: MenuAction) {
        let key = self.entries.len() as u8;
        self.entries.push(MenuEntry {
            key,
            heading,
            label: label.to_string(),
            action,
        });
    }

    /// Returns all entries in key order.
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Looks up an entry by key.
    pub fn lookup(&self, key: u8) -> Option<&MenuEntry> {
        self.entries.get(usize::from(key))
    }

    /// Parses raw user input into an entry; `None` for anything that is not
    /// a listed key.
    pub fn parse_choice(&self, input: &str) -> Option<&MenuEntry> {
        input.trim().parse::<u8>().ok().and_then(|key| self.lookup(key))
    }
}
