use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The fixed set of spending categories offered when logging an expense.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KnownCategory {
    Food,
    Transport,
    Shopping,
    Bills,
    Entertainment,
    Health,
    Travel,
    Others,
}

impl KnownCategory {
    pub const ALL: [KnownCategory; 8] = [
        KnownCategory::Food,
        KnownCategory::Transport,
        KnownCategory::Shopping,
        KnownCategory::Bills,
        KnownCategory::Entertainment,
        KnownCategory::Health,
        KnownCategory::Travel,
        KnownCategory::Others,
    ];

    pub fn name(self) -> &'static str {
        match self {
            KnownCategory::Food => "Food",
            KnownCategory::Transport => "Transport",
            KnownCategory::Shopping => "Shopping",
            KnownCategory::Bills => "Bills",
            KnownCategory::Entertainment => "Entertainment",
            KnownCategory::Health => "Health",
            KnownCategory::Travel => "Travel",
            KnownCategory::Others => "Others",
        }
    }
}

impl fmt::Display for KnownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for KnownCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        KnownCategory::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(label))
            .ok_or_else(|| UnknownCategory(label.to_string()))
    }
}

/// Category attached to a ledger entry: one of the fixed set, or a label the
/// user typed after choosing `Others`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Known(KnownCategory),
    Custom(String),
}

impl Category {
    /// Combines the picked category with the free-text label typed next to it.
    ///
    /// The custom label only applies when `Others` was picked and it is not blank.
    /// A custom label naming one of the fixed categories resolves to that category.
    pub fn resolve(selected: KnownCategory, custom: Option<&str>) -> Self {
        match (selected, custom.map(str::trim)) {
            (KnownCategory::Others, Some(label)) if !label.is_empty() => {
                Category::from_label(label)
            }
            (known, _) => Category::Known(known),
        }
    }

    /// Interprets a stored label, matching the fixed set case-insensitively.
    ///
    /// Any other label is kept verbatim so `from_label(c.label()) == c`.
    pub fn from_label(label: &str) -> Self {
        match label.parse::<KnownCategory>() {
            Ok(known) => Category::Known(known),
            Err(_) => Category::Custom(label.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Known(known) => known.name(),
            Category::Custom(label) => label,
        }
    }

    pub fn known(&self) -> Option<KnownCategory> {
        match self {
            Category::Known(known) => Some(*known),
            Category::Custom(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.label().trim().is_empty()
    }
}

impl From<KnownCategory> for Category {
    fn from(value: KnownCategory) -> Self {
        Category::Known(value)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from_label(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
