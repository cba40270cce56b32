use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Issue categories offered by the form-filling assistant. The server's
/// classifier may return a free-form department name instead; categories
/// only constrain what the chat flow accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Category {
    Hygiene,
    Roads,
    Electricity,
    Water,
    Safety,
    Infra,
    Other,
}

impl Category {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "HYGIENE" => Some(Category::Hygiene),
            "ROADS" => Some(Category::Roads),
            "ELECTRICITY" => Some(Category::Electricity),
            "WATER" => Some(Category::Water),
            "SAFETY" => Some(Category::Safety),
            "INFRA" => Some(Category::Infra),
            "OTHER" => Some(Category::Other),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Category::Hygiene => "HYGIENE",
            Category::Roads => "ROADS",
            Category::Electricity => "ELECTRICITY",
            Category::Water => "WATER",
            Category::Safety => "SAFETY",
            Category::Infra => "INFRA",
            Category::Other => "OTHER",
        }
    }

    /// The list shown when the assistant asks for a category.
    pub const ALL: [Category; 7] = [
        Category::Hygiene,
        Category::Roads,
        Category::Electricity,
        Category::Water,
        Category::Safety,
        Category::Infra,
        Category::Other,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Category::parse(&value).unwrap_or(Category::Other))
    }
}
