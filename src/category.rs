//! Task categories
//!
//! Categories are a fixed list, seeded at start-up. They are never persisted, and cannot be created, edited or removed.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use csscolorparser::Color;

/// The identifier of a [`Category`]
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId {
    content: String,
}

impl CategoryId {
    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for CategoryId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for CategoryId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}


/// A label tasks can be tagged with
#[derive(Clone, Debug)]
pub struct Category {
    id: CategoryId,
    name: String,
    color: Color,
    icon: Option<String>,
}

impl Category {
    pub fn new(id: CategoryId, name: String, color: Color, icon: Option<String>) -> Self {
        Self { id, name, color, icon }
    }

    pub fn id(&self) -> &CategoryId     { &self.id     }
    pub fn name(&self) -> &str          { &self.name   }
    pub fn color(&self) -> &Color       { &self.color  }
    pub fn icon(&self) -> Option<&str>  { self.icon.as_deref() }
}

// `Color` holds floats, comparing their hex forms is enough here
impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
           self.id == other.id
        && self.name == other.name
        && self.icon == other.icon
        && self.color.to_hex_string() == other.color.to_hex_string()
    }
}

/// (id, name, color) of every seeded category
const SEED: [(&str, &str, &str); 5] = [
    ("1", "Work",     "#6B9CFF"),
    ("2", "Personal", "#A96BFF"),
    ("3", "Shopping", "#6BF5FF"),
    ("4", "Health",   "#6BFFB2"),
    ("5", "Ideas",    "#FFD16B"),
];

/// Returns the five categories every session starts with
pub fn default_categories() -> Vec<Category> {
    SEED.iter()
        .map(|(id, name, hex)| {
            let color = csscolorparser::parse(hex).unwrap(/* these are valid hardcoded colors */);
            Category::new(CategoryId::from(*id), name.to_string(), color, None)
        })
        .collect()
}
