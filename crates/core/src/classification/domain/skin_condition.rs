use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("Unknown skin condition: {0:?}")]
pub struct UnknownCondition(pub String);

/// Skin conditions the classifier distinguishes, in model output order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkinCondition {
    #[serde(rename = "acne")]
    Acne,
    #[serde(rename = "dark spots")]
    DarkSpots,
    #[serde(rename = "pigmentation")]
    Pigmentation,
    #[serde(rename = "wrinkles")]
    Wrinkles,
}

impl SkinCondition {
    /// All conditions in class-index order.
    pub const ALL: [SkinCondition; 4] = [
        SkinCondition::Acne,
        SkinCondition::DarkSpots,
        SkinCondition::Pigmentation,
        SkinCondition::Wrinkles,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            SkinCondition::Acne => "acne",
            SkinCondition::DarkSpots => "dark spots",
            SkinCondition::Pigmentation => "pigmentation",
            SkinCondition::Wrinkles => "wrinkles",
        }
    }

    /// Label with each word capitalized, e.g. `Dark Spots`.
    pub fn title(self) -> String {
        self.label()
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for SkinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SkinCondition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();
        match normalized.as_str() {
            "acne" => Ok(SkinCondition::Acne),
            "darkspots" => Ok(SkinCondition::DarkSpots),
            "pigmentation" => Ok(SkinCondition::Pigmentation),
            "wrinkles" => Ok(SkinCondition::Wrinkles),
            _ => Err(UnknownCondition(s.to_string())),
        }
    }
}
