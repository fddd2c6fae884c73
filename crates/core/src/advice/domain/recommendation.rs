use serde::Serialize;

use crate::classification::domain::skin_condition::SkinCondition;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Product {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Product {
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diet {
    pub eat: Vec<String>,
    pub avoid: Vec<String>,
}

/// Care advice for one skin condition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// Label the advice was looked up with.
    pub condition: String,
    pub products: Vec<Product>,
    pub acids: Vec<String>,
    pub diet: Diet,
    /// When to apply the products, e.g. `Night`.
    pub timing: String,
}

/// Source of care advice keyed by condition label.
pub trait RecommendationCatalog: Send + Sync {
    /// Looks up advice for a free-form label. Unknown labels get
    /// placeholder advice rather than an error.
    fn lookup(&self, label: &str) -> Recommendation;

    fn recommend(&self, condition: SkinCondition) -> Recommendation {
        self.lookup(condition.label())
    }
}
