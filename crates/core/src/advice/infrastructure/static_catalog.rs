use crate::advice::domain::recommendation::{Diet, Product, Recommendation, RecommendationCatalog};
use crate::classification::domain::skin_condition::SkinCondition;

const NO_PRODUCTS: (&str, &str) = ("No products found", "N/A");
const NO_ACIDS: &str = "No specific acids found";
const NO_DIET: &str = "No data";
const NO_TIMING: &str = "Not specified";

/// Built-in advice table for the four known conditions.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticCatalog;

impl StaticCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl RecommendationCatalog for StaticCatalog {
    fn lookup(&self, label: &str) -> Recommendation {
        match label.parse::<SkinCondition>() {
            Ok(condition) => known(condition),
            Err(_) => {
                log::debug!("No catalog entry for {label:?}");
                Recommendation {
                    condition: label.trim().to_string(),
                    products: vec![Product::new(NO_PRODUCTS.0, NO_PRODUCTS.1)],
                    acids: strings(&[NO_ACIDS]),
                    diet: Diet {
                        eat: strings(&[NO_DIET]),
                        avoid: strings(&[NO_DIET]),
                    },
                    timing: NO_TIMING.to_string(),
                }
            }
        }
    }
}

fn known(condition: SkinCondition) -> Recommendation {
    Recommendation {
        condition: condition.label().to_string(),
        products: products(condition)
            .iter()
            .map(|(name, kind)| Product::new(name, kind))
            .collect(),
        acids: strings(acids(condition)),
        diet: Diet {
            eat: strings(foods_to_eat(condition)),
            avoid: strings(foods_to_avoid(condition)),
        },
        timing: timing(condition).to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn products(condition: SkinCondition) -> &'static [(&'static str, &'static str)] {
    match condition {
        SkinCondition::Acne => &[
            ("Salicylic Acid Cleanser", "Cleanser"),
            ("Benzoyl Peroxide Gel", "Spot Treatment"),
            ("Niacinamide Serum", "Serum"),
            ("Oil-Free Moisturizer", "Moisturizer"),
        ],
        SkinCondition::Wrinkles => &[
            ("Retinol Serum", "Serum"),
            ("Peptide Cream", "Night Cream"),
            ("Hyaluronic Acid Moisturizer", "Moisturizer"),
            ("Broad Spectrum Sunscreen SPF 50", "Sunscreen"),
        ],
        SkinCondition::DarkSpots => &[
            ("Kojic Acid Cream", "Cream"),
            ("Vitamin C Serum", "Serum"),
            ("Glycolic Acid Toner", "Toner"),
            ("Alpha Arbutin Gel", "Gel"),
        ],
        SkinCondition::Pigmentation => &[
            ("Niacinamide + Zinc Serum", "Serum"),
            ("Azelaic Acid Cream", "Cream"),
            ("Tranexamic Acid Solution", "Serum"),
            ("Licorice Root Extract Gel", "Gel"),
        ],
    }
}

fn acids(condition: SkinCondition) -> &'static [&'static str] {
    match condition {
        SkinCondition::Acne => &["Salicylic Acid", "Niacinamide", "Tea Tree Oil"],
        SkinCondition::Pigmentation => &["Kojic Acid", "Glycolic Acid", "Alpha Arbutin"],
        SkinCondition::Wrinkles => &["Retinol", "Peptides", "Hyaluronic Acid"],
        SkinCondition::DarkSpots => &["Vitamin C", "Tranexamic Acid", "Licorice Extract"],
    }
}

fn foods_to_eat(condition: SkinCondition) -> &'static [&'static str] {
    match condition {
        SkinCondition::Acne => &["Green leafy vegetables", "Berries", "Whole grains", "Zinc-rich foods"],
        SkinCondition::Wrinkles => &["Blueberries", "Avocados", "Nuts", "Green tea"],
        SkinCondition::DarkSpots => &["Citrus fruits", "Papaya", "Tomatoes", "Pumpkin seeds"],
        SkinCondition::Pigmentation => &["Carrots", "Spinach", "Almonds", "Sunflower seeds"],
    }
}

fn foods_to_avoid(condition: SkinCondition) -> &'static [&'static str] {
    match condition {
        SkinCondition::Acne => &["Sugar", "Dairy products", "Refined carbs", "Fast food"],
        SkinCondition::Wrinkles => &["Red meat", "Alcohol", "Deep-fried snacks"],
        SkinCondition::DarkSpots => &["Sugary drinks", "Greasy food", "Processed snacks"],
        SkinCondition::Pigmentation => &["Soda", "White bread", "Overcooked meat"],
    }
}

fn timing(condition: SkinCondition) -> &'static str {
    match condition {
        SkinCondition::Acne => "Morning and Night",
        _ => "Night",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SkinCondition::Acne)]
    #[case(SkinCondition::DarkSpots)]
    #[case(SkinCondition::Pigmentation)]
    #[case(SkinCondition::Wrinkles)]
    fn test_every_condition_has_full_entry(#[case] condition: SkinCondition) {
        let rec = StaticCatalog::new().recommend(condition);
        assert_eq!(rec.condition, condition.label());
        assert_eq!(rec.products.len(), 4);
        assert_eq!(rec.acids.len(), 3);
        assert!(!rec.diet.eat.is_empty());
        assert!(!rec.diet.avoid.is_empty());
        assert_ne!(rec.timing, NO_TIMING);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = StaticCatalog::new();
        assert_eq!(catalog.lookup("ACNE"), catalog.lookup("acne"));
        assert_eq!(catalog.lookup("Dark_Spots").condition, "dark spots");
    }

    #[test]
    fn test_acne_entry_contents() {
        let rec = StaticCatalog::new().recommend(SkinCondition::Acne);
        assert_eq!(rec.products[1], Product::new("Benzoyl Peroxide Gel", "Spot Treatment"));
        assert_eq!(rec.acids, vec!["Salicylic Acid", "Niacinamide", "Tea Tree Oil"]);
        assert_eq!(rec.diet.avoid[1], "Dairy products");
        assert_eq!(rec.timing, "Morning and Night");
    }

    #[test]
    fn test_wrinkles_timing_is_night() {
        assert_eq!(StaticCatalog::new().recommend(SkinCondition::Wrinkles).timing, "Night");
    }

    #[test]
    fn test_unknown_label_gets_fallbacks() {
        let rec = StaticCatalog::new().lookup(" Eczema ");
        assert_eq!(rec.condition, "Eczema");
        assert_eq!(rec.products, vec![Product::new("No products found", "N/A")]);
        assert_eq!(rec.acids, vec!["No specific acids found"]);
        assert_eq!(rec.diet.eat, vec!["No data"]);
        assert_eq!(rec.diet.avoid, vec!["No data"]);
        assert_eq!(rec.timing, "Not specified");
    }

    #[test]
    fn test_product_serializes_kind_as_type() {
        let json = serde_json::to_value(Product::new("Retinol Serum", "Serum")).unwrap();
        assert_eq!(json["type"], "Serum");
    }
}
