use std::fmt;

use serde::{Deserialize, Serialize};

/// Nutri-Score letter attached to a product by the food database.
///
/// Anything the database sends that is not `a`..`e` (`unknown`,
/// `not-applicable`, ...) lands in `Unknown`. A product that carries no grade
/// at all is `Option::None` at the use site, never `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutritionGrade {
    A,
    B,
    C,
    D,
    E,
    #[serde(other)]
    Unknown,
}

impl NutritionGrade {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "a" => Self::A,
            "b" => Self::B,
            "c" => Self::C,
            "d" => Self::D,
            "e" => Self::E,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::D => "d",
            Self::E => "e",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NutritionGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traffic-light level for one nutrient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientLevel {
    Low,
    Moderate,
    High,
    #[default]
    #[serde(other)]
    Unset,
}

impl NutrientLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Unset => "unset",
        }
    }
}

impl fmt::Display for NutrientLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientLevels {
    pub fat: NutrientLevel,
    pub saturated_fat: NutrientLevel,
    pub sugars: NutrientLevel,
    pub salt: NutrientLevel,
}

/// A measured quantity; both halves are reported independently by the database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutriment {
    pub value: Option<f64>,
    pub unit: Option<String>,
}

impl Nutriment {
    pub fn new(value: Option<f64>, unit: Option<String>) -> Self {
        Self { value, unit }
    }
}

impl fmt::Display for Nutriment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, &self.unit) {
            (Some(v), Some(u)) => write!(f, "{v} {u}"),
            (Some(v), None) => write!(f, "{v}"),
            (None, _) => f.write_str("-"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutriments {
    pub carbohydrates: Nutriment,
    pub energy: Nutriment,
    pub fat: Nutriment,
    pub proteins: Nutriment,
    pub salt: Nutriment,
    pub saturated_fat: Nutriment,
    pub sodium: Nutriment,
    pub sugars: Nutriment,
}

impl Nutriments {
    /// Nutrients keyed by their database name, in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Nutriment)> {
        [
            ("carbohydrates", &self.carbohydrates),
            ("energy", &self.energy),
            ("fat", &self.fat),
            ("proteins", &self.proteins),
            ("salt", &self.salt),
            ("saturated-fat", &self.saturated_fat),
            ("sodium", &self.sodium),
            ("sugars", &self.sugars),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub text: Option<String>,
    pub percent_estimate: Option<f64>,
}

/// Search-result entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub code: String,
    pub name: Option<String>,
    pub nutrition_grade: Option<NutritionGrade>,
    pub category_tags: Vec<String>,
    pub image_url: Option<String>,
}

/// Full product record keyed by `code`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub code: String,
    pub name: Option<String>,
    pub product_type: Option<String>,
    pub image_url: Option<String>,
    pub nutrition_grade: Option<NutritionGrade>,
    pub nutrition_score: Option<i32>,
    pub packaging: Option<String>,
    pub countries: Option<String>,
    pub category_tags: Vec<String>,
    pub allergen_tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub nutrient_levels: NutrientLevels,
    pub nutriments: Nutriments,
}

/// One page of search results as ranked by the remote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub items: Vec<ProductSummary>,
    /// 1-based page number echoed back by the remote.
    pub page: u32,
    /// Matching items across all pages.
    pub total_count: u64,
}
