//! Open Food Facts v2 payloads. Every product field may be missing, so all of
//! them are `Option` and mapped into the domain model without sentinels.

use serde::{Deserialize, Deserializer};

use crate::catalog::CatalogError;
use crate::product::model::{
    Ingredient, NutrientLevel, NutrientLevels, Nutriment, Nutriments, NutritionGrade,
    ProductDetail, ProductSummary, SearchPage,
};

/// Fields requested from the search endpoint.
pub const SEARCH_FIELDS: &str = "code,product_name,nutrition_grades,categories_tags_en,image_url";

#[derive(Debug, Deserialize)]
pub struct ProductResponse {
    pub code: String,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub product: Option<RawProduct>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawProduct {
    pub product_name: Option<String>,
    pub product_type: Option<String>,
    pub allergens_hierarchy: Option<Vec<String>>,
    pub categories_tags: Option<Vec<String>>,
    pub countries: Option<String>,
    pub image_url: Option<String>,
    pub ingredients: Option<Vec<RawIngredient>>,
    pub nutrient_levels: Option<RawNutrientLevels>,
    pub nutriments: Option<RawNutriments>,
    pub nutriscore_grade: Option<String>,
    pub nutriscore_score: Option<i32>,
    pub packaging: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawIngredient {
    pub text: Option<String>,
    pub percent_estimate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawNutrientLevels {
    pub fat: Option<NutrientLevel>,
    pub salt: Option<NutrientLevel>,
    #[serde(rename = "saturated-fat")]
    pub saturated_fat: Option<NutrientLevel>,
    pub sugars: Option<NutrientLevel>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawNutriments {
    pub carbohydrates: Option<f64>,
    pub carbohydrates_unit: Option<String>,
    pub energy: Option<f64>,
    pub energy_unit: Option<String>,
    pub fat: Option<f64>,
    pub fat_unit: Option<String>,
    pub proteins: Option<f64>,
    pub proteins_unit: Option<String>,
    pub salt: Option<f64>,
    pub salt_unit: Option<String>,
    #[serde(rename = "saturated-fat")]
    pub saturated_fat: Option<f64>,
    #[serde(rename = "saturated-fat_unit")]
    pub saturated_fat_unit: Option<String>,
    pub sodium: Option<f64>,
    pub sodium_unit: Option<String>,
    pub sugars: Option<f64>,
    pub sugars_unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default = "first_page", deserialize_with = "lenient_u32")]
    pub page: u32,
    #[serde(default)]
    pub products: Vec<RawProductItem>,
}

#[derive(Debug, Deserialize)]
pub struct RawProductItem {
    pub code: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub nutrition_grades: Option<String>,
    #[serde(default)]
    pub categories_tags_en: Option<Vec<String>>,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn first_page() -> u32 {
    1
}

// The search endpoint has sent `page` both as a number and as a string.
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(u32),
        Str(String),
    }

    match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => Ok(n),
        NumOrString::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl ProductResponse {
    /// A zero `status` or a missing `product` means the code is unknown.
    pub fn into_detail(self) -> Result<ProductDetail, CatalogError> {
        if self.status == Some(0) {
            return Err(CatalogError::NotFound);
        }
        let product = self.product.ok_or(CatalogError::NotFound)?;
        Ok(product.into_detail(self.code))
    }
}

impl RawProduct {
    pub fn into_detail(self, code: String) -> ProductDetail {
        let levels = self.nutrient_levels.unwrap_or_default();
        ProductDetail {
            code,
            name: self.product_name,
            product_type: self.product_type,
            image_url: self.image_url,
            nutrition_grade: self.nutriscore_grade.as_deref().map(NutritionGrade::parse),
            nutrition_score: self.nutriscore_score,
            packaging: self.packaging,
            countries: self.countries,
            category_tags: self.categories_tags.unwrap_or_default(),
            allergen_tags: self.allergens_hierarchy.unwrap_or_default(),
            ingredients: self
                .ingredients
                .unwrap_or_default()
                .into_iter()
                .map(|i| Ingredient {
                    text: i.text,
                    percent_estimate: i.percent_estimate,
                })
                .collect(),
            nutrient_levels: NutrientLevels {
                fat: levels.fat.unwrap_or_default(),
                saturated_fat: levels.saturated_fat.unwrap_or_default(),
                sugars: levels.sugars.unwrap_or_default(),
                salt: levels.salt.unwrap_or_default(),
            },
            nutriments: self.nutriments.map(Nutriments::from).unwrap_or_default(),
        }
    }
}

impl From<RawNutriments> for Nutriments {
    fn from(r: RawNutriments) -> Self {
        Self {
            carbohydrates: Nutriment::new(r.carbohydrates, r.carbohydrates_unit),
            energy: Nutriment::new(r.energy, r.energy_unit),
            fat: Nutriment::new(r.fat, r.fat_unit),
            proteins: Nutriment::new(r.proteins, r.proteins_unit),
            salt: Nutriment::new(r.salt, r.salt_unit),
            saturated_fat: Nutriment::new(r.saturated_fat, r.saturated_fat_unit),
            sodium: Nutriment::new(r.sodium, r.sodium_unit),
            sugars: Nutriment::new(r.sugars, r.sugars_unit),
        }
    }
}

impl From<RawProductItem> for ProductSummary {
    fn from(r: RawProductItem) -> Self {
        Self {
            code: r.code,
            name: r.product_name,
            nutrition_grade: r.nutrition_grades.as_deref().map(NutritionGrade::parse),
            category_tags: r.categories_tags_en.unwrap_or_default(),
            image_url: r.image_url,
        }
    }
}

impl From<SearchResponse> for SearchPage {
    fn from(r: SearchResponse) -> Self {
        Self {
            items: r
                .products
                .into_iter()
                .filter(|p| !p.code.trim().is_empty())
                .map(ProductSummary::from)
                .collect(),
            page: r.page.max(1),
            total_count: r.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUTELLA: &str = r#"{
        "code": "3017620422003",
        "status": 1,
        "product": {
            "product_name": "Nutella",
            "product_type": "food",
            "allergens_hierarchy": ["en:milk", "en:nuts", "en:soybeans"],
            "categories_tags": ["en:spreads", "en:sweet-spreads"],
            "countries": "France, Belgium",
            "image_url": "https://images.example/nutella.jpg",
            "ingredients": [
                {"text": "Sucre", "percent_estimate": 56.3},
                {"text": "huile de palme"}
            ],
            "nutrient_levels": {"fat": "high", "salt": "low", "saturated-fat": "high", "sugars": "high"},
            "nutriments": {
                "energy": 2252, "energy_unit": "kJ",
                "fat": 30.9, "fat_unit": "g",
                "saturated-fat": 10.6, "saturated-fat_unit": "g",
                "sugars": 56.3, "sugars_unit": "g",
                "salt": 0.107, "salt_unit": "g",
                "proteins": 6.3
            },
            "nutriscore_grade": "e",
            "nutriscore_score": 26,
            "packaging": "Glass jar"
        }
    }"#;

    fn product(json: &str) -> ProductResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn product_response_maps_every_field() {
        let d = product(NUTELLA).into_detail().unwrap();
        assert_eq!(d.code, "3017620422003");
        assert_eq!(d.name.as_deref(), Some("Nutella"));
        assert_eq!(d.nutrition_grade, Some(NutritionGrade::E));
        assert_eq!(d.nutrition_score, Some(26));
        assert_eq!(d.allergen_tags.len(), 3);
        assert_eq!(d.ingredients[1].percent_estimate, None);
        assert_eq!(d.nutrient_levels.saturated_fat, NutrientLevel::High);
        assert_eq!(d.nutrient_levels.salt, NutrientLevel::Low);
        assert_eq!(d.nutriments.saturated_fat.value, Some(10.6));
        assert_eq!(d.nutriments.energy.unit.as_deref(), Some("kJ"));
        assert_eq!(d.nutriments.proteins.unit, None);
        assert_eq!(d.nutriments.sodium, Nutriment::default());
    }

    #[test]
    fn missing_product_is_not_found() {
        let resp = product(
            r#"{"code":"0001","status":0,"status_verbose":"product not found"}"#,
        );
        assert_eq!(resp.into_detail(), Err(CatalogError::NotFound));
    }

    #[test]
    fn absent_grade_is_not_unknown() {
        let d = product(r#"{"code":"1","status":1,"product":{}}"#)
            .into_detail()
            .unwrap();
        assert_eq!(d.nutrition_grade, None);
        assert_eq!(d.nutrient_levels, NutrientLevels::default());

        let resp = product(
            r#"{"code":"1","status":1,"product":{"nutriscore_grade":"unknown"}}"#,
        );
        assert_eq!(
            resp.into_detail().unwrap().nutrition_grade,
            Some(NutritionGrade::Unknown)
        );
    }

    #[test]
    fn search_response_accepts_string_page() {
        let resp: SearchResponse = serde_json::from_str(
            r#"{"count": 20, "page": "2", "page_count": 6, "page_size": 6, "skip": 6,
                "products": [
                    {"code": "1", "product_name": "Chips", "nutrition_grades": "d",
                     "categories_tags_en": ["Snacks"]},
                    {"code": "2"},
                    {"code": "  "}
                ]}"#,
        )
        .unwrap();
        let page = SearchPage::from(resp);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_count, 20);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].nutrition_grade, Some(NutritionGrade::D));
        assert_eq!(page.items[0].category_tags, vec!["Snacks".to_string()]);
        assert!(page.items[1].category_tags.is_empty());
        assert_eq!(page.items[1].name, None);
    }
}
