mod lookup;
pub mod model;

pub use lookup::{ProductLookup, ProductState, NOT_SIGNED_IN};
pub use model::{
    Ingredient, NutrientLevel, NutrientLevels, Nutriment, Nutriments, NutritionGrade,
    ProductDetail, ProductSummary, SearchPage,
};
