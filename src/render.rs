//! Plain-text rendering for the command line.

use std::fmt::Write;

use crate::history::ScannedProduct;
use crate::product::model::{Ingredient, NutritionGrade, ProductDetail, ProductSummary};

const MISSING: &str = "-";

fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING)
}

fn grade(grade: Option<NutritionGrade>) -> String {
    grade
        .map(|g| g.as_str().to_uppercase())
        .unwrap_or_else(|| MISSING.to_string())
}

pub fn summary_line(index: usize, p: &ProductSummary) -> String {
    format!(
        "{:>3}. {:<14} [{}] {}",
        index + 1,
        p.code,
        grade(p.nutrition_grade),
        or_missing(p.name.as_deref())
    )
}

pub fn detail(d: &ProductDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", or_missing(d.name.as_deref()), d.code);
    let _ = writeln!(
        out,
        "  type:       {}",
        or_missing(d.product_type.as_deref())
    );
    let _ = writeln!(
        out,
        "  nutri-score: {} (score {})",
        grade(d.nutrition_grade),
        d.nutrition_score
            .map(|s| s.to_string())
            .unwrap_or_else(|| MISSING.to_string())
    );
    let _ = writeln!(out, "  packaging:  {}", or_missing(d.packaging.as_deref()));
    let _ = writeln!(out, "  countries:  {}", or_missing(d.countries.as_deref()));
    if !d.category_tags.is_empty() {
        let _ = writeln!(out, "  categories: {}", d.category_tags.join(", "));
    }
    if !d.allergen_tags.is_empty() {
        let _ = writeln!(out, "  allergens:  {}", d.allergen_tags.join(", "));
    }
    let levels = &d.nutrient_levels;
    let _ = writeln!(
        out,
        "  levels:     fat {} | saturated fat {} | sugars {} | salt {}",
        levels.fat, levels.saturated_fat, levels.sugars, levels.salt
    );
    for (name, n) in d.nutriments.iter() {
        let _ = writeln!(out, "  {name:<14} {n}");
    }
    if !d.ingredients.is_empty() {
        let _ = writeln!(out, "  ingredients:");
        for i in &d.ingredients {
            match i.percent_estimate {
                Some(pct) => {
                    let _ = writeln!(out, "    - {} ({pct:.1}%)", or_missing(i.text.as_deref()));
                }
                None => {
                    let _ = writeln!(out, "    - {}", or_missing(i.text.as_deref()));
                }
            }
        }
    }
    out
}

/// Side-by-side view; every row is compared on its own.
pub fn comparison(a: &ProductDetail, b: &ProductDetail) -> String {
    let mut rows: Vec<(String, String, String)> = vec![
        (
            "product".into(),
            or_missing(a.name.as_deref()).into(),
            or_missing(b.name.as_deref()).into(),
        ),
        (
            "nutri-score".into(),
            grade(a.nutrition_grade),
            grade(b.nutrition_grade),
        ),
        (
            "fat level".into(),
            a.nutrient_levels.fat.to_string(),
            b.nutrient_levels.fat.to_string(),
        ),
        (
            "saturated fat level".into(),
            a.nutrient_levels.saturated_fat.to_string(),
            b.nutrient_levels.saturated_fat.to_string(),
        ),
        (
            "sugars level".into(),
            a.nutrient_levels.sugars.to_string(),
            b.nutrient_levels.sugars.to_string(),
        ),
        (
            "salt level".into(),
            a.nutrient_levels.salt.to_string(),
            b.nutrient_levels.salt.to_string(),
        ),
    ];

    let pairs = [
        ("energy", &a.nutriments.energy, &b.nutriments.energy),
        ("fat", &a.nutriments.fat, &b.nutriments.fat),
        (
            "saturated fat",
            &a.nutriments.saturated_fat,
            &b.nutriments.saturated_fat,
        ),
        ("sugars", &a.nutriments.sugars, &b.nutriments.sugars),
        ("salt", &a.nutriments.salt, &b.nutriments.salt),
        ("proteins", &a.nutriments.proteins, &b.nutriments.proteins),
    ];
    for (name, x, y) in pairs {
        rows.push((name.into(), x.to_string(), y.to_string()));
    }

    rows.push((
        "ingredients".into(),
        ingredient_list(&a.ingredients),
        ingredient_list(&b.ingredients),
    ));
    rows.push((
        "allergens".into(),
        join_or_missing(&a.allergen_tags),
        join_or_missing(&b.allergen_tags),
    ));

    let width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0).max(8);
    let mut out = String::new();
    for (label, left, right) in rows {
        let _ = writeln!(out, "{label:<20} {left:<width$}  {right}");
    }
    out
}

fn ingredient_list(ingredients: &[Ingredient]) -> String {
    let texts: Vec<String> = ingredients.iter().filter_map(|i| i.text.clone()).collect();
    join_or_missing(&texts)
}

fn join_or_missing(tags: &[String]) -> String {
    if tags.is_empty() {
        MISSING.to_string()
    } else {
        tags.join(", ")
    }
}

pub fn scan_line(s: &ScannedProduct) -> String {
    format!(
        "{}  {:<14} [{}] {}",
        s.scanned_at.date(),
        s.code,
        s.nutriscore_grade
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_else(|| MISSING.to_string()),
        or_missing(s.product_name.as_deref())
    )
}
