use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::quantity::ensure_non_negative;

/// A base ingredient: the terminal node of recipe expansion.
///
/// Calories are per unit of measurement, fixed once loaded. The
/// reconciliation engine only ever reads ingredients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    /// Unique identifier; stable except through a registry rename.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Calories per one unit.
    pub calories: Decimal,
    /// Unit of measurement label ("g", "ml", "unit", ...).
    pub unit: String,
}

impl Ingredient {
    /// Create an ingredient, rejecting negative calorie counts.
    pub fn new(id: &str, name: &str, calories: Decimal, unit: &str) -> Result<Self> {
        let calories = ensure_non_negative(&format!("calories of {id}"), calories)?;
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            calories,
            unit: unit.to_string(),
        })
    }

    /// Calories contained in `quantity` units.
    pub fn get_calories(&self, quantity: Decimal) -> Decimal {
        self.calories * quantity
    }
}

impl std::fmt::Display for Ingredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} kcal/{})", self.name, self.calories, self.unit)
    }
}
