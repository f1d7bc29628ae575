mod ingredient;
mod mealplan;
mod quantity;
mod recipe;

pub use ingredient::Ingredient;
pub use mealplan::{DayEntries, MealPlan};
pub use quantity::{ensure_non_negative, parse_quantity};
pub use recipe::{format_duration, parse_duration, Recipe, Step, RECIPE_UNIT};
