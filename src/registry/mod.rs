mod cookbook;
mod persistence;

pub use cookbook::{Component, Cookbook};
pub use persistence::{
    load_cookbook, load_ingredients, load_mealplan_records, load_recipes, save_ingredients,
    save_mealplan, save_recipe, MealPlanRecord, RecipeRecord,
};
