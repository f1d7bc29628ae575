use std::fs;
use std::path::Path;

use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{DayEntries, Ingredient, MealPlan, Recipe, Step, parse_quantity};
use crate::registry::Cookbook;

/// Persisted recipe shape.
///
/// Quantities serialize as exact decimal strings, never binary floats,
/// so a load/save cycle is loss-free.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub amounts: Vec<(String, Decimal)>,
    #[serde(default)]
    pub steps: Vec<(String, u64)>,
}

impl RecipeRecord {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            name: recipe.name.clone(),
            category: recipe.category.clone(),
            date: recipe.date.clone(),
            amounts: recipe.amounts.clone(),
            steps: recipe
                .steps
                .iter()
                .map(|step| (step.description.clone(), step.seconds))
                .collect(),
        }
    }

    /// Validate and convert into the in-memory model.
    pub fn into_recipe(self) -> Result<Recipe> {
        let mut recipe = Recipe::new(&self.id, &self.name);
        recipe.category = self.category;
        recipe.date = self.date;
        for (component_id, amount) in self.amounts {
            recipe.push_component(&component_id, amount)?;
        }
        recipe.steps = self
            .steps
            .into_iter()
            .map(|(description, seconds)| Step::new(&description, seconds))
            .collect();
        Ok(recipe)
    }
}

/// Persisted meal plan shape: the two input schedules only.
///
/// `prepare` and `excedent` are derived state and are recomputed on
/// load, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub consume: Vec<DayEntries>,
    pub prepare_extra: Vec<DayEntries>,
}

impl MealPlanRecord {
    pub fn from_mealplan(plan: &MealPlan) -> Self {
        Self {
            name: plan.name.clone(),
            date: plan.date.clone(),
            consume: plan.consume().to_vec(),
            prepare_extra: plan.prepare_extra().to_vec(),
        }
    }

    /// Validate against the registry and reconcile into a live plan.
    pub fn into_mealplan(self, cookbook: &Cookbook) -> Result<MealPlan> {
        MealPlan::new(cookbook, &self.name, self.date, self.consume, self.prepare_extra)
    }
}

/// Load ingredients from a `;`-separated CSV file.
///
/// Row format: `id;name;calories;unit`. Rows with a blank id are
/// skipped. A missing file is an empty cookbook, not an error.
pub fn load_ingredients<P: AsRef<Path>>(path: P) -> Result<Vec<Ingredient>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut ingredients = Vec::new();
    for record in reader.records() {
        let record = record?;
        let id = record.get(0).unwrap_or("").trim();
        if id.is_empty() {
            warn!("skipping ingredient row with blank id");
            continue;
        }
        let name = record.get(1).unwrap_or("").trim();
        let calories = parse_quantity(record.get(2).unwrap_or(""))?;
        let unit = record.get(3).unwrap_or("").trim();
        ingredients.push(Ingredient::new(id, name, calories, unit)?);
    }
    Ok(ingredients)
}

/// Save ingredients as `;`-separated CSV, one row per ingredient.
pub fn save_ingredients<P: AsRef<Path>>(path: P, ingredients: &[&Ingredient]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path.as_ref())?;
    for ingredient in ingredients {
        writer.write_record([
            ingredient.id.as_str(),
            ingredient.name.as_str(),
            &ingredient.calories.to_string(),
            ingredient.unit.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Load every recipe record from `<dir>/recipes/*.json`.
pub fn load_recipes<P: AsRef<Path>>(dir: P) -> Result<Vec<Recipe>> {
    let recipes_dir = dir.as_ref().join("recipes");
    let mut recipes = Vec::new();
    for path in json_files(&recipes_dir)? {
        let content = fs::read_to_string(&path)?;
        let record: RecipeRecord = serde_json::from_str(&content)?;
        recipes.push(record.into_recipe()?);
    }
    Ok(recipes)
}

/// Save one recipe to `<dir>/recipes/<id>.json`.
pub fn save_recipe<P: AsRef<Path>>(dir: P, recipe: &Recipe) -> Result<()> {
    let recipes_dir = dir.as_ref().join("recipes");
    fs::create_dir_all(&recipes_dir)?;
    let record = RecipeRecord::from_recipe(recipe);
    let json = serde_json::to_string_pretty(&record)?;
    fs::write(recipes_dir.join(format!("{}.json", recipe.id)), json)?;
    Ok(())
}

/// Load every meal plan record from `<dir>/mealplans/*.json`.
///
/// Records are returned unvalidated; turning one into a live plan
/// requires the registry (see [`MealPlanRecord::into_mealplan`]).
pub fn load_mealplan_records<P: AsRef<Path>>(dir: P) -> Result<Vec<MealPlanRecord>> {
    let plans_dir = dir.as_ref().join("mealplans");
    let mut records = Vec::new();
    for path in json_files(&plans_dir)? {
        let content = fs::read_to_string(&path)?;
        records.push(serde_json::from_str(&content)?);
    }
    Ok(records)
}

/// Save one meal plan to `<dir>/mealplans/<name>.json`.
pub fn save_mealplan<P: AsRef<Path>>(dir: P, plan: &MealPlan) -> Result<()> {
    let plans_dir = dir.as_ref().join("mealplans");
    fs::create_dir_all(&plans_dir)?;
    let record = MealPlanRecord::from_mealplan(plan);
    let json = serde_json::to_string_pretty(&record)?;
    fs::write(plans_dir.join(format!("{}.json", plan.name)), json)?;
    Ok(())
}

/// Load a whole cookbook directory: ingredients, recipes, meal plans.
///
/// All I/O happens here, before any engine call. Meal plans that no
/// longer reconcile (for example after a recipe was deleted by hand)
/// are skipped with a warning so the rest of the cookbook stays
/// usable; `check` reports them.
pub fn load_cookbook<P: AsRef<Path>>(dir: P) -> Result<Cookbook> {
    let dir = dir.as_ref();
    let mut cookbook = Cookbook::new();

    for ingredient in load_ingredients(dir.join("ingredients.csv"))? {
        cookbook.add_ingredient(ingredient)?;
    }
    for recipe in load_recipes(dir)? {
        cookbook.add_recipe(recipe)?;
    }
    for record in load_mealplan_records(dir)? {
        let name = record.name.clone();
        let result = record
            .into_mealplan(&cookbook)
            .and_then(|plan| cookbook.add_mealplan(plan));
        if let Err(error) = result {
            warn!("skipping meal plan '{name}': {error}");
        }
    }
    Ok(cookbook)
}

fn json_files(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    Ok(paths)
}
