use std::fs;
use std::path::Path;

use clap::Parser;
use rust_decimal::Decimal;

use kytchen::cli::{Cli, Command};
use kytchen::error::Result;
use kytchen::interface::{confirm, plan_report, recipe_text, shopping_list_text, suggest};
use kytchen::models::parse_quantity;
use kytchen::planner::expand;
use kytchen::registry::{
    load_cookbook, load_ingredients, load_mealplan_records, load_recipes, save_ingredients,
    save_mealplan, save_recipe, Component, Cookbook,
};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Summary => cmd_summary(&cli.dir),
        Command::Ingredients => cmd_ingredients(&cli.dir),
        Command::Show { id, servings } => cmd_show(&cli.dir, &id, &servings),
        Command::Plan { name } => cmd_plan(&cli.dir, &name),
        Command::Shopping { name } => cmd_shopping(&cli.dir, &name),
        Command::Check => cmd_check(&cli.dir),
        Command::Rename {
            old_id,
            new_id,
            yes,
        } => cmd_rename(&cli.dir, &old_id, &new_id, yes),
    }
}

/// Overview of the cookbook contents.
fn cmd_summary(dir: &str) -> Result<()> {
    let cookbook = load_cookbook(Path::new(dir))?;

    let ingredients = cookbook.ingredients();
    let recipes = cookbook.recipes();
    let plans: Vec<_> = cookbook.mealplans().collect();
    println!(
        "{} ingredients, {} recipes, {} meal plans",
        ingredients.len(),
        recipes.len(),
        plans.len()
    );

    if !recipes.is_empty() {
        println!();
        println!("Recipes:");
        for recipe in recipes {
            match cookbook.get_calories(&recipe.id, Decimal::ONE) {
                Ok(calories) => println!(
                    "  {} - {} ({} kcal/serv)",
                    recipe.id,
                    recipe.name,
                    calories.ceil().normalize()
                ),
                Err(_) => println!("  {} - {}", recipe.id, recipe.name),
            }
        }
    }

    if !plans.is_empty() {
        println!();
        println!("Meal plans:");
        for plan in plans {
            println!("  {} ({} days)", plan.name, plan.days());
        }
    }
    Ok(())
}

/// List all ingredients.
fn cmd_ingredients(dir: &str) -> Result<()> {
    let cookbook = load_cookbook(Path::new(dir))?;
    let ingredients = cookbook.ingredients();

    if ingredients.is_empty() {
        println!("No ingredients loaded. Add rows to ingredients.csv (id;name;kcal;unit).");
        return Ok(());
    }

    println!("=== Ingredients ({} items) ===", ingredients.len());
    println!();
    for ingredient in ingredients {
        println!(
            "  {} - {}, {} kcal/{}",
            ingredient.id, ingredient.name, ingredient.calories, ingredient.unit
        );
    }
    Ok(())
}

/// Print a recipe scaled to the requested servings.
fn cmd_show(dir: &str, id: &str, servings: &str) -> Result<()> {
    let servings = parse_quantity(servings)?;
    let cookbook = load_cookbook(Path::new(dir))?;

    let Some(component) = cookbook.get(id) else {
        eprintln!("Unknown component: {}", id);
        if let Some(closest) = suggest(id, cookbook.component_ids()) {
            eprintln!("Did you mean '{}'?", closest);
        }
        return Ok(());
    };

    match component {
        Component::Recipe(recipe) => {
            print!("{}", recipe_text(&cookbook, recipe, servings)?);
        }
        Component::Ingredient(ingredient) => {
            println!("{}", ingredient);
            println!(
                "{} {}: {} kcal",
                servings.normalize(),
                ingredient.unit,
                ingredient.get_calories(servings).ceil().normalize()
            );
        }
    }
    Ok(())
}

/// Print a meal plan report.
fn cmd_plan(dir: &str, name: &str) -> Result<()> {
    let cookbook = load_cookbook(Path::new(dir))?;
    match cookbook.mealplan(name) {
        Some(plan) => print!("{}", plan_report(&cookbook, plan)?),
        None => {
            eprintln!("Unknown meal plan: {}", name);
            if let Some(closest) = suggest(name, cookbook.mealplans().map(|p| p.name.as_str())) {
                eprintln!("Did you mean '{}'?", closest);
            }
        }
    }
    Ok(())
}

/// Print a meal plan's shopping list.
fn cmd_shopping(dir: &str, name: &str) -> Result<()> {
    let cookbook = load_cookbook(Path::new(dir))?;
    match cookbook.mealplan(name) {
        Some(plan) => print!("{}", shopping_list_text(&cookbook, plan)?),
        None => {
            eprintln!("Unknown meal plan: {}", name);
            if let Some(closest) = suggest(name, cookbook.mealplans().map(|p| p.name.as_str())) {
                eprintln!("Did you mean '{}'?", closest);
            }
        }
    }
    Ok(())
}

/// Validate every recipe and meal plan in the cookbook.
fn cmd_check(dir: &str) -> Result<()> {
    let dir = Path::new(dir);
    let mut findings = Vec::new();

    let mut cookbook = Cookbook::new();
    for ingredient in load_ingredients(dir.join("ingredients.csv"))? {
        let id = ingredient.id.clone();
        if let Err(error) = cookbook.add_ingredient(ingredient) {
            findings.push(format!("ingredient {id}: {error}"));
        }
    }
    for recipe in load_recipes(dir)? {
        let id = recipe.id.clone();
        if let Err(error) = cookbook.add_recipe(recipe) {
            findings.push(format!("recipe {id}: {error}"));
        }
    }

    for recipe in cookbook.recipes() {
        if let Err(error) = expand(&cookbook, &recipe.id, Decimal::ONE) {
            findings.push(format!("recipe {}: {}", recipe.id, error));
        }
    }
    for record in load_mealplan_records(dir)? {
        let name = record.name.clone();
        if let Err(error) = record.into_mealplan(&cookbook) {
            findings.push(format!("meal plan {name}: {error}"));
        }
    }

    if findings.is_empty() {
        println!("Cookbook is consistent ({} components).", cookbook.len());
        return Ok(());
    }
    for finding in &findings {
        println!("- {}", finding);
    }
    println!("{} problem(s) found.", findings.len());
    std::process::exit(1);
}

/// Rename a component, updating every reference and saving the result.
fn cmd_rename(dir: &str, old_id: &str, new_id: &str, yes: bool) -> Result<()> {
    let dir = Path::new(dir);
    let mut cookbook = load_cookbook(dir)?;

    let Some(component) = cookbook.get(old_id) else {
        eprintln!("Unknown component: {}", old_id);
        if let Some(closest) = suggest(old_id, cookbook.component_ids()) {
            eprintln!("Did you mean '{}'?", closest);
        }
        return Ok(());
    };
    let was_recipe = component.as_recipe().is_some();

    let recipe_users = cookbook.used_by(old_id).len();
    let plan_users = cookbook
        .mealplans()
        .filter(|plan| plan.references(old_id))
        .count();
    if !yes {
        let prompt = format!(
            "Rename '{}' to '{}' (referenced by {} recipe(s), {} meal plan(s))?",
            old_id, new_id, recipe_users, plan_users
        );
        if !confirm(&prompt, true)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    cookbook.rename(old_id, new_id)?;

    save_ingredients(dir.join("ingredients.csv"), &cookbook.ingredients())?;
    for recipe in cookbook.recipes() {
        save_recipe(dir, recipe)?;
    }
    for plan in cookbook.mealplans() {
        save_mealplan(dir, plan)?;
    }
    if was_recipe {
        let stale = dir.join("recipes").join(format!("{old_id}.json"));
        if stale.exists() {
            fs::remove_file(stale)?;
        }
    }

    println!("Renamed '{}' to '{}'.", old_id, new_id);
    Ok(())
}
