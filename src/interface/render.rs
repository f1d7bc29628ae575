use std::fmt::Write as _;

use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{format_duration, MealPlan, Recipe};
use crate::registry::Cookbook;

fn quantity(value: Decimal) -> Decimal {
    value.normalize()
}

fn kcal(value: Decimal) -> Decimal {
    value.ceil().normalize()
}

/// Render a recipe the way it is read at the stove: heading, scaled
/// ingredient amounts, then the method with a running clock.
pub fn recipe_text(cookbook: &Cookbook, recipe: &Recipe, servings: Decimal) -> Result<String> {
    let mut out = String::new();

    out.push_str(&recipe.name);
    if let Some(date) = &recipe.date {
        let _ = write!(out, " ({date})");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Servings: {}", quantity(servings));
    let _ = writeln!(
        out,
        "Calories: {} kcal",
        kcal(cookbook.get_calories(&recipe.id, servings)?)
    );
    let total_seconds = recipe.total_seconds();
    if total_seconds > 0 {
        let _ = writeln!(out, "Preparation time: {}", format_duration(total_seconds));
    }

    let _ = writeln!(out, "\nINGREDIENTS");
    for (component_id, amount) in recipe.get_amounts(servings) {
        let component = cookbook.resolve(&component_id)?;
        let _ = writeln!(
            out,
            "{} {}  {}",
            quantity(amount),
            component.unit(),
            component.name()
        );
    }

    if !recipe.steps.is_empty() {
        let _ = writeln!(out, "\nMETHOD");
        let mut elapsed = 0;
        for step in &recipe.steps {
            elapsed += step.seconds;
            let _ = writeln!(out, "- {} >{}", step, format_duration(elapsed));
        }
    }
    Ok(out)
}

/// Render a meal plan: per-day consume/prepare sections in day order,
/// then the average daily energy and any excedent.
pub fn plan_report(cookbook: &Cookbook, plan: &MealPlan) -> Result<String> {
    let mut out = String::new();

    out.push_str(&plan.name);
    if let Some(date) = &plan.date {
        let _ = write!(out, " ({date})");
    }
    let _ = writeln!(out);

    for (day, meals) in plan.consume().iter().enumerate() {
        let _ = writeln!(out, "\nDay {}", day + 1);
        let _ = writeln!(out, "CONSUME:");
        for (id, servings) in meals {
            let component = cookbook.resolve(id)?;
            let calories = component.get_calories(cookbook, *servings)?;
            let _ = writeln!(
                out,
                "- {} (servings: {}, {} kcal)",
                component.name(),
                quantity(*servings),
                kcal(calories)
            );
        }
        let _ = writeln!(out, "PREPARE:");
        for (id, servings) in &plan.prepare()[day] {
            let _ = writeln!(
                out,
                "- {} (servings: {})",
                cookbook.resolve(id)?.name(),
                quantity(*servings)
            );
        }
    }

    let _ = writeln!(
        out,
        "\nAverage daily energy: {} kcal",
        kcal(plan.mean_daily_calories(cookbook)?)
    );

    if !plan.excedent().is_empty() {
        let _ = writeln!(out, "\nEXCEDENT:");
        for (id, servings) in plan.excedent() {
            let component = cookbook.resolve(id)?;
            let _ = writeln!(
                out,
                "{} {}  {}",
                quantity(*servings),
                component.unit(),
                component.name()
            );
        }
    }
    Ok(out)
}

/// Shopping list rows: display name, total quantity, unit, sorted
/// alphabetically by display name.
pub fn shopping_list(
    cookbook: &Cookbook,
    plan: &MealPlan,
) -> Result<Vec<(String, Decimal, String)>> {
    let mut rows = Vec::new();
    for (id, total) in plan.get_ingredients(cookbook)? {
        let component = cookbook.resolve(&id)?;
        rows.push((
            component.name().to_string(),
            quantity(total),
            component.unit().to_string(),
        ));
    }
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(rows)
}

/// Shopping list as printable text, one `name: quantity unit` line each.
pub fn shopping_list_text(cookbook: &Cookbook, plan: &MealPlan) -> Result<String> {
    let mut out = String::new();
    for (name, total, unit) in shopping_list(cookbook, plan)? {
        let _ = writeln!(out, "{name}: {total} {unit}");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, Step};
    use rust_decimal_macros::dec;

    fn sample_cookbook() -> Cookbook {
        let mut cookbook = Cookbook::new();
        cookbook
            .add_ingredient(Ingredient::new("tomato", "Tomato", dec!(30), "unit").unwrap())
            .unwrap();
        cookbook
            .add_ingredient(Ingredient::new("noodles", "Noodles", dec!(50), "portion").unwrap())
            .unwrap();

        let mut sauce = Recipe::new("sauce", "Tomato sauce");
        sauce.push_component("tomato", dec!(3)).unwrap();
        sauce.steps.push(Step::new("Simmer", 600));
        cookbook.add_recipe(sauce).unwrap();

        let mut pasta = Recipe::new("pasta", "Pasta al pomodoro");
        pasta.push_component("sauce", dec!(1)).unwrap();
        pasta.push_component("noodles", dec!(2)).unwrap();
        cookbook.add_recipe(pasta).unwrap();
        cookbook
    }

    #[test]
    fn test_recipe_text() {
        let cookbook = sample_cookbook();
        let sauce = cookbook.resolve("sauce").unwrap().as_recipe().unwrap();
        let text = recipe_text(&cookbook, sauce, dec!(2)).unwrap();

        assert!(text.starts_with("Tomato sauce\n"));
        assert!(text.contains("Servings: 2"));
        assert!(text.contains("Calories: 180 kcal"));
        assert!(text.contains("Preparation time: 10:00"));
        assert!(text.contains("6 unit  Tomato"));
        assert!(text.contains("- Simmer (10:00) >10:00"));
    }

    #[test]
    fn test_recipe_text_lists_subrecipes_in_servings() {
        let cookbook = sample_cookbook();
        let pasta = cookbook.resolve("pasta").unwrap().as_recipe().unwrap();
        let text = recipe_text(&cookbook, pasta, dec!(1)).unwrap();

        assert!(text.contains("1 serv  Tomato sauce"));
        assert!(text.contains("2 portion  Noodles"));
        // 90 kcal of sauce + 100 kcal of noodles
        assert!(text.contains("Calories: 190 kcal"));
    }

    #[test]
    fn test_plan_report_and_shopping_list() {
        let cookbook = sample_cookbook();
        let plan = MealPlan::new(
            &cookbook,
            "Pasta week",
            Some("2026-08-03".to_string()),
            vec![
                vec![("pasta".to_string(), dec!(2))],
                vec![("pasta".to_string(), dec!(1))],
            ],
            vec![vec![("pasta".to_string(), dec!(1))], vec![]],
        )
        .unwrap();

        let report = plan_report(&cookbook, &plan).unwrap();
        assert!(report.starts_with("Pasta week (2026-08-03)\n"));
        assert!(report.contains("Day 1"));
        assert!(report.contains("- Pasta al pomodoro (servings: 2, 380 kcal)"));
        assert!(report.contains("- Pasta al pomodoro (servings: 3)"));
        assert!(report.contains("Day 2"));
        // day 2 is fully covered by day 1's surplus
        assert!(report.contains("Average daily energy: 285 kcal"));
        assert!(!report.contains("EXCEDENT"));

        let rows = shopping_list(&cookbook, &plan).unwrap();
        assert_eq!(
            rows,
            vec![
                ("Noodles".to_string(), dec!(6), "portion".to_string()),
                ("Tomato".to_string(), dec!(9), "unit".to_string()),
            ]
        );
    }

    #[test]
    fn test_plan_report_shows_excedent() {
        let cookbook = sample_cookbook();
        let plan = MealPlan::new(
            &cookbook,
            "Batch day",
            None,
            vec![vec![]],
            vec![vec![("sauce".to_string(), dec!(2))]],
        )
        .unwrap();

        let report = plan_report(&cookbook, &plan).unwrap();
        assert!(report.contains("EXCEDENT:"));
        assert!(report.contains("2 serv  Tomato sauce"));
    }
}
