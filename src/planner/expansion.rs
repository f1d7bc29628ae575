use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{KytchenError, Result};
use crate::registry::{Component, Cookbook};

/// Expand a component into every recipe it implies, including itself.
///
/// The result maps recipe ids to the cumulative servings required of
/// them: a recipe reached both directly and through another recipe
/// accumulates additively. Ingredient leaves are not included; an
/// ingredient id expands to an empty map.
pub fn expand(
    cookbook: &Cookbook,
    component_id: &str,
    servings: Decimal,
) -> Result<BTreeMap<String, Decimal>> {
    let mut accumulator = BTreeMap::new();
    let mut path = Vec::new();
    expand_recipes(cookbook, component_id, servings, &mut accumulator, &mut path)?;
    Ok(accumulator)
}

fn expand_recipes(
    cookbook: &Cookbook,
    id: &str,
    servings: Decimal,
    accumulator: &mut BTreeMap<String, Decimal>,
    path: &mut Vec<String>,
) -> Result<()> {
    let component = cookbook.resolve(id)?;
    if component.as_recipe().is_none() {
        return Ok(());
    }
    if path.iter().any(|ancestor| ancestor == id) {
        return Err(KytchenError::CyclicComposition(id.to_string()));
    }

    *accumulator.entry(id.to_string()).or_insert(Decimal::ZERO) += servings;

    path.push(id.to_string());
    for (sub_id, amount) in component.sub_components() {
        expand_recipes(cookbook, sub_id, servings * *amount, accumulator, path)?;
    }
    path.pop();
    Ok(())
}

/// Expand a component into base ingredient quantities.
///
/// Amounts multiply down each level of nesting. An ingredient id expands
/// to itself.
pub fn expand_to_ingredients(
    cookbook: &Cookbook,
    component_id: &str,
    quantity: Decimal,
) -> Result<BTreeMap<String, Decimal>> {
    let mut accumulator = BTreeMap::new();
    let mut path = Vec::new();
    expand_leaves(cookbook, component_id, quantity, &mut accumulator, &mut path)?;
    Ok(accumulator)
}

fn expand_leaves(
    cookbook: &Cookbook,
    id: &str,
    quantity: Decimal,
    accumulator: &mut BTreeMap<String, Decimal>,
    path: &mut Vec<String>,
) -> Result<()> {
    match cookbook.resolve(id)? {
        Component::Ingredient(_) => {
            *accumulator.entry(id.to_string()).or_insert(Decimal::ZERO) += quantity;
        }
        Component::Recipe(recipe) => {
            if path.iter().any(|ancestor| ancestor == id) {
                return Err(KytchenError::CyclicComposition(id.to_string()));
            }
            path.push(id.to_string());
            for (sub_id, amount) in &recipe.amounts {
                expand_leaves(cookbook, sub_id, quantity * *amount, accumulator, path)?;
            }
            path.pop();
        }
    }
    Ok(())
}

/// Compositeness weight of a component: its nested sub-recipe count.
///
/// A recipe weighs one plus the weight of every sub-recipe occurrence
/// (counted with multiplicity); ingredients weigh zero.
pub fn subrecipe_weight(cookbook: &Cookbook, component_id: &str) -> Result<u64> {
    let mut path = Vec::new();
    weigh(cookbook, component_id, &mut path)
}

fn weigh(cookbook: &Cookbook, id: &str, path: &mut Vec<String>) -> Result<u64> {
    let component = cookbook.resolve(id)?;
    if component.as_recipe().is_none() {
        return Ok(0);
    }
    if path.iter().any(|ancestor| ancestor == id) {
        return Err(KytchenError::CyclicComposition(id.to_string()));
    }

    path.push(id.to_string());
    let mut weight = 1;
    for (sub_id, _) in component.sub_components() {
        weight += weigh(cookbook, sub_id, path)?;
    }
    path.pop();
    Ok(weight)
}

/// Order component ids most-composite first.
///
/// Descending sub-recipe weight, ties broken by identifier, so overlap
/// resolution and rendering are deterministic.
pub fn composite_order<'a>(
    cookbook: &Cookbook,
    ids: impl Iterator<Item = &'a String>,
) -> Result<Vec<String>> {
    let mut weighted = ids
        .map(|id| Ok((subrecipe_weight(cookbook, id)?, id.clone())))
        .collect::<Result<Vec<(u64, String)>>>()?;
    weighted.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    Ok(weighted.into_iter().map(|(_, id)| id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, Recipe};
    use rust_decimal_macros::dec;

    /// tomato -> sauce -> pasta, noodles -> pasta.
    fn pasta_cookbook() -> Cookbook {
        let mut cookbook = Cookbook::new();
        cookbook
            .add_ingredient(Ingredient::new("tomato", "Tomato", dec!(30), "unit").unwrap())
            .unwrap();
        cookbook
            .add_ingredient(Ingredient::new("noodles", "Noodles", dec!(50), "portion").unwrap())
            .unwrap();

        let mut sauce = Recipe::new("sauce", "Tomato sauce");
        sauce.push_component("tomato", dec!(3)).unwrap();
        cookbook.add_recipe(sauce).unwrap();

        let mut pasta = Recipe::new("pasta", "Pasta al pomodoro");
        pasta.push_component("sauce", dec!(1)).unwrap();
        pasta.push_component("noodles", dec!(2)).unwrap();
        cookbook.add_recipe(pasta).unwrap();
        cookbook
    }

    #[test]
    fn test_expand_includes_root_and_nested_recipes() {
        let cookbook = pasta_cookbook();
        let expanded = expand(&cookbook, "pasta", dec!(2)).unwrap();
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded["pasta"], dec!(2));
        assert_eq!(expanded["sauce"], dec!(2));
    }

    #[test]
    fn test_expand_ingredient_is_empty() {
        let cookbook = pasta_cookbook();
        assert!(expand(&cookbook, "tomato", dec!(5)).unwrap().is_empty());
    }

    #[test]
    fn test_expand_accumulates_shared_subrecipes() {
        let mut cookbook = pasta_cookbook();
        // lasagna uses sauce both directly and through pasta
        let mut lasagna = Recipe::new("lasagna", "Lasagna");
        lasagna.push_component("pasta", dec!(1)).unwrap();
        lasagna.push_component("sauce", dec!(2)).unwrap();
        cookbook.add_recipe(lasagna).unwrap();

        let expanded = expand(&cookbook, "lasagna", dec!(1)).unwrap();
        assert_eq!(expanded["sauce"], dec!(3));
        assert_eq!(expanded["pasta"], dec!(1));
    }

    #[test]
    fn test_expand_to_ingredients_multiplies_down() {
        let cookbook = pasta_cookbook();
        let leaves = expand_to_ingredients(&cookbook, "pasta", dec!(1)).unwrap();
        assert_eq!(leaves["tomato"], dec!(3));
        assert_eq!(leaves["noodles"], dec!(2));

        let doubled = expand_to_ingredients(&cookbook, "pasta", dec!(2)).unwrap();
        assert_eq!(doubled["tomato"], dec!(6));
        assert_eq!(doubled["noodles"], dec!(4));
    }

    #[test]
    fn test_expand_to_ingredients_of_ingredient() {
        let cookbook = pasta_cookbook();
        let leaves = expand_to_ingredients(&cookbook, "tomato", dec!(4)).unwrap();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves["tomato"], dec!(4));
    }

    #[test]
    fn test_unknown_component_propagates() {
        let mut cookbook = pasta_cookbook();
        let mut broken = Recipe::new("broken", "Broken");
        broken.push_component("unicorn", dec!(1)).unwrap();
        cookbook.add_recipe(broken).unwrap();

        assert!(matches!(
            expand(&cookbook, "broken", dec!(1)),
            Err(KytchenError::UnknownComponent(_))
        ));
        assert!(matches!(
            expand(&cookbook, "unicorn", dec!(1)),
            Err(KytchenError::UnknownComponent(_))
        ));
    }

    #[test]
    fn test_cycle_detected() {
        let mut cookbook = Cookbook::new();
        let mut a = Recipe::new("a", "A");
        a.push_component("b", dec!(1)).unwrap();
        let mut b = Recipe::new("b", "B");
        b.push_component("a", dec!(1)).unwrap();
        cookbook.add_recipe(a).unwrap();
        cookbook.add_recipe(b).unwrap();

        assert!(matches!(
            expand(&cookbook, "a", dec!(1)),
            Err(KytchenError::CyclicComposition(_))
        ));
        assert!(matches!(
            expand_to_ingredients(&cookbook, "a", dec!(1)),
            Err(KytchenError::CyclicComposition(_))
        ));
        assert!(matches!(
            subrecipe_weight(&cookbook, "a"),
            Err(KytchenError::CyclicComposition(_))
        ));
    }

    #[test]
    fn test_subrecipe_weight_counts_multiplicity() {
        let cookbook = pasta_cookbook();
        assert_eq!(subrecipe_weight(&cookbook, "tomato").unwrap(), 0);
        assert_eq!(subrecipe_weight(&cookbook, "sauce").unwrap(), 1);
        assert_eq!(subrecipe_weight(&cookbook, "pasta").unwrap(), 2);
    }

    #[test]
    fn test_composite_order_is_deterministic() {
        let cookbook = pasta_cookbook();
        let ids = vec![
            "sauce".to_string(),
            "pasta".to_string(),
            "tomato".to_string(),
        ];
        let order = composite_order(&cookbook, ids.iter()).unwrap();
        assert_eq!(order, vec!["pasta", "sauce", "tomato"]);
    }

    #[test]
    fn test_composite_order_ties_break_lexically() {
        let mut cookbook = Cookbook::new();
        cookbook
            .add_ingredient(Ingredient::new("water", "Water", dec!(0), "ml").unwrap())
            .unwrap();
        for id in ["broth", "aspic"] {
            let mut recipe = Recipe::new(id, id);
            recipe.push_component("water", dec!(1)).unwrap();
            cookbook.add_recipe(recipe).unwrap();
        }
        let ids = vec!["broth".to_string(), "aspic".to_string()];
        let order = composite_order(&cookbook, ids.iter()).unwrap();
        assert_eq!(order, vec!["aspic", "broth"]);
    }
}
