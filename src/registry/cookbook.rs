use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::error::{KytchenError, Result};
use crate::models::{Ingredient, MealPlan, Recipe, RECIPE_UNIT};
use crate::planner::expand_to_ingredients;

/// A cookbook component: an ingredient leaf or a composite recipe.
///
/// The two variants expose the same capability surface, so expansion
/// recursion terminates uniformly at ingredients (whose sub-component
/// list is empty) without scattered type checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Ingredient(Ingredient),
    Recipe(Recipe),
}

impl Component {
    pub fn id(&self) -> &str {
        match self {
            Component::Ingredient(ingredient) => &ingredient.id,
            Component::Recipe(recipe) => &recipe.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Component::Ingredient(ingredient) => &ingredient.name,
            Component::Recipe(recipe) => &recipe.name,
        }
    }

    /// Unit label: the ingredient's own unit, or servings for a recipe.
    pub fn unit(&self) -> &str {
        match self {
            Component::Ingredient(ingredient) => &ingredient.unit,
            Component::Recipe(_) => RECIPE_UNIT,
        }
    }

    /// Direct sub-component amounts per serving; empty for ingredients.
    pub fn sub_components(&self) -> &[(String, Decimal)] {
        match self {
            Component::Ingredient(_) => &[],
            Component::Recipe(recipe) => &recipe.amounts,
        }
    }

    pub fn as_recipe(&self) -> Option<&Recipe> {
        match self {
            Component::Recipe(recipe) => Some(recipe),
            Component::Ingredient(_) => None,
        }
    }

    pub fn as_ingredient(&self) -> Option<&Ingredient> {
        match self {
            Component::Ingredient(ingredient) => Some(ingredient),
            Component::Recipe(_) => None,
        }
    }

    /// Calories contained in `servings` of this component.
    pub fn get_calories(&self, cookbook: &Cookbook, servings: Decimal) -> Result<Decimal> {
        match self {
            Component::Ingredient(ingredient) => Ok(ingredient.get_calories(servings)),
            Component::Recipe(recipe) => cookbook.get_calories(&recipe.id, servings),
        }
    }

    fn set_id(&mut self, id: &str) {
        match self {
            Component::Ingredient(ingredient) => ingredient.id = id.to_string(),
            Component::Recipe(recipe) => recipe.id = id.to_string(),
        }
    }
}

/// The component registry for one cookbook session.
///
/// An explicit object passed by reference to every engine call; there is
/// no ambient global state. All file I/O happens in the persistence layer
/// before the engines run, so `resolve` is a pure map lookup and the map
/// itself is the resolution cache.
#[derive(Debug, Default)]
pub struct Cookbook {
    components: HashMap<String, Component>,
    mealplans: BTreeMap<String, MealPlan>,
}

impl Cookbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an identifier to its component.
    pub fn resolve(&self, id: &str) -> Result<&Component> {
        self.components
            .get(id)
            .ok_or_else(|| KytchenError::UnknownComponent(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    /// Calories contained in `servings` of the identified component.
    pub fn get_calories(&self, id: &str, servings: Decimal) -> Result<Decimal> {
        let mut total = Decimal::ZERO;
        for (ingredient_id, quantity) in expand_to_ingredients(self, id, servings)? {
            // expand_to_ingredients only emits ingredient ids
            if let Some(ingredient) = self.resolve(&ingredient_id)?.as_ingredient() {
                total += ingredient.get_calories(quantity);
            }
        }
        Ok(total)
    }

    pub fn add_ingredient(&mut self, ingredient: Ingredient) -> Result<()> {
        self.add_component(Component::Ingredient(ingredient))
    }

    pub fn add_recipe(&mut self, recipe: Recipe) -> Result<()> {
        self.add_component(Component::Recipe(recipe))
    }

    fn add_component(&mut self, component: Component) -> Result<()> {
        let id = component.id().to_string();
        if self.components.contains_key(&id) {
            return Err(KytchenError::DuplicateIdentifier(id));
        }
        self.components.insert(id, component);
        Ok(())
    }

    pub fn add_mealplan(&mut self, plan: MealPlan) -> Result<()> {
        if self.mealplans.contains_key(&plan.name) {
            return Err(KytchenError::DuplicateIdentifier(plan.name));
        }
        self.mealplans.insert(plan.name.clone(), plan);
        Ok(())
    }

    pub fn mealplan(&self, name: &str) -> Option<&MealPlan> {
        self.mealplans.get(name)
    }

    pub fn mealplans(&self) -> impl Iterator<Item = &MealPlan> {
        self.mealplans.values()
    }

    /// All ingredients, ordered by identifier.
    pub fn ingredients(&self) -> Vec<&Ingredient> {
        let mut ingredients: Vec<&Ingredient> = self
            .components
            .values()
            .filter_map(Component::as_ingredient)
            .collect();
        ingredients.sort_by(|a, b| a.id.cmp(&b.id));
        ingredients
    }

    /// All recipes, ordered by identifier.
    pub fn recipes(&self) -> Vec<&Recipe> {
        let mut recipes: Vec<&Recipe> = self
            .components
            .values()
            .filter_map(Component::as_recipe)
            .collect();
        recipes.sort_by(|a, b| a.id.cmp(&b.id));
        recipes
    }

    /// All component identifiers, ordered.
    pub fn component_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.components.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Identifiers of recipes whose amounts reference `id`.
    ///
    /// The "used by" relation is a lookup over the registry, never a
    /// stored back-pointer on the component.
    pub fn used_by(&self, id: &str) -> Vec<String> {
        let mut users: Vec<String> = self
            .components
            .values()
            .filter_map(Component::as_recipe)
            .filter(|recipe| recipe.references(id))
            .map(|recipe| recipe.id.clone())
            .collect();
        users.sort_unstable();
        users
    }

    /// Move a component to a new identifier, rewriting every reference.
    ///
    /// The old key is removed and the new key inserted as one step; on
    /// failure nothing changes.
    pub fn rename(&mut self, old_id: &str, new_id: &str) -> Result<()> {
        if self.components.contains_key(new_id) {
            return Err(KytchenError::DuplicateIdentifier(new_id.to_string()));
        }
        let Some(mut component) = self.components.remove(old_id) else {
            return Err(KytchenError::UnknownComponent(old_id.to_string()));
        };
        component.set_id(new_id);
        self.components.insert(new_id.to_string(), component);

        for component in self.components.values_mut() {
            if let Component::Recipe(recipe) = component {
                for (id, _) in &mut recipe.amounts {
                    if id == old_id {
                        *id = new_id.to_string();
                    }
                }
            }
        }
        for plan in self.mealplans.values_mut() {
            plan.rename_component(old_id, new_id);
        }
        Ok(())
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
