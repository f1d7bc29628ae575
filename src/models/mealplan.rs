use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::quantity::ensure_non_negative;
use crate::planner::{expand_to_ingredients, reconcile};
use crate::registry::Cookbook;

/// One day's component entries, in insertion order.
pub type DayEntries = Vec<(String, Decimal)>;

/// A multi-day meal plan.
///
/// `consume` lists what is eaten each day; `prepare_extra` lists recipes
/// batch-cooked ahead of need. `prepare` and `excedent` are owned by the
/// reconciliation engine: they are recomputed in full after every edit and
/// never edited directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealPlan {
    pub name: String,
    pub date: Option<String>,
    consume: Vec<DayEntries>,
    prepare_extra: Vec<DayEntries>,
    prepare: Vec<DayEntries>,
    excedent: BTreeMap<String, Decimal>,
}

impl MealPlan {
    /// Build a plan and run the initial reconciliation.
    ///
    /// `consume` and `prepare_extra` must have one entry per day and equal
    /// lengths; every referenced component must resolve in `cookbook`.
    pub fn new(
        cookbook: &Cookbook,
        name: &str,
        date: Option<String>,
        consume: Vec<DayEntries>,
        prepare_extra: Vec<DayEntries>,
    ) -> Result<Self> {
        validate_days(&consume)?;
        validate_days(&prepare_extra)?;
        let outcome = reconcile(cookbook, &consume, &prepare_extra)?;
        Ok(Self {
            name: name.to_string(),
            date,
            consume,
            prepare_extra,
            prepare: outcome.prepare,
            excedent: outcome.excedent,
        })
    }

    pub fn days(&self) -> usize {
        self.consume.len()
    }

    pub fn consume(&self) -> &[DayEntries] {
        &self.consume
    }

    pub fn prepare_extra(&self) -> &[DayEntries] {
        &self.prepare_extra
    }

    /// Per-day recipes to actually cook, in engine resolution order.
    pub fn prepare(&self) -> &[DayEntries] {
        &self.prepare
    }

    /// Servings left over after the final day.
    pub fn excedent(&self) -> &BTreeMap<String, Decimal> {
        &self.excedent
    }

    /// Replace the consumption schedule and recompute.
    ///
    /// On failure the previous schedule and derived state are kept.
    pub fn set_consume(&mut self, cookbook: &Cookbook, consume: Vec<DayEntries>) -> Result<()> {
        validate_days(&consume)?;
        let outcome = reconcile(cookbook, &consume, &self.prepare_extra)?;
        self.consume = consume;
        self.prepare = outcome.prepare;
        self.excedent = outcome.excedent;
        Ok(())
    }

    /// Replace the batch-cooking schedule and recompute.
    ///
    /// On failure the previous schedule and derived state are kept.
    pub fn set_prepare_extra(
        &mut self,
        cookbook: &Cookbook,
        prepare_extra: Vec<DayEntries>,
    ) -> Result<()> {
        validate_days(&prepare_extra)?;
        let outcome = reconcile(cookbook, &self.consume, &prepare_extra)?;
        self.prepare_extra = prepare_extra;
        self.prepare = outcome.prepare;
        self.excedent = outcome.excedent;
        Ok(())
    }

    /// Rebuild `prepare` and `excedent` from the current schedules.
    pub fn recompute(&mut self, cookbook: &Cookbook) -> Result<()> {
        let outcome = reconcile(cookbook, &self.consume, &self.prepare_extra)?;
        self.prepare = outcome.prepare;
        self.excedent = outcome.excedent;
        Ok(())
    }

    /// Exact consumed-calorie total for each day.
    pub fn get_calories(&self, cookbook: &Cookbook) -> Result<Vec<Decimal>> {
        self.consume
            .iter()
            .map(|day| {
                let mut total = Decimal::ZERO;
                for (id, servings) in day {
                    total += cookbook.get_calories(id, *servings)?;
                }
                Ok(total)
            })
            .collect()
    }

    /// Exact mean daily calorie intake; zero for an empty plan.
    ///
    /// Callers round up for display only.
    pub fn mean_daily_calories(&self, cookbook: &Cookbook) -> Result<Decimal> {
        if self.consume.is_empty() {
            return Ok(Decimal::ZERO);
        }
        let total: Decimal = self.get_calories(cookbook)?.into_iter().sum();
        Ok(total / Decimal::from(self.consume.len()))
    }

    /// Grand-total base-ingredient quantities across every day.
    ///
    /// This is the shopping list input: a single total, not per-day.
    pub fn get_ingredients(&self, cookbook: &Cookbook) -> Result<BTreeMap<String, Decimal>> {
        let mut totals = BTreeMap::new();
        for day in &self.consume {
            for (id, servings) in day {
                for (ingredient, quantity) in expand_to_ingredients(cookbook, id, *servings)? {
                    *totals.entry(ingredient).or_insert(Decimal::ZERO) += quantity;
                }
            }
        }
        Ok(totals)
    }

    /// Rewrite every reference to `old_id` after a registry rename.
    ///
    /// Quantities are untouched, so the derived state stays valid and no
    /// recomputation is needed.
    pub fn rename_component(&mut self, old_id: &str, new_id: &str) {
        let rename_days = |days: &mut Vec<DayEntries>| {
            for day in days {
                for (id, _) in day {
                    if id == old_id {
                        *id = new_id.to_string();
                    }
                }
            }
        };
        rename_days(&mut self.consume);
        rename_days(&mut self.prepare_extra);
        rename_days(&mut self.prepare);
        if let Some(quantity) = self.excedent.remove(old_id) {
            *self.excedent.entry(new_id.to_string()).or_insert(Decimal::ZERO) += quantity;
        }
    }

    /// Whether any schedule references `component_id`.
    pub fn references(&self, component_id: &str) -> bool {
        self.consume
            .iter()
            .chain(self.prepare_extra.iter())
            .any(|day| day.iter().any(|(id, _)| id == component_id))
    }
}

fn validate_days(days: &[DayEntries]) -> Result<()> {
    for day in days {
        for (id, servings) in day {
            ensure_non_negative(&format!("{id} servings"), *servings)?;
        }
    }
    Ok(())
}
