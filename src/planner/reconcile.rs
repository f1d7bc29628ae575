use std::collections::BTreeMap;

use log::debug;
use rust_decimal::Decimal;

use crate::error::{KytchenError, Result};
use crate::models::DayEntries;
use crate::planner::expansion::{composite_order, expand};
use crate::registry::{Component, Cookbook};

/// The outcome of reconciling a meal plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Per-day recipes to actually cook, most composite first.
    pub prepare: Vec<DayEntries>,
    /// Servings prepared but never consumed, after the final day.
    pub excedent: BTreeMap<String, Decimal>,
}

/// Net each day's implied preparation against surplus carried forward.
///
/// A day-by-day sweep over `consume` and `prepare_extra`. `done` is the
/// running ledger of servings prepared on earlier days but not yet
/// eaten; each day first consumes that surplus, then adds the day's
/// batch-cooking on top. The sweep is stateless between invocations:
/// every call rebuilds the ledger from scratch, so reconciling twice on
/// unchanged inputs yields identical results.
pub fn reconcile(
    cookbook: &Cookbook,
    consume: &[DayEntries],
    prepare_extra: &[DayEntries],
) -> Result<Reconciliation> {
    if consume.len() != prepare_extra.len() {
        return Err(KytchenError::MismatchedPlanLength {
            consume: consume.len(),
            prepare_extra: prepare_extra.len(),
        });
    }

    let mut done: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut prepare = Vec::with_capacity(consume.len());

    for (day, (meals, extra)) in consume.iter().zip(prepare_extra).enumerate() {
        // 1. Everything this day's consumption implies must exist.
        let mut required = day_requirements(cookbook, meals)?;

        // 2. Offset against surplus, most composite recipes first: a
        //    cooked composite already embodies its sub-recipes, so its
        //    whole expansion comes off the requirements before the
        //    finer-grained parts get a chance to be counted twice.
        for id in composite_order(cookbook, required.keys())? {
            let Some(surplus) = done.get(&id).copied() else {
                continue;
            };
            let needed = required.get(&id).copied().unwrap_or(Decimal::ZERO);
            let amount_done = surplus.min(needed);
            if amount_done == Decimal::ZERO {
                continue;
            }
            done.insert(id.clone(), surplus - amount_done);
            for (covered, quantity) in expand(cookbook, &id, amount_done)? {
                if let Some(requirement) = required.get_mut(&covered) {
                    *requirement -= quantity;
                }
            }
            debug!("day {day}: {amount_done} servings of {id} covered by surplus");
        }

        // 3. Batch-cooking: the extra work is done today, and only the
        //    top-level servings carry forward as surplus (their
        //    sub-recipes are inside them).
        for (id, servings) in extra {
            if is_ingredient(cookbook, id)? {
                return Err(KytchenError::InvalidQuantity(format!(
                    "{id} is an ingredient and cannot be batch-prepared"
                )));
            }
            for (implied, quantity) in expand(cookbook, id, *servings)? {
                *required.entry(implied).or_insert(Decimal::ZERO) += quantity;
            }
            *done.entry(id.clone()).or_insert(Decimal::ZERO) += *servings;
        }

        // 4. A zero entry is equivalent to absence.
        purge(&mut required);
        purge(&mut done);

        // 5. Record the day's actual preparation.
        let order = composite_order(cookbook, required.keys())?;
        prepare.push(
            order
                .into_iter()
                .map(|id| {
                    let servings = required[&id];
                    (id, servings)
                })
                .collect(),
        );
    }

    debug!("reconciled {} days, excedent: {:?}", consume.len(), done);
    Ok(Reconciliation {
        prepare,
        excedent: done,
    })
}

/// Merge the expansions of everything consumed on one day.
///
/// Directly-consumed ingredients need no cooking and contribute nothing
/// here; they still count for calories and the shopping list.
fn day_requirements(
    cookbook: &Cookbook,
    meals: &DayEntries,
) -> Result<BTreeMap<String, Decimal>> {
    let mut required = BTreeMap::new();
    for (id, servings) in meals {
        for (implied, quantity) in expand(cookbook, id, *servings)? {
            *required.entry(implied).or_insert(Decimal::ZERO) += quantity;
        }
    }
    Ok(required)
}

fn is_ingredient(cookbook: &Cookbook, id: &str) -> Result<bool> {
    Ok(matches!(cookbook.resolve(id)?, Component::Ingredient(_)))
}

fn purge(map: &mut BTreeMap<String, Decimal>) {
    map.retain(|_, quantity| *quantity != Decimal::ZERO);
}
