pub mod expansion;
pub mod reconcile;

pub use expansion::{composite_order, expand, expand_to_ingredients, subrecipe_weight};
pub use reconcile::{reconcile, Reconciliation};
