pub mod cli;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod registry;

pub use error::{KytchenError, Result};
pub use models::{Ingredient, MealPlan, Recipe, Step};
pub use registry::{Component, Cookbook};
