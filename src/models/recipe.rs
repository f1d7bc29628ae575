use rust_decimal::Decimal;

use crate::error::{KytchenError, Result};
use crate::models::quantity::ensure_non_negative;

/// The unit label shared by every recipe.
pub const RECIPE_UNIT: &str = "serv";

/// One method step with its duration in seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub description: String,
    pub seconds: u64,
}

impl Step {
    pub fn new(description: &str, seconds: u64) -> Self {
        Self {
            description: description.to_string(),
            seconds,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description, format_duration(self.seconds))
    }
}

/// Format a duration as `H:MM:SS`, or `M:SS` under an hour.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let rest = seconds % 3600;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, rest / 60, rest % 60)
    } else {
        format!("{}:{:02}", rest / 60, rest % 60)
    }
}

/// Parse `M`, `M:SS` or `H:MM:SS` into seconds.
///
/// A bare number is read as minutes, matching how steps are written.
pub fn parse_duration(text: &str) -> Result<u64> {
    let invalid = || KytchenError::InvalidQuantity(text.to_string());
    let parse = |chunk: &str| chunk.trim().parse::<u64>().map_err(|_| invalid());

    let chunks: Vec<&str> = text.split(':').collect();
    match chunks.as_slice() {
        [minutes] => Ok(parse(minutes)? * 60),
        [minutes, seconds] => Ok(parse(minutes)? * 60 + parse(seconds)?),
        [hours, minutes, seconds] => {
            Ok(parse(hours)? * 3600 + parse(minutes)? * 60 + parse(seconds)?)
        }
        _ => Err(invalid()),
    }
}

/// A composite component: quantities of other components per one serving.
///
/// `amounts` keys may name ingredients or other recipes; the component
/// graph must stay acyclic. Insertion order is the presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub category: String,
    pub date: Option<String>,
    /// Component id -> quantity required for one serving.
    pub amounts: Vec<(String, Decimal)>,
    pub steps: Vec<Step>,
}

impl Recipe {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: String::new(),
            date: None,
            amounts: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Append a component requirement, rejecting negative amounts.
    pub fn push_component(&mut self, component_id: &str, amount: Decimal) -> Result<()> {
        let amount =
            ensure_non_negative(&format!("{} in {}", component_id, self.id), amount)?;
        self.amounts.push((component_id.to_string(), amount));
        Ok(())
    }

    /// Direct component amounts scaled to `servings`.
    pub fn get_amounts(&self, servings: Decimal) -> Vec<(String, Decimal)> {
        self.amounts
            .iter()
            .map(|(id, amount)| (id.clone(), *amount * servings))
            .collect()
    }

    /// Whether `component_id` appears among the direct components.
    pub fn references(&self, component_id: &str) -> bool {
        self.amounts.iter().any(|(id, _)| id == component_id)
    }

    /// Total preparation time across all steps, in seconds.
    pub fn total_seconds(&self) -> u64 {
        self.steps.iter().map(|step| step.seconds).sum()
    }
}
