use clap::{Parser, Subcommand};

/// Kytchen — a personal cookbook manager with batch-cooking meal plans.
#[derive(Parser, Debug)]
#[command(name = "kytchen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the cookbook data directory.
    #[arg(short, long, default_value = ".")]
    pub dir: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Overview of the cookbook contents.
    Summary,

    /// List all ingredients.
    Ingredients,

    /// Print a recipe scaled to a number of servings.
    Show {
        /// Recipe identifier.
        id: String,

        /// Servings to scale the recipe to.
        #[arg(short, long, default_value = "1")]
        servings: String,
    },

    /// Print a meal plan report.
    Plan {
        /// Meal plan name.
        name: String,
    },

    /// Print a meal plan's shopping list.
    Shopping {
        /// Meal plan name.
        name: String,
    },

    /// Validate every recipe and meal plan in the cookbook.
    Check,

    /// Rename a component, updating every reference to it.
    Rename {
        /// Current identifier.
        old_id: String,

        /// New identifier.
        new_id: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Summary
    }
}
