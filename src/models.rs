//! Data models and structures for Craftbook.
//!
//! This module contains the tables produced by the interpreters in
//! [`crate::data`], the demand and totals maps consumed and produced by
//! [`crate::resolver`], and the output rows handed to [`crate::display`].

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Separator between interchangeable ingredients in one recipe slot.
pub const ALTERNATIVE_SEPARATOR: char = '|';

/// Method reported for ingredients with no gathering information.
pub const UNKNOWN_METHOD: &str = "unknown";

/// One ingredient slot of a recipe.
///
/// `spec` may list several alternatives separated by
/// [`ALTERNATIVE_SEPARATOR`], e.g. `"Oak Log | Birch Log"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientEntry {
    /// Ingredient name, or several alternatives joined by `|`
    pub spec: String,
    /// Amount consumed by one craft operation
    pub quantity_per_craft: f64,
}

impl IngredientEntry {
    /// Returns the trimmed, non-empty alternatives named by this slot.
    ///
    /// ```
    /// use craftbook::models::IngredientEntry;
    ///
    /// let entry = IngredientEntry { spec: "Oak | Birch |".to_string(), quantity_per_craft: 2.0 };
    /// assert_eq!(entry.alternatives(), vec!["Oak", "Birch"]);
    /// ```
    pub fn alternatives(&self) -> Vec<&str> {
        self.spec
            .split(ALTERNATIVE_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Product name to the ordered ingredient slots of one craft.
pub type RecipeBook = HashMap<String, Vec<IngredientEntry>>;

/// Product name to units produced per craft (always at least 1).
pub type YieldMap = HashMap<String, u32>;

/// Raw ingredient name to how and where it is obtained.
pub type GatheringMap = HashMap<String, GatheringInfo>;

/// Item name to required quantity.
///
/// Ordered by name so that expansion visits items in a stable order and
/// floating-point totals are reproducible between runs.
pub type Demand = BTreeMap<String, f64>;

/// Raw ingredient name to total quantity, as produced by expansion.
pub type RawTotals = BTreeMap<String, f64>;

/// Gathering details for one raw ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatheringInfo {
    /// How the ingredient is obtained (e.g. "Mining", "Vendor")
    pub method: String,
    /// Free-form location text, possibly empty
    pub location: String,
}

impl Default for GatheringInfo {
    fn default() -> Self {
        GatheringInfo {
            method: UNKNOWN_METHOD.to_string(),
            location: String::new(),
        }
    }
}

/// Result of reading a recipe book document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRecipeBook {
    pub recipes: RecipeBook,
    pub yields: YieldMap,
}

/// A demand document paired with its weight (how many times it is needed).
///
/// # Example
///
/// ```
/// use craftbook::models::PartsDoc;
///
/// let doc = PartsDoc { name: "ship.csv".to_string(), text: "Hull,1".to_string(), qty: 2.7 };
/// assert_eq!(doc.weight(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartsDoc {
    /// Display name of the document (usually the file name)
    #[serde(default)]
    pub name: String,
    /// Raw document text
    pub text: String,
    /// Requested multiplier for this document
    #[serde(default = "default_qty")]
    pub qty: f64,
}

fn default_qty() -> f64 {
    1.0
}

impl PartsDoc {
    /// The integer weight applied to every line of the document.
    ///
    /// Non-finite or non-positive multipliers fall back to 1; fractional
    /// multipliers are floored, never below 1.
    pub fn weight(&self) -> u32 {
        if self.qty.is_finite() && self.qty > 0.0 {
            (self.qty.floor() as u32).max(1)
        } else {
            1
        }
    }
}

/// One line of the crafted-totals view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CraftedRow {
    pub item: String,
    pub quantity: f64,
}

/// One line of the gathering view: a raw ingredient and how to get it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementRow {
    pub ingredient: String,
    pub total_quantity: f64,
    pub method: String,
    pub location_info: String,
}

/// Limits applied while walking the recipe graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Maximum number of nested recipe levels below a top-level item
    pub max_depth: usize,
}

impl ExpandOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 256;
}

impl Default for ExpandOptions {
    fn default() -> Self {
        ExpandOptions {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
