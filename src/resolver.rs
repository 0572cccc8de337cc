//! Recipe resolution for Craftbook.
//!
//! Expands top-level demand through the recipe book into the raw
//! ingredients it ultimately consumes, and builds the sorted row sets the
//! renderers print.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::models::{
    CraftedRow, Demand, ExpandOptions, GatheringMap, RawTotals, RecipeBook, RequirementRow,
    YieldMap, UNKNOWN_METHOD,
};

/// Walks the recipe graph for a fixed recipe book and yield table.
///
/// # Example
///
/// ```
/// use craftbook::data::parse_recipe_book;
/// use craftbook::models::Demand;
/// use craftbook::resolver::Resolver;
///
/// let book = parse_recipe_book("Sword,1,Ore,3,Wood,1");
/// let demand = Demand::from([("Sword".to_string(), 2.0)]);
///
/// let totals = Resolver::new(&book.recipes, &book.yields).expand(&demand).unwrap();
/// assert_eq!(totals["Ore"], 6.0);
/// assert_eq!(totals["Wood"], 2.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    recipes: &'a RecipeBook,
    yields: &'a YieldMap,
    options: ExpandOptions,
}

impl<'a> Resolver<'a> {
    pub fn new(recipes: &'a RecipeBook, yields: &'a YieldMap) -> Self {
        Resolver {
            recipes,
            yields,
            options: ExpandOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExpandOptions) -> Self {
        self.options = options;
        self
    }

    /// Expands every demand entry into raw-ingredient totals.
    ///
    /// Items without a recipe (or with an empty one) are raw and keep their
    /// full quantity. A crafted item's quantity is divided by its yield, and
    /// a slot with several `|` alternatives splits its quantity evenly
    /// across all of them.
    ///
    /// # Errors
    ///
    /// [`Error::CyclicRecipe`] if an item is reachable from itself, and
    /// [`Error::DepthExceeded`] if nesting goes past
    /// [`ExpandOptions::max_depth`]. No partial totals are returned.
    pub fn expand(&self, demand: &Demand) -> Result<RawTotals> {
        let mut totals = RawTotals::new();
        let mut path = Vec::new();
        for (item, qty) in demand {
            self.expand_item(item, *qty, &mut path, &mut totals)?;
        }
        Ok(totals)
    }

    fn expand_item<'s>(
        &'s self,
        item: &'s str,
        multiplier: f64,
        path: &mut Vec<&'s str>,
        totals: &mut RawTotals,
    ) -> Result<()> {
        let ingredients = match self.recipes.get(item) {
            Some(list) if !list.is_empty() => list,
            _ => {
                *totals.entry(item.to_string()).or_insert(0.0) += multiplier;
                return Ok(());
            }
        };

        self.enter(item, path)?;
        log::trace!("Expanding {} x {}", multiplier, item);

        let yield_amount = f64::from(self.yield_of(item));
        for entry in ingredients {
            let options = entry.alternatives();
            if options.is_empty() {
                continue;
            }
            let per_option =
                entry.quantity_per_craft * multiplier / yield_amount / options.len() as f64;
            for option in options {
                self.expand_item(option, per_option, path, totals)?;
            }
        }

        path.pop();
        Ok(())
    }

    /// Pushes `item` onto the current path, refusing cycles and runaway depth.
    pub(crate) fn enter<'s>(&self, item: &'s str, path: &mut Vec<&'s str>) -> Result<()> {
        if path.contains(&item) {
            let mut cycle: Vec<String> = path.iter().map(|s| s.to_string()).collect();
            cycle.push(item.to_string());
            return Err(Error::CyclicRecipe { path: cycle });
        }
        if path.len() >= self.options.max_depth {
            return Err(Error::DepthExceeded {
                item: item.to_string(),
                max_depth: self.options.max_depth,
            });
        }
        path.push(item);
        Ok(())
    }

    fn yield_of(&self, item: &str) -> u32 {
        self.yields.get(item).copied().unwrap_or(1).max(1)
    }
}

/// Expands demand with the default depth limit.
///
/// ```
/// use craftbook::models::{Demand, RecipeBook, YieldMap};
/// use craftbook::resolver::expand;
///
/// let demand = Demand::from([("Pebble".to_string(), 7.5)]);
/// let totals = expand(&demand, &RecipeBook::new(), &YieldMap::new()).unwrap();
/// assert_eq!(totals["Pebble"], 7.5);
/// ```
pub fn expand(demand: &Demand, recipes: &RecipeBook, yields: &YieldMap) -> Result<RawTotals> {
    Resolver::new(recipes, yields).expand(demand)
}

/// Builds the gathering view: every raw ingredient with its total and the
/// gathering details, ordered by ingredient name.
pub fn build_gathering_list(
    top_level: &Demand,
    recipes: &RecipeBook,
    gathering: &GatheringMap,
    yields: &YieldMap,
    options: ExpandOptions,
) -> Result<Vec<RequirementRow>> {
    let totals = Resolver::new(recipes, yields)
        .with_options(options)
        .expand(top_level)?;
    Ok(requirement_rows(&totals, gathering))
}

/// Joins expanded totals with gathering details, ordered by ingredient name.
pub fn requirement_rows(totals: &RawTotals, gathering: &GatheringMap) -> Vec<RequirementRow> {
    let mut rows: Vec<RequirementRow> = totals
        .iter()
        .map(|(ingredient, total)| {
            let info = gathering.get(ingredient);
            RequirementRow {
                ingredient: ingredient.clone(),
                total_quantity: *total,
                method: info
                    .map(|i| i.method.as_str())
                    .filter(|m| !m.is_empty())
                    .unwrap_or(UNKNOWN_METHOD)
                    .to_string(),
                location_info: info.map(|i| i.location.clone()).unwrap_or_default(),
            }
        })
        .collect();
    rows.sort_by(|a, b| locale_cmp(&a.ingredient, &b.ingredient));
    rows
}

/// Lists the top-level demand itself (not expanded), ordered by item name.
///
/// ```
/// use craftbook::models::Demand;
/// use craftbook::resolver::build_crafted_totals;
///
/// let demand = Demand::from([("shield".to_string(), 1.0), ("Axe".to_string(), 2.0)]);
/// let rows = build_crafted_totals(&demand);
/// assert_eq!(rows[0].item, "Axe");
/// assert_eq!(rows[1].item, "shield");
/// ```
pub fn build_crafted_totals(top_level: &Demand) -> Vec<CraftedRow> {
    let mut rows: Vec<CraftedRow> = top_level
        .iter()
        .map(|(item, quantity)| CraftedRow {
            item: item.clone(),
            quantity: *quantity,
        })
        .collect();
    rows.sort_by(|a, b| locale_cmp(&a.item, &b.item));
    rows
}

/// Orders names the way a human-facing list expects.
///
/// Names compare by base letters first, ignoring case and accents, so `É`
/// sorts with `e` rather than after `z`. Remaining ties put unaccented
/// before accented, then lowercase before uppercase, then fall back to
/// plain code-point order.
///
/// ```
/// use std::cmp::Ordering;
/// use craftbook::resolver::locale_cmp;
///
/// assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
/// assert_eq!(locale_cmp("Éclair", "Zinc"), Ordering::Less);
/// assert_eq!(locale_cmp("cote", "côte"), Ordering::Less);
/// assert_eq!(locale_cmp("iron", "Iron"), Ordering::Less);
/// ```
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    caseless_cmp(a, b)
        .then_with(|| folded(a, false).cmp(folded(b, false)))
        .then_with(|| {
            a.nfd()
                .zip(b.nfd())
                .map(|(x, y)| x.is_uppercase().cmp(&y.is_uppercase()))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.cmp(b))
}

/// Compares base letters only; names differing just in case or accents are
/// equal.
pub fn caseless_cmp(a: &str, b: &str) -> Ordering {
    folded(a, true).cmp(folded(b, true))
}

/// Lowercased, decomposed characters of `s`, optionally without accents.
fn folded(s: &str, strip_marks: bool) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(move |c| !(strip_marks && is_combining_mark(*c)))
        .flat_map(char::to_lowercase)
}
