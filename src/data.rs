//! Table interpreters for Craftbook.
//!
//! Each input document is plain text in a loose CSV shape. The functions
//! here turn that text into demand maps, the recipe book, and the gathering
//! table. None of them fail: malformed cells fall back to defaults and
//! unusable rows are skipped.
//!
//! The `load_*` helpers read a file first and then delegate to the text
//! interpreters; they are what the command-line front end uses.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::{
    Demand, GatheringInfo, GatheringMap, IngredientEntry, ParsedRecipeBook, PartsDoc,
    UNKNOWN_METHOD,
};
use crate::tabular::{parse_loose, parse_number, strip_bom, strip_wrapping_quotes};

/// Header words that mark a row of a weighted-parts document as a header.
const ITEM_HEADERS: [&str; 2] = ["item", "product"];
const QUANTITY_HEADERS: [&str; 2] = ["quantity", "qty"];

/// Sums `item,quantity` rows across several demand documents.
///
/// Rows need at least two cells, a non-empty name, and a numeric quantity;
/// extra columns are ignored.
///
/// # Example
///
/// ```
/// use craftbook::data::build_top_level_from_parts;
///
/// let demand = build_top_level_from_parts(&["Sword,2\nShield,1", "Sword,3,ignored"]);
/// assert_eq!(demand["Sword"], 5.0);
/// assert_eq!(demand["Shield"], 1.0);
/// ```
pub fn build_top_level_from_parts<S: AsRef<str>>(documents: &[S]) -> Demand {
    documents.iter().fold(Demand::new(), |mut totals, text| {
        for row in parse_loose(text.as_ref()) {
            if row.len() < 2 {
                continue;
            }
            let name = row[0].trim();
            if name.is_empty() {
                continue;
            }
            let Some(qty) = parse_number(&row[1]) else {
                log::debug!("Skipping demand row for '{}': quantity '{}' is not a number", name, row[1]);
                continue;
            };
            *totals.entry(name.to_string()).or_insert(0.0) += qty;
        }
        totals
    })
}

/// Adds several demand maps together by item name.
///
/// ```
/// use craftbook::data::{build_top_level_from_parts, merge_demands};
///
/// let merged = merge_demands([
///     build_top_level_from_parts(&["Gem,1"]),
///     build_top_level_from_parts(&["Gem,2\nRing,1"]),
/// ]);
/// assert_eq!(merged["Gem"], 3.0);
/// assert_eq!(merged["Ring"], 1.0);
/// ```
pub fn merge_demands<I: IntoIterator<Item = Demand>>(demands: I) -> Demand {
    demands.into_iter().fold(Demand::new(), |mut totals, demand| {
        for (item, qty) in demand {
            *totals.entry(item).or_insert(0.0) += qty;
        }
        totals
    })
}

/// Sums weighted-parts documents into one demand map.
///
/// Each document is read line by line: blank lines, `#` comments and
/// header-looking rows are skipped, only the first two comma-separated
/// fields are used, and every quantity is multiplied by the document's
/// [`PartsDoc::weight`].
///
/// # Example
///
/// ```
/// use craftbook::data::build_top_level_from_weighted_parts;
/// use craftbook::models::PartsDoc;
///
/// let doc = PartsDoc {
///     name: "gems.csv".to_string(),
///     text: "# part list\nItem,Qty\n\"Gem\",2\n".to_string(),
///     qty: 3.0,
/// };
/// let demand = build_top_level_from_weighted_parts(&[doc]);
/// assert_eq!(demand["Gem"], 6.0);
/// ```
pub fn build_top_level_from_weighted_parts(parts: &[PartsDoc]) -> Demand {
    parts.iter().fold(Demand::new(), |mut totals, doc| {
        let weight = f64::from(doc.weight());
        for raw in strip_bom(&doc.text).lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (first, rest) = line.split_once(',').unwrap_or((line, ""));
            let second = rest.split(',').next().unwrap_or("");
            let name = clean_field(first);
            let amount = clean_field(second);

            if name.is_empty() || is_header_row(name, amount) {
                continue;
            }
            let Some(n) = parse_number(amount) else {
                log::debug!("Skipping '{}' in {}: '{}' is not a number", name, doc.name, amount);
                continue;
            };
            *totals.entry(name.to_string()).or_insert(0.0) += n * weight;
        }
        totals
    })
}

fn clean_field(field: &str) -> &str {
    strip_wrapping_quotes(field.trim()).trim()
}

fn is_header_row(name: &str, amount: &str) -> bool {
    ITEM_HEADERS.iter().any(|h| name.eq_ignore_ascii_case(h))
        || QUANTITY_HEADERS.iter().any(|h| amount.eq_ignore_ascii_case(h))
}

/// Reads the recipe book.
///
/// Row shape: `product[,yield],ingredient,qty,ingredient,qty,...`. Cell 1 is
/// taken as the yield when the row has at least three cells and cell 1 is
/// numeric; otherwise ingredients start at cell 1 and the yield is 1.
/// Ingredient pairs are read until an empty ingredient name or the end of
/// the row. A later row for the same product replaces an earlier one.
///
/// # Example
///
/// ```
/// use craftbook::data::parse_recipe_book;
///
/// let book = parse_recipe_book("Sword,1,Ore,3,Wood,1\nPlank,4,Log,1");
/// assert_eq!(book.yields["Plank"], 4);
/// assert_eq!(book.recipes["Sword"].len(), 2);
/// assert_eq!(book.recipes["Sword"][0].quantity_per_craft, 3.0);
/// ```
pub fn parse_recipe_book(text: &str) -> ParsedRecipeBook {
    let mut book = ParsedRecipeBook::default();

    for row in parse_loose(text) {
        let Some(product) = row.first().filter(|p| !p.is_empty()) else {
            continue;
        };

        let mut start = 1;
        let mut yield_amount = 1;
        if row.len() >= 3 {
            if let Some(n) = parse_number(&row[1]) {
                if is_ambiguous_yield_row(&row) {
                    log::warn!(
                        "Recipe '{}': reading '{}' as the yield, check whether it is an ingredient name",
                        product,
                        row[1]
                    );
                }
                yield_amount = clamp_yield(n);
                start = 2;
            }
        }

        let mut ingredients = Vec::new();
        for pair in row[start..].chunks(2) {
            let spec = &pair[0];
            if spec.is_empty() {
                break;
            }
            let quantity_per_craft = pair.get(1).and_then(|q| parse_number(q)).unwrap_or(0.0);
            ingredients.push(IngredientEntry {
                spec: spec.clone(),
                quantity_per_craft,
            });
        }

        book.yields.insert(product.clone(), yield_amount);
        book.recipes.insert(product.clone(), ingredients);
    }

    log::debug!("Parsed {} recipes", book.recipes.len());
    book
}

/// True when a recipe row reads cell 1 as a numeric yield but its filled
/// cells do not pair up, which usually means cell 1 was an ingredient.
///
/// Trailing empty cells are ignored, so `Lock,7,Pin,2,` is not ambiguous.
///
/// ```
/// use craftbook::data::is_ambiguous_yield_row;
///
/// let row = |text: &str| text.split(',').map(str::to_string).collect::<Vec<_>>();
/// assert!(is_ambiguous_yield_row(&row("Lock,7,Pin")));
/// assert!(!is_ambiguous_yield_row(&row("Lock,7,Pin,2")));
/// assert!(!is_ambiguous_yield_row(&row("Lock,7,Pin,2,")));
/// assert!(!is_ambiguous_yield_row(&row("Lock,Pin,2")));
/// ```
pub fn is_ambiguous_yield_row(row: &[String]) -> bool {
    if row.len() < 3 || parse_number(&row[1]).is_none() {
        return false;
    }
    let filled = row.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
    filled % 2 == 1
}

fn clamp_yield(n: f64) -> u32 {
    if n >= 1.0 {
        n.floor().min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

/// Reads the gathering table: `ingredient,method,location...`.
///
/// The method defaults to `"unknown"` when blank or missing; every further
/// non-blank cell is joined with `", "` into the location.
///
/// # Example
///
/// ```
/// use craftbook::data::parse_gathering;
///
/// let map = parse_gathering("Ore,Mining,North Cave,,Level 3\nWood,");
/// assert_eq!(map["Ore"].method, "Mining");
/// assert_eq!(map["Ore"].location, "North Cave, Level 3");
/// assert_eq!(map["Wood"].method, "unknown");
/// ```
pub fn parse_gathering(text: &str) -> GatheringMap {
    let mut map = GatheringMap::new();
    for row in parse_loose(text) {
        let Some(name) = row.first().filter(|n| !n.is_empty()) else {
            continue;
        };
        let method = row
            .get(1)
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .unwrap_or(UNKNOWN_METHOD)
            .to_string();
        let location = row
            .iter()
            .skip(2)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        map.insert(name.clone(), GatheringInfo { method, location });
    }
    log::debug!("Parsed gathering info for {} ingredients", map.len());
    map
}

/// Loads and parses a recipe book file.
pub fn load_recipe_book(path: &Path) -> Result<ParsedRecipeBook> {
    let text = fs::read_to_string(path)?;
    Ok(parse_recipe_book(&text))
}

/// Loads and parses a gathering table file.
pub fn load_gathering(path: &Path) -> Result<GatheringMap> {
    let text = fs::read_to_string(path)?;
    Ok(parse_gathering(&text))
}

/// Loads plain demand documents and sums them.
pub fn load_top_level_from_parts(paths: &[&Path]) -> Result<Demand> {
    let texts = paths
        .iter()
        .map(fs::read_to_string)
        .collect::<std::io::Result<Vec<_>>>()?;
    Ok(build_top_level_from_parts(&texts))
}

/// Loads a weighted-parts document, using the file name as its display name.
pub fn load_parts_doc(path: &Path, qty: f64) -> Result<PartsDoc> {
    let text = strip_bom(&fs::read_to_string(path)?).to_string();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(PartsDoc { name, text, qty })
}
