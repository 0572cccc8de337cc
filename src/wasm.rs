//! WebAssembly bindings for Craftbook.
//!
//! The browser front end reads the user's files into text and hands them
//! over as one JSON request; every function here takes and returns JSON
//! strings.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::data::{
    build_top_level_from_parts, build_top_level_from_weighted_parts, merge_demands,
    parse_gathering, parse_recipe_book,
};
use crate::display::{format_recipe_tree, render_crafted, render_gathering, FormatKind};
use crate::error::Result;
use crate::models::{CraftedRow, ExpandOptions, PartsDoc, RequirementRow};
use crate::resolver::{build_crafted_totals, build_gathering_list, locale_cmp};

/// JavaScript-friendly input for a calculation.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct JsCalculateInput {
    pub recipes_text: String,
    pub gathering_text: String,
    /// Plain `item,quantity` documents
    pub parts_texts: Vec<String>,
    /// Documents with a per-document multiplier
    pub weighted_parts: Vec<PartsDoc>,
    pub format: FormatKind,
    pub with_location: bool,
    pub group_by_method: bool,
    pub max_depth: Option<usize>,
}

/// JavaScript-friendly calculation result.
#[derive(Debug, Clone, Serialize, Default)]
pub struct JsCalculateResult {
    pub success: bool,
    pub error: Option<String>,
    pub tree: String,
    pub crafted: String,
    pub gathering: String,
    pub crafted_rows: Vec<CraftedRow>,
    pub gathering_rows: Vec<RequirementRow>,
}

impl JsCalculateResult {
    fn failure(message: String) -> Self {
        report_error(&message);
        JsCalculateResult {
            success: false,
            error: Some(message),
            ..Default::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn report_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn report_error(message: &str) {
    log::error!("{}", message);
}

fn run(input: &JsCalculateInput) -> Result<JsCalculateResult> {
    let book = parse_recipe_book(&input.recipes_text);
    let gathering = parse_gathering(&input.gathering_text);
    let demand = merge_demands([
        build_top_level_from_parts(&input.parts_texts),
        build_top_level_from_weighted_parts(&input.weighted_parts),
    ]);
    let options = input
        .max_depth
        .map(|max_depth| ExpandOptions { max_depth })
        .unwrap_or_default();

    let crafted_rows = build_crafted_totals(&demand);
    let gathering_rows =
        build_gathering_list(&demand, &book.recipes, &gathering, &book.yields, options)?;

    Ok(JsCalculateResult {
        success: true,
        error: None,
        tree: format_recipe_tree(&demand, &book.recipes, options)?,
        crafted: render_crafted(&crafted_rows, input.format)?,
        gathering: render_gathering(
            &gathering_rows,
            input.format,
            input.with_location,
            input.group_by_method,
        )?,
        crafted_rows,
        gathering_rows,
    })
}

/// Runs the full calculation.
///
/// Takes a JSON string input and returns a JSON string result. Failures
/// (bad JSON, cyclic recipes) come back as `success: false` with a message.
#[wasm_bindgen]
pub fn calculate(input_json: &str) -> String {
    let result = match serde_json::from_str::<JsCalculateInput>(input_json) {
        Ok(input) => run(&input).unwrap_or_else(|e| JsCalculateResult::failure(e.to_string())),
        Err(e) => JsCalculateResult::failure(format!("Invalid input: {}", e)),
    };
    serde_json::to_string(&result).unwrap_or_default()
}

/// Get the version of the calculator.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Lists the products defined by a recipe book, for pickers in the UI.
/// Returns a JSON array of `{ name, yield_amount, ingredients }` sorted by name.
#[wasm_bindgen]
pub fn list_products(recipes_text: &str) -> String {
    #[derive(Serialize)]
    struct ProductInfo {
        name: String,
        yield_amount: u32,
        ingredients: usize,
    }

    let book = parse_recipe_book(recipes_text);
    let mut products: Vec<ProductInfo> = book
        .recipes
        .iter()
        .map(|(name, ingredients)| ProductInfo {
            name: name.clone(),
            yield_amount: book.yields.get(name).copied().unwrap_or(1),
            ingredients: ingredients.len(),
        })
        .collect();
    products.sort_by(|a, b| locale_cmp(&a.name, &b.name));

    serde_json::to_string(&products).unwrap_or_default()
}
