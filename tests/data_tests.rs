//! Tests for the demand, recipe book, and gathering interpreters.

use craftbook::data::{
    build_top_level_from_parts, build_top_level_from_weighted_parts, is_ambiguous_yield_row,
    load_gathering, load_parts_doc, load_recipe_book, load_top_level_from_parts, merge_demands,
    parse_gathering, parse_recipe_book,
};
use craftbook::models::{IngredientEntry, PartsDoc};
use std::path::Path;

fn doc(text: &str, qty: f64) -> PartsDoc {
    PartsDoc {
        name: "test.csv".to_string(),
        text: text.to_string(),
        qty,
    }
}

fn entry(spec: &str, quantity_per_craft: f64) -> IngredientEntry {
    IngredientEntry {
        spec: spec.to_string(),
        quantity_per_craft,
    }
}

// ============================================================================
// Plain demand
// ============================================================================

#[test]
fn test_plain_demand_sums_across_documents() {
    let demand = build_top_level_from_parts(&["Sword,2\nShield,1", "Sword,1.5\n"]);
    assert_eq!(demand.len(), 2);
    assert_eq!(demand["Sword"], 3.5);
    assert_eq!(demand["Shield"], 1.0);
}

#[test]
fn test_plain_demand_skips_unusable_rows() {
    let demand = build_top_level_from_parts(&["Item,Quantity\nSword,abc\nShield\n,3\nAxe,2"]);
    assert_eq!(demand.len(), 1);
    assert_eq!(demand["Axe"], 2.0);
}

#[test]
fn test_plain_demand_blank_quantity_counts_as_zero() {
    let demand = build_top_level_from_parts(&["Bow,"]);
    assert_eq!(demand.get("Bow"), Some(&0.0));
}

#[test]
fn test_plain_demand_ignores_extra_columns() {
    let demand = build_top_level_from_parts(&["Sword,2,for the captain,urgent"]);
    assert_eq!(demand["Sword"], 2.0);
}

#[test]
fn test_plain_demand_is_case_sensitive() {
    let demand = build_top_level_from_parts(&["sword,1\nSword,2"]);
    assert_eq!(demand["sword"], 1.0);
    assert_eq!(demand["Sword"], 2.0);
}

// ============================================================================
// Weighted demand
// ============================================================================

#[test]
fn test_weighted_demand_multiplies_by_weight() {
    let demand = build_top_level_from_weighted_parts(&[doc("Gem,2", 3.0)]);
    assert_eq!(demand["Gem"], 6.0);
}

#[test]
fn test_weighted_demand_skips_comments_and_headers() {
    let text = "# kit list\n\nItem,Quantity\nPRODUCT,5\nGem,QTY\n  # indented comment\nGem,2\n";
    let demand = build_top_level_from_weighted_parts(&[doc(text, 1.0)]);
    assert_eq!(demand.len(), 1);
    assert_eq!(demand["Gem"], 2.0);
}

#[test]
fn test_weighted_demand_uses_first_two_fields_only() {
    let demand = build_top_level_from_weighted_parts(&[doc("Gem,2,99,extra", 2.0)]);
    assert_eq!(demand["Gem"], 4.0);
}

#[test]
fn test_weighted_demand_strips_quotes_and_handles_crlf() {
    let demand = build_top_level_from_weighted_parts(&[doc("\"Gem\",\"2\"\r\n\" Ring \",1\r\n", 1.0)]);
    assert_eq!(demand["Gem"], 2.0);
    assert_eq!(demand["Ring"], 1.0);
}

#[test]
fn test_weighted_demand_skips_non_numeric_quantity() {
    let demand = build_top_level_from_weighted_parts(&[doc("Gem,lots\nRing,1", 1.0)]);
    assert!(!demand.contains_key("Gem"));
    assert_eq!(demand["Ring"], 1.0);
}

#[test]
fn test_weighted_demand_invalid_weights_fall_back_to_one() {
    for qty in [0.0, -2.0, f64::NAN, f64::INFINITY, 0.5] {
        let demand = build_top_level_from_weighted_parts(&[doc("Gem,2", qty)]);
        assert_eq!(demand["Gem"], 2.0, "weight {} should count as 1", qty);
    }
}

#[test]
fn test_weighted_demand_floors_fractional_weight() {
    let demand = build_top_level_from_weighted_parts(&[doc("Gem,2", 2.9)]);
    assert_eq!(demand["Gem"], 4.0);
}

#[test]
fn test_weighted_demand_sums_across_documents() {
    let demand = build_top_level_from_weighted_parts(&[doc("Gem,1", 2.0), doc("Gem,1\nRing,1", 3.0)]);
    assert_eq!(demand["Gem"], 5.0);
    assert_eq!(demand["Ring"], 3.0);
}

#[test]
fn test_weighted_demand_skips_rows_with_empty_name() {
    let demand = build_top_level_from_weighted_parts(&[doc(",3\n\"\",4\n  \" \" ,5\nGem,1", 1.0)]);
    assert_eq!(demand.len(), 1);
    assert_eq!(demand["Gem"], 1.0);
}

#[test]
fn test_weighted_demand_line_without_comma_counts_as_zero() {
    let demand = build_top_level_from_weighted_parts(&[doc("Gem\nRing,2", 3.0)]);
    assert_eq!(demand.get("Gem"), Some(&0.0));
    assert_eq!(demand["Ring"], 6.0);
}

#[test]
fn test_weighted_demand_lone_quote_is_kept() {
    let demand = build_top_level_from_weighted_parts(&[doc("\",2\n\"Gem,1", 1.0)]);
    assert_eq!(demand["\""], 2.0);
    assert_eq!(demand["\"Gem"], 1.0);
}

#[test]
fn test_weighted_demand_ignores_byte_order_mark() {
    let text = "\u{feff}Gem,2\n";
    let weighted = build_top_level_from_weighted_parts(&[doc(text, 1.0)]);
    let plain = build_top_level_from_parts(&[text]);
    assert_eq!(weighted.keys().collect::<Vec<_>>(), vec!["Gem"]);
    assert_eq!(weighted, plain);
}

#[test]
fn test_merge_demands_is_additive() {
    let merged = merge_demands([
        build_top_level_from_parts(&["Sword,1"]),
        build_top_level_from_weighted_parts(&[doc("Sword,1\nGem,1", 2.0)]),
    ]);
    assert_eq!(merged["Sword"], 3.0);
    assert_eq!(merged["Gem"], 2.0);
}

// ============================================================================
// Recipe book
// ============================================================================

#[test]
fn test_recipe_book_with_explicit_yield() {
    let book = parse_recipe_book("Sword,1,Ore,3,Wood,1\nPlank,4,Log,1");
    assert_eq!(book.yields["Sword"], 1);
    assert_eq!(book.yields["Plank"], 4);
    assert_eq!(book.recipes["Sword"], vec![entry("Ore", 3.0), entry("Wood", 1.0)]);
    assert_eq!(book.recipes["Plank"], vec![entry("Log", 1.0)]);
}

#[test]
fn test_recipe_book_without_yield() {
    let book = parse_recipe_book("Hilt,Wood,1,Leather,2");
    assert_eq!(book.yields["Hilt"], 1);
    assert_eq!(book.recipes["Hilt"], vec![entry("Wood", 1.0), entry("Leather", 2.0)]);
}

#[test]
fn test_recipe_book_yield_is_floored_and_clamped() {
    let book = parse_recipe_book("A,2.7,X,1\nB,0,X,1\nC,-4,X,1\nD,0.5,X,1");
    assert_eq!(book.yields["A"], 2);
    assert_eq!(book.yields["B"], 1);
    assert_eq!(book.yields["C"], 1);
    assert_eq!(book.yields["D"], 1);
}

#[test]
fn test_recipe_book_blank_yield_cell_is_a_yield_column() {
    let book = parse_recipe_book("Sword,,Ore,3");
    assert_eq!(book.yields["Sword"], 1);
    assert_eq!(book.recipes["Sword"], vec![entry("Ore", 3.0)]);
}

#[test]
fn test_recipe_book_numeric_ingredient_name_is_read_as_yield() {
    // "7" could be an ingredient, but a numeric cell 1 with a third cell is a yield.
    let book = parse_recipe_book("Lock,7,Pin,2");
    assert_eq!(book.yields["Lock"], 7);
    assert_eq!(book.recipes["Lock"], vec![entry("Pin", 2.0)]);
}

#[test]
fn test_ambiguous_yield_rows() {
    let row = |cells: &[&str]| cells.iter().map(|c| c.to_string()).collect::<Vec<_>>();
    assert!(is_ambiguous_yield_row(&row(&["Lock", "7", "Pin"])));
    assert!(is_ambiguous_yield_row(&row(&["Lock", "7", "Pin", "2", "Spring"])));
    assert!(!is_ambiguous_yield_row(&row(&["Lock", "7", "Pin", "2"])));
    assert!(!is_ambiguous_yield_row(&row(&["Lock", "7", "Pin", "2", ""])));
    assert!(!is_ambiguous_yield_row(&row(&["Lock", "Pin", "2"])));
    assert!(!is_ambiguous_yield_row(&row(&["Lock", "7"])));
}

#[test]
fn test_recipe_book_empty_ingredient_ends_list() {
    let book = parse_recipe_book("Axe,Head,1,,5,Handle,1");
    assert_eq!(book.recipes["Axe"], vec![entry("Head", 1.0)]);
}

#[test]
fn test_recipe_book_bad_or_missing_quantity_is_zero() {
    let book = parse_recipe_book("Axe,Head,x\nBow,String");
    assert_eq!(book.recipes["Axe"], vec![entry("Head", 0.0)]);
    assert_eq!(book.recipes["Bow"], vec![entry("String", 0.0)]);
}

#[test]
fn test_recipe_book_product_without_ingredients() {
    let book = parse_recipe_book("Gem\n,Ore,1");
    assert_eq!(book.recipes.len(), 1);
    assert!(book.recipes["Gem"].is_empty());
    assert_eq!(book.yields["Gem"], 1);
}

#[test]
fn test_recipe_book_keeps_alternative_specs_intact() {
    let book = parse_recipe_book("Torch,4,Stick,1,Coal | Charcoal,1");
    let slot = &book.recipes["Torch"][1];
    assert_eq!(slot.spec, "Coal | Charcoal");
    assert_eq!(slot.alternatives(), vec!["Coal", "Charcoal"]);
}

#[test]
fn test_recipe_book_later_row_replaces_earlier() {
    let book = parse_recipe_book("Sword,1,Ore,3\nSword,2,Ore,5");
    assert_eq!(book.yields["Sword"], 2);
    assert_eq!(book.recipes["Sword"], vec![entry("Ore", 5.0)]);
}

#[test]
fn test_recipe_book_reparse_is_identical() {
    let text = "Iron Sword,1,Iron Ingot,3,Leather Strip,1\nIron Ingot,2,Iron Ore,3\nHilt,Wood,1";
    assert_eq!(parse_recipe_book(text), parse_recipe_book(text));
}

// ============================================================================
// Gathering table
// ============================================================================

#[test]
fn test_gathering_method_and_location() {
    let map = parse_gathering("Ore,Mining,North Cave,Level 3\nWood,Logging");
    assert_eq!(map["Ore"].method, "Mining");
    assert_eq!(map["Ore"].location, "North Cave, Level 3");
    assert_eq!(map["Wood"].method, "Logging");
    assert_eq!(map["Wood"].location, "");
}

#[test]
fn test_gathering_defaults_and_blank_columns() {
    let map = parse_gathering("Ore\nWood,,Forest,  ,East\n,Mining,Nowhere");
    assert_eq!(map.len(), 2);
    assert_eq!(map["Ore"].method, "unknown");
    assert_eq!(map["Ore"].location, "");
    assert_eq!(map["Wood"].method, "unknown");
    assert_eq!(map["Wood"].location, "Forest, East");
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_load_sample_data() {
    let data_dir = Path::new("data");
    if !data_dir.exists() {
        return;
    }

    let book = load_recipe_book(&data_dir.join("recipes.csv")).expect("Failed to load recipes");
    assert_eq!(book.recipes.len(), 5);
    assert_eq!(book.yields["Iron Ingot"], 2);

    let gathering = load_gathering(&data_dir.join("gathering.csv")).expect("Failed to load gathering");
    assert_eq!(gathering["Oak Log"].location, "Greenwood, North");

    let parts = data_dir.join("parts.csv");
    let demand = load_top_level_from_parts(&[parts.as_path()]).expect("Failed to load parts");
    assert_eq!(demand.len(), 2);
    assert_eq!(demand["Iron Sword"], 2.0);
    assert_eq!(demand["Torch"], 8.0);

    let kit = load_parts_doc(&data_dir.join("camp_kit.csv"), 2.0).expect("Failed to load camp kit");
    assert_eq!(kit.name, "camp_kit.csv");
    let demand = build_top_level_from_weighted_parts(&[kit]);
    assert_eq!(demand["Torch"], 8.0);
    assert_eq!(demand["Iron Sword"], 2.0);
}

#[test]
fn test_load_missing_file_is_an_error() {
    assert!(load_recipe_book(Path::new("data/does_not_exist.csv")).is_err());
}
