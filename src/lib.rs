//! # Craftbook
//!
//! A command-line tool and library for working out the raw materials behind
//! a list of crafted items.
//!
//! Given a recipe book (what each craftable product is made of, and how many
//! units one craft yields) and a gathering table (how each raw ingredient is
//! obtained), this crate:
//!
//! - Reads loosely formatted CSV text into typed tables
//! - Expands top-level demand through the recipe graph into raw totals,
//!   dividing by per-craft yields and splitting `|` alternatives evenly
//! - Renders the result as a recipe tree, a crafted-totals table, or
//!   gathering tables grouped by method, in text, markdown, or CSV
//!
//! ## Modules
//!
//! - [`tabular`] - Loose CSV line splitting and cell helpers
//! - [`models`] - Recipe book, demand, and output row types
//! - [`data`] - Interpreters for demand, recipe book, and gathering documents
//! - [`resolver`] - Recipe expansion and row building
//! - [`display`] - Tree and table rendering
//! - [`error`] - Library error type
//! - [`wasm`] - JSON bindings for the browser front end
//!
//! ## Example Usage
//!
//! ```
//! use craftbook::{
//!     data::{build_top_level_from_parts, parse_gathering, parse_recipe_book},
//!     display::{render_gathering, FormatKind},
//!     models::ExpandOptions,
//!     resolver::build_gathering_list,
//! };
//!
//! let book = parse_recipe_book("Sword,1,Ore,3,Wood,1");
//! let gathering = parse_gathering("Ore,Mining,North Cave");
//! let demand = build_top_level_from_parts(&["Sword,2"]);
//!
//! let rows = build_gathering_list(
//!     &demand,
//!     &book.recipes,
//!     &gathering,
//!     &book.yields,
//!     ExpandOptions::default(),
//! )
//! .unwrap();
//!
//! let text = render_gathering(&rows, FormatKind::Csv, false, false).unwrap();
//! assert_eq!(text, "Ingredient,Total Quantity,Method\nOre,6,Mining\nWood,2,unknown");
//! ```
//!
//! ## Expansion Rules
//!
//! 1. **Raw items**: anything without a recipe keeps its full quantity.
//!
//! 2. **Yields**: a recipe that yields `y` units per craft needs `1/y` of its
//!    ingredients per unit of demand.
//!
//! 3. **Alternatives**: `"Oak|Birch"` with quantity 2 asks for 1 Oak and
//!    1 Birch; demand is split across every alternative, not chosen between.
//!
//! 4. **Cycles**: a product that needs itself, directly or indirectly, is
//!    reported as [`error::Error::CyclicRecipe`].

pub mod data;
pub mod display;
pub mod error;
pub mod models;
pub mod resolver;
pub mod tabular;
pub mod wasm;

pub use error::{Error, Result};
