//! Craftbook - Command Line Interface
//!
//! This is the main entry point for the material requirements calculator.
//! Run with `--help` to see all available options. Set `RUST_LOG=debug` to
//! see parse summaries and skipped rows.

use clap::{Parser, ValueEnum};
use std::error::Error;
use std::path::{Path, PathBuf};

use craftbook::{
    data::{
        build_top_level_from_weighted_parts, load_gathering, load_parts_doc, load_recipe_book,
        load_top_level_from_parts, merge_demands,
    },
    display::{format_recipe_tree, render_crafted, render_gathering, FormatKind},
    models::{ExpandOptions, GatheringMap, ParsedRecipeBook},
    resolver::{build_crafted_totals, build_gathering_list},
};

/// Which result views to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    /// Recipe breakdown tree
    Tree,
    /// Total crafted items
    Crafted,
    /// Raw ingredients grouped by gathering method
    Gathering,
    /// Everything above
    All,
}

/// Command-line arguments for Craftbook.
#[derive(Parser, Debug)]
#[command(name = "craftbook")]
#[command(author, version, about = "Work out the raw materials needed for a list of crafted items", long_about = None)]
struct Args {
    /// Recipe book CSV: product[,yield],ingredient,qty,...
    #[arg(short, long)]
    recipes: Option<PathBuf>,

    /// Gathering table CSV: ingredient,method,location...
    #[arg(short, long)]
    gathering: Option<PathBuf>,

    /// Demand CSV with item,quantity rows (repeatable)
    #[arg(short, long)]
    parts: Vec<PathBuf>,

    /// Weighted demand document as FILE or FILE:WEIGHT (repeatable)
    #[arg(short, long, value_parser = parse_weighted)]
    weighted: Vec<(PathBuf, f64)>,

    /// Views to print
    #[arg(long, value_enum, default_value = "all")]
    view: View,

    /// Output format for table views
    #[arg(short, long, value_enum, default_value = "txt")]
    format: FormatKind,

    /// Include the location column in the gathering view
    #[arg(long, default_value = "false")]
    with_location: bool,

    /// Split markdown gathering output into one section per method
    #[arg(long, default_value = "false")]
    group_by_method: bool,

    /// Maximum recipe nesting before expansion gives up
    #[arg(long, default_value_t = ExpandOptions::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

/// Splits `FILE:WEIGHT`; a suffix that is not a number stays part of the path.
fn parse_weighted(arg: &str) -> Result<(PathBuf, f64), String> {
    if let Some((path, weight)) = arg.rsplit_once(':') {
        if let Ok(weight) = weight.trim().parse::<f64>() {
            return Ok((PathBuf::from(path), weight));
        }
    }
    Ok((PathBuf::from(arg), 1.0))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    if args.parts.is_empty() && args.weighted.is_empty() {
        return Err("no demand documents given, pass --parts or --weighted".into());
    }

    let book = match &args.recipes {
        Some(path) => load_recipe_book(path)?,
        None => ParsedRecipeBook::default(),
    };
    let gathering = match &args.gathering {
        Some(path) => load_gathering(path)?,
        None => GatheringMap::new(),
    };

    let paths: Vec<&Path> = args.parts.iter().map(PathBuf::as_path).collect();
    let docs = args
        .weighted
        .iter()
        .map(|(path, weight)| load_parts_doc(path, *weight))
        .collect::<Result<Vec<_>, _>>()?;
    let demand = merge_demands([
        load_top_level_from_parts(&paths)?,
        build_top_level_from_weighted_parts(&docs),
    ]);

    log::info!(
        "Loaded {} recipes, {} gathering entries, {} top-level items",
        book.recipes.len(),
        gathering.len(),
        demand.len()
    );

    let options = ExpandOptions {
        max_depth: args.max_depth,
    };
    let show = |view: View| args.view == view || args.view == View::All;
    let mut sections = Vec::new();

    if show(View::Tree) {
        sections.push(format_recipe_tree(&demand, &book.recipes, options)?);
    }
    if show(View::Crafted) {
        sections.push(render_crafted(&build_crafted_totals(&demand), args.format)?);
    }
    if show(View::Gathering) {
        let rows = build_gathering_list(&demand, &book.recipes, &gathering, &book.yields, options)?;
        sections.push(render_gathering(
            &rows,
            args.format,
            args.with_location,
            args.group_by_method,
        )?);
    }

    println!("{}", sections.join("\n\n"));
    Ok(())
}

