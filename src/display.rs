//! Display and formatting utilities for Craftbook.
//!
//! Renders resolved requirements as text: a recipe tree, delimited text,
//! markdown tables, and aligned "notebook" text grouped by gathering method.
//! Every function returns a `String`; nothing here writes to stdout.

use std::collections::BTreeMap;

use clap::ValueEnum;
use csv::{Terminator, WriterBuilder};
use serde::Deserialize;

use crate::error::Result;
use crate::models::{
    CraftedRow, Demand, ExpandOptions, RecipeBook, RequirementRow, YieldMap, UNKNOWN_METHOD,
};
use crate::resolver::{caseless_cmp, locale_cmp, Resolver};

pub const CRAFTED_COLUMNS: [&str; 2] = ["Item", "Quantity"];
pub const GATHERING_COLUMNS: [&str; 3] = ["Ingredient", "Total Quantity", "Method"];
pub const GATHERING_COLUMNS_WITH_LOCATION: [&str; 4] =
    ["Ingredient", "Total Quantity", "Method", "Location Info"];

/// Output flavor for the table views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// Section headers with aligned tables
    #[default]
    Txt,
    /// Markdown tables
    Md,
    /// Comma-separated values
    Csv,
}

/// Column alignment in aligned tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A row that can be printed by column name.
pub trait TableRow {
    /// Returns the text for `column`, or an empty string for unknown columns.
    fn cell(&self, column: &str) -> String;
}

impl<T: TableRow + ?Sized> TableRow for &T {
    fn cell(&self, column: &str) -> String {
        (**self).cell(column)
    }
}

impl TableRow for CraftedRow {
    fn cell(&self, column: &str) -> String {
        match column {
            "Item" => self.item.clone(),
            "Quantity" => format_quantity(self.quantity),
            _ => String::new(),
        }
    }
}

impl TableRow for RequirementRow {
    fn cell(&self, column: &str) -> String {
        match column {
            "Ingredient" => self.ingredient.clone(),
            "Total Quantity" => format_quantity(self.total_quantity),
            "Method" => self.method.clone(),
            "Location Info" => self.location_info.clone(),
            _ => String::new(),
        }
    }
}

/// Formats a quantity with no insignificant trailing zeros.
///
/// Magnitudes of `1e21` and above, or below `1e-6`, switch to exponent
/// notation with an explicit sign (`1e+21`, `1.5e-7`).
///
/// ```
/// use craftbook::display::format_quantity;
///
/// assert_eq!(format_quantity(6.0), "6");
/// assert_eq!(format_quantity(0.5), "0.5");
/// assert_eq!(format_quantity(-0.0), "0");
/// assert_eq!(format_quantity(1e21), "1e+21");
/// assert_eq!(format_quantity(1.5e-7), "1.5e-7");
/// ```
pub fn format_quantity(quantity: f64) -> String {
    if quantity == 0.0 {
        return "0".to_string();
    }
    let magnitude = quantity.abs();
    if magnitude.is_finite() && (magnitude >= 1e21 || magnitude < 1e-6) {
        let text = format!("{:e}", quantity);
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        };
    }
    format!("{}", quantity)
}

// ============================================================================
// Recipe tree
// ============================================================================

/// Draws each top-level item and its recipe as a box-drawing tree.
///
/// Child quantities are the per-craft amount times the parent's displayed
/// quantity. Yields and `|` alternatives are not applied, so the tree
/// illustrates recipes and does not reproduce the expanded totals.
///
/// # Errors
///
/// Fails the same way as [`Resolver::expand`] on cyclic or too-deep
/// recipe graphs.
///
/// # Example
///
/// ```
/// use craftbook::data::parse_recipe_book;
/// use craftbook::display::format_recipe_tree;
/// use craftbook::models::{Demand, ExpandOptions};
///
/// let book = parse_recipe_book("Sword,1,Ore,3,Wood,1");
/// let demand = Demand::from([("Sword".to_string(), 1.0)]);
/// let tree = format_recipe_tree(&demand, &book.recipes, ExpandOptions::default()).unwrap();
///
/// assert_eq!(
///     tree,
///     "=== Recipe Breakdown ===\n└── (1) Sword\n    ├── (3) Ore\n    └── (1) Wood"
/// );
/// ```
pub fn format_recipe_tree(
    top_level: &Demand,
    recipes: &RecipeBook,
    options: ExpandOptions,
) -> Result<String> {
    let yields = YieldMap::new();
    let guard = Resolver::new(recipes, &yields).with_options(options);

    let mut entries: Vec<(&String, &f64)> = top_level.iter().collect();
    entries.sort_by(|a, b| caseless_cmp(a.0, b.0));

    let mut lines = vec!["=== Recipe Breakdown ===".to_string()];
    let mut path = Vec::new();
    for (i, &(name, qty)) in entries.iter().enumerate() {
        let is_last = i + 1 == entries.len();
        tree_node(&guard, recipes, name, *qty, "", is_last, &mut path, &mut lines)?;
        if !is_last {
            lines.push("│".to_string());
        }
    }
    Ok(lines.join("\n"))
}

#[allow(clippy::too_many_arguments)]
fn tree_node<'r>(
    guard: &Resolver<'_>,
    recipes: &'r RecipeBook,
    name: &'r str,
    qty: f64,
    prefix: &str,
    is_last: bool,
    path: &mut Vec<&'r str>,
    lines: &mut Vec<String>,
) -> Result<()> {
    let branch = if is_last { "└── " } else { "├── " };
    lines.push(format!("{}{}({}) {}", prefix, branch, format_quantity(qty), name));

    let kids = match recipes.get(name) {
        Some(kids) if !kids.is_empty() => kids,
        _ => return Ok(()),
    };

    guard.enter(name, path)?;
    let next_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
    for (i, kid) in kids.iter().enumerate() {
        let last_child = i + 1 == kids.len();
        tree_node(
            guard,
            recipes,
            &kid.spec,
            kid.quantity_per_craft * qty,
            &next_prefix,
            last_child,
            path,
            lines,
        )?;
    }
    path.pop();
    Ok(())
}

// ============================================================================
// Plain tables
// ============================================================================

/// Renders rows as comma-separated text with a header line.
///
/// Fields containing a comma, a quote, or a line break are quoted. Lines are
/// joined with `\n` and there is no trailing newline.
///
/// ```
/// use craftbook::display::{to_csv, CRAFTED_COLUMNS};
/// use craftbook::models::CraftedRow;
///
/// let rows = vec![CraftedRow { item: "Bolt, small".to_string(), quantity: 2.0 }];
/// assert_eq!(to_csv(&rows, &CRAFTED_COLUMNS).unwrap(), "Item,Quantity\n\"Bolt, small\",2");
/// ```
pub fn to_csv<R: TableRow>(rows: &[R], columns: &[&str]) -> Result<String> {
    let mut buf = Vec::new();
    {
        let mut wtr = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut buf);

        wtr.write_record(columns)?;
        for row in rows {
            wtr.write_record(columns.iter().map(|c| row.cell(c)))?;
        }
        wtr.flush()?;
    }

    let mut out = String::from_utf8(buf)?;
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// Renders rows as a markdown table.
pub fn to_markdown<R: TableRow>(rows: &[R], columns: &[&str]) -> String {
    let header = format!("| {} |", columns.join(" | "));
    let sep = format!("| {} |", vec!["---"; columns.len()].join(" | "));
    let body = rows
        .iter()
        .map(|r| markdown_row(r, columns))
        .collect::<Vec<_>>()
        .join("\n");
    join_non_empty(&[header, sep, body])
}

fn markdown_row<R: TableRow>(row: &R, columns: &[&str]) -> String {
    let cells: Vec<String> = columns.iter().map(|c| row.cell(c)).collect();
    format!("| {} |", cells.join(" | "))
}

fn join_non_empty(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Aligned (notebook) tables
// ============================================================================

/// Renders a markdown-style table with padded, aligned columns.
///
/// Each column is as wide as its header or widest cell. The separator row
/// carries the alignment markers.
///
/// ```
/// use craftbook::display::{aligned_table, Align};
/// use craftbook::models::CraftedRow;
///
/// let rows = vec![CraftedRow { item: "Sword".to_string(), quantity: 12.0 }];
/// let table = aligned_table(&rows, &["Item", "Quantity"], &[Align::Left, Align::Right]);
/// assert_eq!(table, "| Item  | Quantity |\n| :---- | -------: |\n| Sword |       12 |");
/// ```
pub fn aligned_table<R: TableRow>(rows: &[R], columns: &[&str], align: &[Align]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| columns.iter().map(|c| r.cell(c)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| text_width(&row[i]))
                .fold(text_width(c), usize::max)
        })
        .collect();

    let align_of = |i: usize| align.get(i).copied().unwrap_or(Align::Left);
    let line = |values: Vec<String>| format!("| {} |", values.join(" | "));

    let header = line(
        columns
            .iter()
            .enumerate()
            .map(|(i, c)| pad(c, widths[i], align_of(i)))
            .collect(),
    );
    let sep = line(
        widths
            .iter()
            .enumerate()
            .map(|(i, w)| separator_cell(*w, align_of(i)))
            .collect(),
    );
    let body = cells
        .iter()
        .map(|row| {
            line(
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| pad(cell, widths[i], align_of(i)))
                    .collect(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    join_non_empty(&[header, sep, body])
}

fn text_width(s: &str) -> usize {
    s.chars().count()
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    let space = width.saturating_sub(text_width(cell));
    match align {
        Align::Left => format!("{}{}", cell, " ".repeat(space)),
        Align::Right => format!("{}{}", " ".repeat(space), cell),
        Align::Center => {
            let left = space / 2;
            format!("{}{}{}", " ".repeat(left), cell, " ".repeat(space - left))
        }
    }
}

fn separator_cell(width: usize, align: Align) -> String {
    let markers = if align == Align::Center { 2 } else { 1 };
    let dashes = "-".repeat(width.saturating_sub(markers).max(3));
    match align {
        Align::Left => format!(":{}", dashes),
        Align::Right => format!("{}:", dashes),
        Align::Center => format!(":{}:", dashes),
    }
}

/// Crafted totals as a titled, aligned table.
pub fn crafted_notebook(rows: &[CraftedRow]) -> String {
    let table = aligned_table(rows, &CRAFTED_COLUMNS, &[Align::Left, Align::Right]);
    format!("=== Total Crafted Items ===\n{}", table)
}

// ============================================================================
// Grouped by gathering method
// ============================================================================

/// Partitions rows by method. Groups and the rows inside them are sorted by
/// name.
pub fn group_by_method(rows: &[RequirementRow]) -> Vec<(&str, Vec<&RequirementRow>)> {
    let mut groups: BTreeMap<&str, Vec<&RequirementRow>> = BTreeMap::new();
    for row in rows {
        let method = if row.method.is_empty() {
            UNKNOWN_METHOD
        } else {
            row.method.as_str()
        };
        groups.entry(method).or_default().push(row);
    }

    let mut groups: Vec<(&str, Vec<&RequirementRow>)> = groups.into_iter().collect();
    groups.sort_by(|a, b| locale_cmp(a.0, b.0));
    for (_, group) in &mut groups {
        group.sort_by(|a, b| locale_cmp(&a.ingredient, &b.ingredient));
    }
    groups
}

/// Gathering rows as one titled, aligned table per method.
pub fn gathering_notebook(rows: &[RequirementRow], with_location: bool) -> String {
    let (columns, align): (&[&str], &[Align]) = if with_location {
        (
            &["Ingredient", "Total Quantity", "Location Info"],
            &[Align::Left, Align::Right, Align::Left],
        )
    } else {
        (&["Ingredient", "Total Quantity"], &[Align::Left, Align::Right])
    };

    group_by_method(rows)
        .into_iter()
        .map(|(method, group)| {
            format!("=== {} ===\n{}", method, aligned_table(&group, columns, align))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Gathering rows as markdown, optionally split into one section per method.
///
/// Grouped sections drop the `Method` column and order rows by the first
/// remaining column.
pub fn markdown_grouped(rows: &[RequirementRow], columns: &[&str], group: bool) -> String {
    if !group {
        return to_markdown(rows, columns);
    }

    let columns: Vec<&str> = columns.iter().copied().filter(|c| *c != "Method").collect();
    let key = columns.first().copied().unwrap_or("");

    group_by_method(rows)
        .into_iter()
        .map(|(method, mut group)| {
            group.sort_by(|a, b| locale_cmp(&a.cell(key), &b.cell(key)));
            let header = format!("| {} |", columns.join(" | "));
            let sep = format!("| {} |", vec!["---"; columns.len()].join(" | "));
            let body = group
                .iter()
                .map(|r| markdown_row(*r, &columns))
                .collect::<Vec<_>>()
                .join("\n");
            format!("### === {} ===\n{}\n{}\n{}", method, header, sep, body)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ============================================================================
// Views
// ============================================================================

/// Renders the crafted-totals view in the requested format.
pub fn render_crafted(rows: &[CraftedRow], format: FormatKind) -> Result<String> {
    match format {
        FormatKind::Txt => Ok(crafted_notebook(rows)),
        FormatKind::Md => Ok(to_markdown(rows, &CRAFTED_COLUMNS)),
        FormatKind::Csv => to_csv(rows, &CRAFTED_COLUMNS),
    }
}

/// Renders the gathering view in the requested format.
///
/// Text output is always grouped by method; `group_by_method` only affects
/// markdown.
pub fn render_gathering(
    rows: &[RequirementRow],
    format: FormatKind,
    with_location: bool,
    group_by_method: bool,
) -> Result<String> {
    let columns: &[&str] = if with_location {
        &GATHERING_COLUMNS_WITH_LOCATION
    } else {
        &GATHERING_COLUMNS
    };
    match format {
        FormatKind::Txt => Ok(gathering_notebook(rows, with_location)),
        FormatKind::Md => Ok(markdown_grouped(rows, columns, group_by_method)),
        FormatKind::Csv => to_csv(rows, columns),
    }
}
