//! `costing bom` command - BOM parts and their sourcing options

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::{print_rows, truncate_str};
use crate::cli::{CostingContext, GlobalOpts, OutputFormat};
use crate::core::{MaterialId, SourcingRegistry};
use crate::entities::{MakeBuy, Material, ProcessSourcing, RateUnit};

#[derive(Subcommand, Debug)]
pub enum BomCommands {
    /// List parts with one row per sourcing process
    List(ListArgs),

    /// Show the BOM as a tree with sourcing options
    Tree,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only MAKE or BUY parts
    #[arg(long = "type", short = 't')]
    pub make_buy: Option<MakeBuy>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

/// A part as serialized by `bom list`
#[derive(Debug, Serialize)]
struct BomRow<'a> {
    id: &'a MaterialId,
    name: &'a str,
    qty: f64,
    #[serde(rename = "type")]
    make_buy: Option<MakeBuy>,
    unit: String,
    sourcing: &'a [ProcessSourcing],
}

/// Run a bom subcommand
pub fn run(cmd: BomCommands, global: &GlobalOpts) -> Result<()> {
    let ctx = CostingContext::load(global)?;
    match cmd {
        BomCommands::List(args) => run_list(&ctx, args),
        BomCommands::Tree => run_tree(&ctx),
    }
}

fn run_list(ctx: &CostingContext, args: ListArgs) -> Result<()> {
    let parts: Vec<_> = ctx
        .registry
        .iter()
        .filter(|m| args.make_buy.map_or(true, |t| m.make_buy == Some(t)))
        .collect();

    if args.count {
        println!("{}", parts.len());
        return Ok(());
    }

    if parts.is_empty() && !ctx.format.is_structured() {
        println!("No materials found.");
        return Ok(());
    }

    let mut rows = Vec::new();
    for m in &parts {
        let indent = "  ".repeat(m.depth);
        let make_buy = m.make_buy.map_or("-".to_string(), |t| t.to_string());
        let unit = RateUnit::for_make_buy(m.make_buy).to_string();
        if m.sourcing.is_empty() {
            rows.push(vec![
                m.id.to_string(),
                format!("{}{}", indent, m.name),
                m.qty.to_string(),
                make_buy,
                unit,
                "-".to_string(),
                "-".to_string(),
            ]);
            continue;
        }
        for process in m.sourcing {
            rows.push(vec![
                m.id.to_string(),
                format!("{}{}", indent, m.name),
                m.qty.to_string(),
                make_buy.clone(),
                unit.clone(),
                process.process_type.clone(),
                process.suppliers.join("; "),
            ]);
        }
    }

    let records: Vec<_> = parts
        .iter()
        .map(|m| BomRow {
            id: m.id,
            name: m.name,
            qty: m.qty,
            make_buy: m.make_buy,
            unit: RateUnit::for_make_buy(m.make_buy).to_string(),
            sourcing: m.sourcing,
        })
        .collect();
    print_rows(
        ctx.format,
        &records,
        &["ID", "NAME", "QTY", "TYPE", "UNIT", "PROCESS", "SUPPLIERS"],
        &rows,
    )?;

    if ctx.format == OutputFormat::Auto {
        println!("{} material(s) found.", style(parts.len()).cyan());
    }
    Ok(())
}

fn run_tree(ctx: &CostingContext) -> Result<()> {
    match ctx.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&ctx.registry.bom_tree()).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&ctx.registry.bom_tree()).into_diagnostic()?);
        }
        _ => print!("{}", render_tree(&ctx.registry)),
    }
    Ok(())
}

/// Indented tree of parts, each followed by its process → supplier lines
pub fn render_tree(registry: &SourcingRegistry) -> String {
    fn render(out: &mut String, materials: &[Material], prefix: &str) {
        for (i, mat) in materials.iter().enumerate() {
            let is_last = i == materials.len() - 1;
            let branch = if is_last { "└─ " } else { "├─ " };
            let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });

            let make_buy = mat.make_buy.map_or(String::new(), |t| format!(" [{}]", t));
            out.push_str(&format!(
                "{}{}{} (qty: {}){}\n",
                prefix, branch, mat.name, mat.qty, make_buy
            ));
            for process in &mat.sourcing {
                out.push_str(&format!(
                    "{}  · {}: {}\n",
                    child_prefix,
                    process.process_type,
                    truncate_str(&process.suppliers.join(", "), 80)
                ));
            }

            render(out, &mat.children, &child_prefix);
        }
    }

    let mut out = String::new();
    render(&mut out, &registry.materials(), "");
    out
}
