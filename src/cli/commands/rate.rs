//! `costing rate` command - Supplier rate queries

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{compare_sizes, format_rate, print_rows};
use crate::cli::{CostingContext, GlobalOpts, OutputFormat};
use crate::entities::{BulkRule, RateUnit};

#[derive(Subcommand, Debug)]
pub enum RateCommands {
    /// Show all supplier rates for one material / grade / size cell
    Cell(CellArgs),

    /// Show the rate for one process and supplier in a cell
    Get(GetArgs),

    /// Check whether a process and supplier is priced anywhere for a material
    Has(HasArgs),

    /// List rates with optional filters
    List(ListArgs),

    /// Fill one rate across a size range and show the result
    Bulk(BulkArgs),
}

#[derive(clap::Args, Debug)]
pub struct CellArgs {
    /// Material (BOM part name)
    pub material: String,
    /// Sub-material / grade
    pub sub_material: String,
    /// Size label
    pub size: String,
}

#[derive(clap::Args, Debug)]
pub struct GetArgs {
    pub material: String,
    pub sub_material: String,
    pub size: String,
    /// Process name
    pub process: String,
    /// Supplier name
    pub supplier: String,
}

#[derive(clap::Args, Debug)]
pub struct HasArgs {
    pub material: String,
    pub process: String,
    pub supplier: String,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by material
    #[arg(long, short = 'm')]
    pub material: Option<String>,

    /// Filter by sub-material / grade
    #[arg(long, short = 'g')]
    pub grade: Option<String>,

    /// Filter by process
    #[arg(long, short = 'p')]
    pub process: Option<String>,

    /// Filter by supplier (substring, case-insensitive)
    #[arg(long, short = 's')]
    pub supplier: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct BulkArgs {
    pub material: String,
    /// Sub-material / grade
    pub grade: String,
    pub process: String,
    pub supplier: String,
    /// First size in the range
    #[arg(long)]
    pub from: String,
    /// Last size in the range (inclusive)
    #[arg(long)]
    pub to: String,
    /// Rate to write
    #[arg(long)]
    pub rate: f64,
}

/// A rate row as printed by list-style commands
#[derive(Debug, Serialize)]
struct RateRow {
    material: String,
    sub_material: String,
    size: String,
    process: String,
    supplier: String,
    rate: f64,
    list_price: f64,
    unit: String,
}

impl RateRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.material.clone(),
            self.sub_material.clone(),
            self.size.clone(),
            self.process.clone(),
            self.supplier.clone(),
            format_rate(self.rate),
            format_rate(self.list_price),
            self.unit.clone(),
        ]
    }
}

const HEADER: [&str; 8] = [
    "MATERIAL", "GRADE", "SIZE", "PROCESS", "SUPPLIER", "RATE", "LIST", "UNIT",
];

/// Run a rate subcommand
pub fn run(cmd: RateCommands, global: &GlobalOpts) -> Result<()> {
    let mut ctx = CostingContext::load(global)?;
    match cmd {
        RateCommands::Cell(args) => run_cell(&ctx, args),
        RateCommands::Get(args) => run_get(&ctx, args, global),
        RateCommands::Has(args) => run_has(&ctx, args),
        RateCommands::List(args) => run_list(&ctx, args),
        RateCommands::Bulk(args) => run_bulk(&mut ctx, args),
    }
}

fn unit_for(ctx: &CostingContext, material: &str) -> RateUnit {
    let make_buy = ctx
        .registry
        .find_by_name(material)
        .next()
        .and_then(|m| m.make_buy);
    RateUnit::for_make_buy(make_buy)
}

fn row(
    ctx: &CostingContext,
    material: &str,
    sub_material: &str,
    size: &str,
    process: &str,
    supplier: &str,
    rate: f64,
) -> RateRow {
    RateRow {
        material: material.to_string(),
        sub_material: sub_material.to_string(),
        size: size.to_string(),
        process: process.to_string(),
        supplier: supplier.to_string(),
        rate,
        list_price: ctx.product.list_price(rate),
        unit: unit_for(ctx, material).to_string(),
    }
}

fn print(ctx: &CostingContext, rows: &[RateRow]) -> Result<()> {
    let cells: Vec<_> = rows.iter().map(RateRow::cells).collect();
    print_rows(ctx.format, &rows, &HEADER, &cells)
}

fn run_cell(ctx: &CostingContext, args: CellArgs) -> Result<()> {
    let entries = ctx
        .resolver()
        .entries_for_cell(&args.material, &args.sub_material, &args.size);

    if entries.is_empty() && !ctx.format.is_structured() {
        println!(
            "No rates for {} / {} / {}.",
            args.material, args.sub_material, args.size
        );
        return Ok(());
    }

    let mut rows: Vec<_> = entries
        .iter()
        .map(|e| {
            row(
                ctx,
                &args.material,
                &args.sub_material,
                &args.size,
                &e.process_type,
                &e.supplier,
                e.rate,
            )
        })
        .collect();
    rows.sort_by(|a, b| a.rate.total_cmp(&b.rate));
    print(ctx, &rows)
}

fn run_get(ctx: &CostingContext, args: GetArgs, global: &GlobalOpts) -> Result<()> {
    let rate = ctx.resolver().rate(
        &args.material,
        &args.sub_material,
        &args.size,
        &args.process,
        &args.supplier,
    );

    let Some(rate) = rate else {
        return Err(miette::miette!(
            "no rate for {} / {} / {} / {} / {}",
            args.material,
            args.sub_material,
            args.size,
            args.process,
            args.supplier
        ));
    };

    match ctx.format {
        OutputFormat::Auto if !global.quiet => {
            let unit = unit_for(ctx, &args.material);
            println!(
                "{} {} (list {})",
                style(format_rate(rate)).cyan(),
                unit,
                format_rate(ctx.product.list_price(rate))
            );
        }
        OutputFormat::Auto | OutputFormat::Tsv | OutputFormat::Csv => println!("{}", rate),
        _ => {
            let r = row(
                ctx,
                &args.material,
                &args.sub_material,
                &args.size,
                &args.process,
                &args.supplier,
                rate,
            );
            print(ctx, &[r])?;
        }
    }
    Ok(())
}

fn run_has(ctx: &CostingContext, args: HasArgs) -> Result<()> {
    let found = ctx
        .resolver()
        .has_rates_for_combo(&args.material, &args.process, &args.supplier);
    match ctx.format {
        OutputFormat::Json => println!("{}", found),
        _ => println!("{}", if found { "yes" } else { "no" }),
    }
    Ok(())
}

fn run_list(ctx: &CostingContext, args: ListArgs) -> Result<()> {
    let supplier_filter = args.supplier.as_ref().map(|s| s.to_lowercase());

    let mut rows: Vec<RateRow> = ctx
        .rates
        .iter()
        .filter(|(m, ..)| args.material.as_deref().map_or(true, |f| f == *m))
        .filter(|(_, g, ..)| args.grade.as_deref().map_or(true, |f| f == *g))
        .filter(|(.., e)| args.process.as_deref().map_or(true, |f| f == e.process_type))
        .filter(|(.., e)| {
            supplier_filter
                .as_deref()
                .map_or(true, |f| e.supplier.to_lowercase().contains(f))
        })
        .map(|(m, g, size, e)| row(ctx, m, g, size, &e.process_type, &e.supplier, e.rate))
        .collect();

    if args.count {
        println!("{}", rows.len());
        return Ok(());
    }

    if rows.is_empty() && !ctx.format.is_structured() {
        println!("No rates found.");
        return Ok(());
    }

    rows.sort_by(|a, b| {
        a.material
            .cmp(&b.material)
            .then_with(|| a.sub_material.cmp(&b.sub_material))
            .then_with(|| compare_sizes(&a.size, &b.size))
            .then_with(|| a.process.cmp(&b.process))
            .then_with(|| a.supplier.cmp(&b.supplier))
    });

    print(ctx, &rows)?;
    if ctx.format == OutputFormat::Auto {
        println!("{} rate(s) found.", style(rows.len()).cyan());
    }
    Ok(())
}

fn run_bulk(ctx: &mut CostingContext, args: BulkArgs) -> Result<()> {
    if !args.rate.is_finite() || args.rate < 0.0 {
        return Err(miette::miette!("rate must not be negative, got {}", args.rate));
    }

    // Size order: every size already priced for the material, plus the bounds
    let mut sizes: Vec<String> = ctx
        .rates
        .sub_materials(&args.material)
        .flat_map(|g| ctx.rates.sizes(&args.material, g))
        .map(str::to_string)
        .chain([args.from.clone(), args.to.clone()])
        .collect();
    sizes.sort_by(|a, b| compare_sizes(a, b));
    sizes.dedup();
    ctx.product.set_sizes(sizes);

    let rule = BulkRule {
        material: args.grade.clone(),
        rate: args.rate,
        from_size: args.from,
        to_size: args.to,
    };
    let written = ctx.rates.apply_bulk_rule(
        &args.material,
        &rule,
        &args.process,
        &args.supplier,
        &ctx.product.selected_sizes,
    );

    if written == 0 {
        return Err(miette::miette!(
            "size range {} to {} is empty",
            rule.from_size,
            rule.to_size
        ));
    }

    let ctx: &CostingContext = ctx;
    let resolver = ctx.resolver();
    let rows: Vec<_> = ctx
        .product
        .selected_sizes
        .iter()
        .filter_map(|size| {
            resolver
                .rate(&args.material, &args.grade, size, &args.process, &args.supplier)
                .map(|rate| {
                    row(
                        ctx,
                        &args.material,
                        &args.grade,
                        size,
                        &args.process,
                        &args.supplier,
                        rate,
                    )
                })
        })
        .collect();
    print(ctx, &rows)?;
    if ctx.format == OutputFormat::Auto {
        println!("{} cell(s) written.", style(written).cyan());
    }
    Ok(())
}
