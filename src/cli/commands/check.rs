//! `costing check` command - sourcing vs. rate table consistency

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::print_rows;
use crate::cli::{CostingContext, GlobalOpts, OutputFormat};
use crate::core::consistency;
use crate::core::ComboRef;

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Exit with an error when any mismatch is found
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CostingContext::load(global)?;
    let report = consistency::check(&ctx.registry, &ctx.rates);

    match ctx.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&report).into_diagnostic()?);
        }
        format => {
            let mut rows = Vec::new();
            let mut push = |kind: &str, combos: &[ComboRef]| {
                for c in combos {
                    rows.push(vec![
                        kind.to_string(),
                        c.material.clone(),
                        c.process.clone(),
                        c.supplier.clone(),
                    ]);
                }
            };
            push("unsourced-rate", &report.unsourced_rates);
            push("unpriced-sourcing", &report.unpriced_sourcing);

            if rows.is_empty() {
                if !global.quiet {
                    println!("{} sourcing and rates are consistent", style("✓").green());
                }
            } else {
                print_rows(
                    format,
                    &report,
                    &["ISSUE", "MATERIAL", "PROCESS", "SUPPLIER"],
                    &rows,
                )?;
            }
        }
    }

    if args.strict && !report.is_consistent() {
        return Err(miette::miette!(
            "{} priced combination(s) without sourcing, {} sourcing option(s) without rates",
            report.unsourced_rates.len(),
            report.unpriced_sourcing.len()
        ));
    }
    Ok(())
}
