use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Parser;
use ggst_cantons::CantonRegistry;
use ggst_core::{Confession, Investment, TaxInputs, TaxpayerType};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// Compute the Grundstückgewinnsteuer for a property sale.
///
/// Prints the full tax result as JSON, including the bracket trace,
/// holding-period adjustments and the canton/commune/church split.
#[derive(Parser, Debug)]
#[command(name = "ggst")]
#[command(version, about, long_about = None)]
struct Args {
    /// Canton code (e.g. SH, ZH, BE, AG, SG)
    #[arg(short = 'k', long)]
    canton: String,

    /// Commune name; required for cantons with per-commune Steuerfuss data
    #[arg(short = 'm', long)]
    commune: Option<String>,

    /// Tax year
    #[arg(short = 'y', long, default_value_t = 2025)]
    tax_year: i32,

    /// Purchase date (YYYY-MM-DD)
    #[arg(long)]
    purchase_date: Option<NaiveDate>,

    /// Sale date (YYYY-MM-DD)
    #[arg(long)]
    sale_date: Option<NaiveDate>,

    /// Purchase price in CHF
    #[arg(long, default_value = "0")]
    purchase_price: Decimal,

    /// Sale price in CHF
    #[arg(long, default_value = "0")]
    sale_price: Decimal,

    /// Value-increasing acquisition costs in CHF
    #[arg(long, default_value = "0")]
    acquisition_costs: Decimal,

    /// Selling costs in CHF
    #[arg(long, default_value = "0")]
    selling_costs: Decimal,

    /// Taxpayer type: natural or legal
    #[arg(long, default_value = "natural")]
    taxpayer_type: String,

    /// Value-increasing investment as description=amount, repeatable
    /// (deducted from the taxable gain)
    #[arg(long = "investment", value_parser = parse_investment)]
    investments: Vec<Investment>,

    /// Household confession headcount as key=count, repeatable
    /// (keys: evangR, roemK, christK, Andere)
    #[arg(long = "confession", value_parser = parse_confession_count)]
    confessions: Vec<(Confession, u32)>,

    /// List the canton's communes, tax years and confessions, then exit
    #[arg(long, default_value_t = false)]
    list: bool,
}

fn parse_investment(s: &str) -> Result<Investment, String> {
    let (description, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected description=amount, got '{s}'"))?;
    let amount = amount
        .parse::<Decimal>()
        .map_err(|e| format!("invalid amount '{amount}': {e}"))?;
    Ok(Investment {
        description: description.to_string(),
        amount,
        investment_date: None,
    })
}

fn parse_confession_count(s: &str) -> Result<(Confession, u32), String> {
    let (key, count) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=count, got '{s}'"))?;
    let confession =
        Confession::parse(key).ok_or_else(|| format!("unknown confession '{key}'"))?;
    let count = count
        .parse::<u32>()
        .map_err(|e| format!("invalid count '{count}': {e}"))?;
    Ok((confession, count))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let registry = CantonRegistry::new();

    let engine = registry
        .engine(&args.canton)
        .with_context(|| format!("available cantons: {:?}", registry.available_cantons()))?;

    if args.list {
        println!("{} ({})", engine.canton_code(), engine.canton_name());
        println!("  tax years:  {:?}", engine.available_years());
        println!("  communes:   {:?}", engine.communes(args.tax_year));
        let confessions: Vec<&str> =
            engine.confessions().iter().map(|c| c.as_str()).collect();
        println!("  confessions: {confessions:?}");
        return Ok(());
    }

    let purchase_date = args
        .purchase_date
        .context("--purchase-date is required")?;
    let sale_date = args.sale_date.context("--sale-date is required")?;
    if sale_date < purchase_date {
        bail!("sale date {sale_date} precedes purchase date {purchase_date}");
    }

    let taxpayer_type = TaxpayerType::parse(&args.taxpayer_type)
        .with_context(|| format!("unknown taxpayer type '{}'", args.taxpayer_type))?;

    let inputs = TaxInputs {
        canton: args.canton,
        commune: args.commune.unwrap_or_default(),
        tax_year: args.tax_year,
        purchase_date,
        sale_date,
        purchase_price: args.purchase_price,
        sale_price: args.sale_price,
        acquisition_costs: args.acquisition_costs,
        selling_costs: args.selling_costs,
        investments: args.investments,
        taxpayer_type,
        confessions: args.confessions.into_iter().collect::<BTreeMap<_, _>>(),
    };

    let result = engine
        .compute(&inputs)
        .with_context(|| format!("computation failed for canton {}", inputs.canton))?;

    let json = serde_json::to_string_pretty(&result).context("failed to serialize result")?;
    println!("{json}");

    Ok(())
}
