//! Parse command - extract fields from a single OCR payload.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use gstx_core::{InvoiceFieldParser, InvoiceFields, OcrPayload};

use super::load_config;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (OCR JSON payload, or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// List the fields that could not be extracted
    #[arg(long)]
    show_missing: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Parsing file: {}", args.input.display());

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let raw = fs::read_to_string(&args.input)?;
    let payload = match extension.as_str() {
        "json" => OcrPayload::from_json_str(&raw)?,
        // Anything else is treated as raw OCR text.
        _ => OcrPayload::from_text(raw),
    };

    let parser = InvoiceFieldParser::with_config(&payload, config.extraction)?;
    let fields = parser.parse();

    let output = format_fields(&fields, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_missing {
        let missing = fields.missing_fields();
        if missing.is_empty() {
            println!("{} All fields extracted", style("✓").green());
        } else {
            println!(
                "{} Missing fields: {}",
                style("ℹ").blue(),
                missing.join(", ")
            );
        }
    }

    debug!("Total parse time: {:?}", start.elapsed());

    Ok(())
}

fn format_fields(fields: &InvoiceFields, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
        OutputFormat::Csv => format_csv(fields),
        OutputFormat::Text => Ok(format_text(fields)),
    }
}

fn format_csv(fields: &InvoiceFields) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "invoice_number",
        "invoice_date",
        "seller_gstin",
        "buyer_name",
        "buyer_gstin",
        "total_tax",
        "grand_total",
        "line_item_count",
    ])?;

    wtr.write_record([
        fields.invoice_number.clone().unwrap_or_default(),
        fields
            .invoice_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
        fields.seller_gstin.clone().unwrap_or_default(),
        fields.buyer_name.clone().unwrap_or_default(),
        fields.buyer_gstin.clone().unwrap_or_default(),
        fields.total_tax.map(|t| t.to_string()).unwrap_or_default(),
        fields
            .grand_total
            .map(|t| t.to_string())
            .unwrap_or_default(),
        fields.line_items.len().to_string(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(fields: &InvoiceFields) -> String {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", or_dash(&fields.invoice_number)));
    output.push_str(&format!(
        "Date: {}\n",
        fields
            .invoice_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    output.push('\n');

    output.push_str(&format!("Seller GSTIN: {}\n", or_dash(&fields.seller_gstin)));
    output.push_str(&format!("Buyer: {}\n", or_dash(&fields.buyer_name)));
    output.push_str(&format!("Buyer GSTIN: {}\n", or_dash(&fields.buyer_gstin)));
    output.push('\n');

    if !fields.line_items.is_empty() {
        output.push_str("Line items:\n");
        for item in &fields.line_items {
            output.push_str(&format!(
                "  {} x {} @ {} = {}\n",
                item.quantity, item.description, item.rate, item.total
            ));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Total tax:   {}\n",
        fields
            .total_tax
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!(
        "Grand total: {}\n",
        fields
            .grand_total
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));

    output
}
