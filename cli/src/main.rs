//! docuform CLI - DocuSign template to fillable PDF converter

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docuform::{
    parse_template, ConvertOptions, FieldCategory, FieldKind, TabOutcome, TemplateConverter,
};

#[derive(Parser)]
#[command(name = "docuform")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert DocuSign template exports into fillable PDFs", long_about = None)]
struct Cli {
    /// Input template JSON file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a template export to a fillable PDF
    Convert {
        /// Input template JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file (defaults to <FILE>.pdf)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        flags: ConvertFlags,
    },

    /// Show documents and tab statistics without converting
    Inspect {
        /// Input template JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the field kinds the converter recognizes
    Kinds,

    /// Show version information
    Version,
}

#[derive(clap::Args, Default)]
struct ConvertFlags {
    /// Options file (JSON); flags override its values
    #[arg(long, value_name = "FILE", env = "DOCUFORM_OPTIONS")]
    options: Option<PathBuf>,

    /// Keep tabs that would be filtered as system tabs
    #[arg(long)]
    include_system_tabs: bool,

    /// Show generated field names as placeholder values
    #[arg(long)]
    show_field_names: bool,

    /// Paint a white band of this height (points) over each page header
    #[arg(long, value_name = "PT")]
    mask_header: Option<f64>,

    /// Paint a white band of this height (points) over each page footer
    #[arg(long, value_name = "PT")]
    mask_footer: Option<f64>,

    /// Default width (points) of text fields without an explicit width
    #[arg(long, value_name = "PT")]
    field_width: Option<f64>,

    /// Default height (points) of text fields without an explicit height
    #[arg(long, value_name = "PT")]
    field_height: Option<f64>,

    /// Skip a field kind (repeatable, e.g. --disable radioGroup)
    #[arg(long, value_name = "KIND", value_parser = parse_kind)]
    disable: Vec<FieldKind>,

    /// Drop rejected tabs instead of placing a text field
    #[arg(long)]
    no_text_fallback: bool,

    /// Decode documents on a single thread
    #[arg(long)]
    sequential: bool,

    /// Write per-tab outcomes as JSON to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

fn parse_kind(value: &str) -> Result<FieldKind, String> {
    let kind: FieldKind = value.parse()?;
    if kind == FieldKind::Unknown {
        return Err("the unknown kind cannot be disabled".to_string());
    }
    Ok(kind)
}

impl ConvertFlags {
    fn to_options(&self) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
        let mut options = match &self.options {
            Some(path) => ConvertOptions::from_json(&fs::read_to_string(path)?)?,
            None => ConvertOptions::new(),
        };

        if self.include_system_tabs {
            options = options.with_system_tabs(true);
        }
        if self.show_field_names {
            options = options.with_field_names(true);
        }
        if let Some(height) = self.mask_header {
            options = options.with_header_mask(height);
        }
        if let Some(height) = self.mask_footer {
            options = options.with_footer_mask(height);
        }
        if self.field_width.is_some() || self.field_height.is_some() {
            let width = self.field_width.or(options.field_width);
            let height = self.field_height.or(options.field_height);
            options = options.with_field_size(width, height);
        }
        for &kind in &self.disable {
            options = options.disable(kind);
        }
        if self.no_text_fallback {
            options = options.with_text_fallback(false);
        }
        if self.sequential {
            options = options.sequential();
        }
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            flags,
        }) => cmd_convert(&input, output.as_deref(), &flags),
        Some(Commands::Inspect { input, json }) => cmd_inspect(&input, json),
        Some(Commands::Kinds) => {
            cmd_kinds();
            Ok(())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), &ConvertFlags::default())
            } else {
                println!("{}", "Usage: docuform <FILE> [OUTPUT]".yellow());
                println!("       docuform --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}.pdf", stem))
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    flags: &ConvertFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_output(input));
    let options = flags.to_options()?;

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Reading template...");
    let json = fs::read_to_string(input)?;
    let template = parse_template(&json)?;
    pb.inc(1);

    pb.set_message("Placing fields...");
    let result = TemplateConverter::new(options).convert(&template)?;
    pb.inc(1);

    pb.set_message("Writing PDF...");
    fs::write(&output, &result.pdf)?;
    if let Some(report_path) = &flags.report {
        fs::write(report_path, serde_json::to_string_pretty(&result.reports)?)?;
    }
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!(
        "{} {} ({} pages, {} fields)",
        "Saved to".green(),
        output.display(),
        result.page_count(),
        result.field_count()
    );

    println!("{}", "─".repeat(40).dimmed());
    let categories = [
        ("Text", FieldCategory::Text),
        ("Signature", FieldCategory::Signature),
        ("Date", FieldCategory::Date),
        ("Checkbox", FieldCategory::Checkbox),
        ("Radio", FieldCategory::Radio),
        ("Dropdown", FieldCategory::Dropdown),
        ("Attachment", FieldCategory::Attachment),
        ("Other", FieldCategory::Other),
    ];
    for (label, category) in categories {
        let count = result.counters.get(category);
        if count > 0 {
            println!("  {:<12} {}", label, count);
        }
    }

    let fallbacks = result
        .reports
        .iter()
        .filter(|r| matches!(r.outcome, TabOutcome::TextFallback { .. }))
        .count();
    let skipped = result
        .reports
        .iter()
        .filter(|r| matches!(r.outcome, TabOutcome::Skipped { .. }))
        .count();
    if fallbacks > 0 {
        println!("  {} {} tabs placed as text", "Fallback".yellow(), fallbacks);
    }
    if skipped > 0 {
        println!("  {} {} tabs", "Skipped".yellow(), skipped);
    }
    for document_id in &result.skipped_documents {
        println!(
            "  {} document {} could not be decoded",
            "Warning".yellow().bold(),
            document_id
        );
    }

    Ok(())
}

fn cmd_inspect(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let report = docuform::inspect_file(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Template Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Documents".bold(), report.documents.len());
    for doc in &report.documents {
        let status = if doc.has_content {
            "ok".green()
        } else {
            "no content".red()
        };
        println!(
            "  [{}] {} ({})",
            doc.document_id,
            doc.name.as_deref().unwrap_or("untitled"),
            status
        );
    }

    println!("{}: {}", "Tabs".bold(), report.total_tabs);
    println!("{}: {}", "System tabs".bold(), report.system_tabs);

    if !report.roles.is_empty() {
        println!();
        println!("{}", "Recipient Roles".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for (role, count) in &report.roles {
            println!("  {:<20} {}", role, count);
        }
    }

    if !report.kinds.is_empty() {
        println!();
        println!("{}", "Field Kinds".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for (kind, count) in &report.kinds {
            println!("  {:<20} {}", kind.to_string(), count);
        }
    }

    Ok(())
}

fn cmd_kinds() {
    println!("{}", "Field Kinds".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for kind in FieldKind::REGISTERED {
        println!("  {:<20} {:?}", kind.to_string(), kind.category());
    }
}

fn cmd_version() {
    println!("{} {}", "docuform".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("DocuSign template to fillable PDF converter");
    println!();
    println!(
        "Repository: {}",
        "https://github.com/iyulab/docuform".dimmed()
    );
    println!("License: MIT");
}
