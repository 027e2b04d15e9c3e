use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::{Cell, Color, Table};
use tracing::info_span;

use vsac_cli::pipeline::run_export;
use vsac_cli::types::{InputSource, RunConfig, RunSummary};
use vsac_client::VsacClient;
use vsac_ingest::{IDENTIFIER_MAP_FILE, cache_dir, data_dir};
use vsac_model::{ExportPlan, InputSourceType, OutputFormat, OutputStructure};
use vsac_output::DEFAULT_SOURCE_NAME;
use vsac_transform::TableOptions;

use crate::cli::RunArgs;
use crate::summary::apply_table_style;

pub fn run(args: &RunArgs) -> Result<RunSummary> {
    let config = run_config(args)?;
    let _span = info_span!("run", source = %config.input.location).entered();
    let api_key = args.api_key.clone().unwrap_or_default();
    run_export(&config, || Ok(VsacClient::new(api_key)?))
}

fn run_config(args: &RunArgs) -> Result<RunConfig> {
    let source_type = InputSourceType::from(args.input_source_type);
    let input = match source_type {
        InputSourceType::GoogleSheet => InputSource {
            source_type,
            location: args
                .google_sheet_url
                .clone()
                .context("--google-sheet-url is required for google-sheet input")?,
            sheet_name: args.google_sheet_name.clone(),
        },
        InputSourceType::Txt | InputSourceType::Csv => {
            let path = args
                .input_path
                .as_ref()
                .context("--input-path is required for txt and csv input")?;
            InputSource::file(source_type, path.display().to_string())
        }
    };

    let data_dir = args.data_dir.clone().unwrap_or_else(data_dir);
    let cache_dir = match (&args.cache_dir, &args.data_dir) {
        (Some(dir), _) => dir.clone(),
        (None, Some(data)) => data.join("cache"),
        (None, None) => cache_dir(),
    };
    let id_map_path = args
        .id_map
        .clone()
        .unwrap_or_else(|| data_dir.join(IDENTIFIER_MAP_FILE));
    let source_name = if args.source_name.trim().is_empty() {
        DEFAULT_SOURCE_NAME.to_string()
    } else {
        args.source_name.clone()
    };

    Ok(RunConfig {
        input,
        output_format: args.output_format,
        output_structure: args.output_structure,
        field_delimiter: args.field_delimiter,
        use_cache: args.use_cache,
        data_dir,
        cache_dir,
        id_map_path,
        source_name,
        output_date: Local::now().date_naive(),
        table_options: TableOptions::default(),
        show_progress: !args.no_progress,
    })
}

pub fn run_plans() {
    let mut table = Table::new();
    table.set_header(vec!["Format", "Structure", "Supported"]);
    apply_table_style(&mut table);
    for format in OutputFormat::ALL {
        for structure in OutputStructure::ALL {
            let supported = match ExportPlan::resolve(format, structure) {
                Ok(_) => Cell::new("yes").fg(Color::Green),
                Err(_) => Cell::new("no").fg(Color::DarkGrey),
            };
            table.add_row(vec![
                Cell::new(format.as_str()),
                Cell::new(structure.as_str()),
                supported,
            ]);
        }
    }
    println!("{table}");
}
