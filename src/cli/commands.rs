use crate::analyzers::DatasetAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::models::ReadingTable;
use crate::processors::IntegrityChecker;
use crate::readers::ReadingReader;
use crate::server::{self, ServerState};
use crate::utils::filename::generate_default_dashboard_filename;
use crate::utils::logging::init_tracing;
use crate::utils::progress::ProgressReporter;
use crate::views::{build_dashboard, ViewSettings};
use crate::writers::{HtmlWriter, JsonWriter, OutputFormat};
use std::path::Path;
use tracing::info;

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose, cli.log_file.as_deref())?;

    let config = DashboardConfig::load(cli.config.as_deref())?;
    let settings = ViewSettings::from(&config);

    match cli.command {
        Commands::Render {
            data,
            output,
            format,
            mmap,
        } => {
            let format = OutputFormat::parse(&format)?;
            let data_path = data.unwrap_or_else(|| config.data_path.clone());
            let output_file = output
                .unwrap_or_else(|| generate_default_dashboard_filename(format.extension()));

            println!("Rendering air quality dashboard...");
            println!("Input file: {}", data_path.display());
            println!("Output file: {}", output_file.display());

            let table = load_with_progress(&data_path, mmap || config.use_mmap)?;

            let progress = ProgressReporter::new_spinner("Building views...", false);
            let dashboard = build_dashboard(&table, &settings);
            progress.finish_with_message(&format!(
                "Built {} charts across {} tabs",
                dashboard.chart_count(),
                dashboard.tabs.len()
            ));

            for tab in dashboard.tabs.iter().filter(|t| t.is_failed()) {
                println!("⚠️  {} could not be rendered", tab.title);
            }

            match format {
                OutputFormat::Html => HtmlWriter::new().write(&dashboard, &output_file)?,
                OutputFormat::Json => JsonWriter::new().write(&dashboard, &output_file)?,
            }

            println!("Dashboard written to {}", output_file.display());
        }

        Commands::Serve { data, bind, mmap } => {
            let state = ServerState {
                data_path: data.unwrap_or_else(|| config.data_path.clone()),
                settings,
                use_mmap: mmap || config.use_mmap,
            };
            let bind_addr = bind.unwrap_or_else(|| config.server.bind_addr.clone());

            println!("Serving dashboard at http://{}/", bind_addr);
            println!("Input file: {}", state.data_path.display());

            server::serve(state, &bind_addr).await?;
        }

        Commands::Validate { data, show } => {
            let data_path = data.unwrap_or_else(|| config.data_path.clone());
            println!("Validating air quality data...");
            println!("Input file: {}", data_path.display());

            let table = load_with_progress(&data_path, config.use_mmap)?;

            let checker = IntegrityChecker::new().with_issue_limit(show);
            let report = checker.check_integrity(&table);
            println!("\n{}", checker.generate_summary(&report));

            if report.is_clean() {
                println!("✅ All data passed validation checks");
            } else {
                println!("⚠️  Found {} validation issues", report.issues.len());
            }
        }

        Commands::Info { data, sample } => {
            let data_path = data.unwrap_or_else(|| config.data_path.clone());
            println!("Analyzing dataset: {}", data_path.display());

            let table = load_with_progress(&data_path, config.use_mmap)?;
            let stats = DatasetAnalyzer::new().analyze(&table)?;

            println!("\n{}", stats.summary());
            if let Some(span) = stats.year_span() {
                println!("Chart title years: {}", span);
            }

            if sample > 0 {
                println!("\nSample Records (showing {} records):", sample.min(table.len()));
                for (i, reading) in table.iter().take(sample).enumerate() {
                    let value = reading
                        .value
                        .map_or_else(|| "missing".to_string(), |v| format!("{:.2}", v));
                    let timestamp = reading
                        .datetime_utc
                        .map_or_else(|| "no timestamp".to_string(), |ts| ts.to_rfc3339());
                    println!(
                        "{}. {} / {} ({}): {}={} at {}",
                        i + 1,
                        reading.city,
                        reading.location_name,
                        reading.location_id,
                        reading.parameter,
                        value,
                        timestamp
                    );
                }
            }
        }
    }

    Ok(())
}

fn load_with_progress(path: &Path, use_mmap: bool) -> Result<ReadingTable> {
    let progress = ProgressReporter::new_spinner("Loading readings...", false);
    let table = ReadingReader::with_mmap(use_mmap).read_table(path)?;
    progress.finish_with_message(&format!("Loaded {} readings", table.len()));

    info!(
        path = %path.display(),
        cities = table.cities().len(),
        "Dataset ready"
    );
    Ok(table)
}
