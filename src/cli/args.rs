use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aq-dashboard")]
#[command(about = "Air-quality analytics dashboard for city sensor readings")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Configuration file [default: dashboard.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the dashboard to a standalone file
    Render {
        #[arg(short, long, help = "Input CSV file [default: combined.csv]")]
        data: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Output file path [default: output/air-quality-dashboard-{YYMMDD}.{html|json}]"
        )]
        output: Option<PathBuf>,

        #[arg(short, long, default_value = "html", help = "Output format: html or json")]
        format: String,

        #[arg(long, help = "Memory-map the input file")]
        mmap: bool,
    },

    /// Serve the dashboard over HTTP, reloading the data on every request
    Serve {
        #[arg(short, long, help = "Input CSV file [default: combined.csv]")]
        data: Option<PathBuf>,

        #[arg(short, long, help = "Bind address [default: 127.0.0.1:8501]")]
        bind: Option<String>,

        #[arg(long, help = "Memory-map the input file")]
        mmap: bool,
    },

    /// Check the dataset for quality issues without rendering
    Validate {
        #[arg(short, long, help = "Input CSV file [default: combined.csv]")]
        data: Option<PathBuf>,

        #[arg(long, default_value = "10", help = "Number of issues to list")]
        show: usize,
    },

    /// Display dataset statistics
    Info {
        #[arg(short, long, help = "Input CSV file [default: combined.csv]")]
        data: Option<PathBuf>,

        #[arg(short, long, default_value = "5")]
        sample: usize,
    },
}
