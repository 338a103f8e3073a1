use crate::aggregate::CommitOrder;
use crate::hours::Chapter;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "locmap")]
#[command(about = "Commit history explorer for per-line code logs: scatter, brushing, time windows and a scroll story")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(long, global = true, env = "LOCMAP_DATA", default_value = "loc.csv", help = "Path to the per-line code log (CSV)")]
    pub data: PathBuf,

    #[arg(long, global = true, env = "LOCMAP_REPO", help = "GitHub repository slug (owner/name) used to build commit links")]
    pub repo: Option<String>,

    #[arg(short, long, global = true, help = "Log debug output to stderr")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summary statistics of the log
    Stats {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// One row per commit
    Commits {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(long, value_enum, default_value_t = CommitOrder::FirstSeen, help = "Commit ordering")]
        order: CommitOrder,
    },
    /// Commits up to a point in time, with the per-file composition
    Window {
        #[arg(long, conflicts_with = "progress", help = "Cutoff date (RFC3339, YYYY-MM-DD, or natural language)")]
        until: Option<String>,

        #[arg(
            long,
            allow_negative_numbers = true,
            help = "Slider position from 0 to 100 across the commit history; out-of-range values are clamped"
        )]
        progress: Option<f64>,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Brush a rectangle of the time/hour scatter plot
    Select {
        #[arg(long, help = "Start of the brushed time range")]
        from: String,

        #[arg(long, help = "End of the brushed time range")]
        to: String,

        #[arg(long, default_value = "0-24", help = "Hour range, e.g. 9-17 or 21.5-24")]
        hours: String,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Write the scatter plot as SVG
    Scatter {
        #[arg(long, help = "Output file")]
        svg: PathBuf,
    },
    /// The scroll narrative, one step per commit
    Story {
        #[arg(long, help = "Active step index")]
        step: Option<usize>,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Commits by hour of day
    Hours {
        #[arg(long, value_enum, default_value_t = Chapter::Peak, help = "Story chapter to render")]
        chapter: Chapter,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Project listing with a breakdown by year
    Projects {
        #[arg(long, default_value = "lib/projects.json", help = "Project list (JSON array)")]
        file: PathBuf,

        #[arg(long, help = "Only projects matching this text")]
        query: Option<String>,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Interactive terminal UI
    #[command(alias = "tui")]
    Ui,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        let common = self.common;
        match self.command {
            Commands::Stats { json } => crate::summary::exec(&common, json),
            Commands::Commits { json, ndjson, order } => crate::export::exec(&common, json, ndjson, order),
            Commands::Window { until, progress, json } => {
                crate::timeline::exec(&common, until.as_deref(), progress, json)
            }
            Commands::Select { from, to, hours, json } => {
                crate::scatter::exec_select(&common, &from, &to, &hours, json)
            }
            Commands::Scatter { svg } => crate::scatter::exec_svg(&common, &svg),
            Commands::Story { step, json } => crate::story::exec(&common, step, json),
            Commands::Hours { chapter, json } => crate::hours::exec(&common, chapter, json),
            Commands::Projects { file, query, json } => {
                crate::projects::exec(&file, query.as_deref(), json)
            }
            Commands::Ui => crate::tui::run(&common).map_err(|e| anyhow::anyhow!(e)),
        }
    }
}
