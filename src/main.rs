//! Chemviz CLI
//!
//! Terminal dashboard for the equipment dataset API:
//! - Log in, register, log out
//! - Upload CSV files
//! - Browse recent datasets, summaries, charts and equipment tables
//! - Download PDF reports

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chemviz::api::{ApiClient, DatasetApi, UploadFile};
use chemviz::config::{generate_default_config, Config};
use chemviz::dashboard::{
    Dashboard, DashboardConfig, DashboardEvent, AUTH_FALLBACK, REPORT_FALLBACK, UPLOAD_FALLBACK,
};
use chemviz::model::DatasetId;
use chemviz::render::{self, OutputFormat};
use chemviz::routes::Route;
use chemviz::session::{FileTokenStore, SessionContext};
use chemviz::view::table::Column;

const REFRESH_WAIT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "chemviz")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chemical Equipment Parameter Visualizer")]
#[command(long_about = "Upload equipment CSV files and inspect the resulting datasets.\nCSV columns: Equipment Name, Type, Flowrate, Pressure, Temperature")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL ("/api" is appended when missing)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: search the standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session tokens
    Login {
        username: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account and store the session tokens
    Register {
        username: String,
        #[arg(short, long)]
        password: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the API URL and session state
    Status,

    /// Upload a CSV file
    Upload {
        file: Option<PathBuf>,
    },

    /// List recent datasets
    History,

    /// Show the equipment table of a dataset
    Show {
        id: DatasetId,
        /// Case-insensitive match on name or type
        #[arg(long)]
        filter: Option<String>,
        /// Sort column; repeat to toggle (name, type, flowrate, pressure, temperature)
        #[arg(long)]
        sort: Vec<Column>,
    },

    /// Show summary statistics
    Summary {
        id: DatasetId,
    },

    /// Show charts as text
    Charts {
        id: DatasetId,
    },

    /// Download the PDF report
    Report {
        id: DatasetId,
        /// Directory to write into (default: reports.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch one page of equipment rows
    Equipment {
        id: DatasetId,
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Resolve a dashboard path such as /dataset/3 and show the result
    Open {
        path: String,
    },

    /// Show the whole dashboard
    Dashboard {
        id: Option<DatasetId>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    chemviz::telemetry::init_logging(&config.logging);

    let session = SessionContext::new(Arc::new(FileTokenStore::new(config.session.token_path())));
    let client = Arc::new(ApiClient::new(&config.api, session.clone())?);
    let dashboard = Arc::new(Dashboard::new(
        client.clone(),
        session,
        DashboardConfig {
            report_dir: config.reports.output_path(),
        },
    ));
    let format = cli.format;

    match cli.command {
        Commands::Login { username, password } => {
            let password = password_or_prompt(password)?;
            dashboard
                .login(&username, &password)
                .await
                .map_err(|e| anyhow!(e.user_message(AUTH_FALLBACK)))?;
            println!("Logged in as {}", username);
        }

        Commands::Register {
            username,
            password,
            email,
        } => {
            let password = password_or_prompt(password)?;
            dashboard
                .register(&username, &password, email.as_deref())
                .await
                .map_err(|e| anyhow!(e.user_message(AUTH_FALLBACK)))?;
            println!("Registered and logged in as {}", username);
        }

        Commands::Logout => {
            dashboard.logout()?;
            println!("Logged out");
        }

        Commands::Status => {
            println!("Chemviz v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("API: {}", client.base_url());
            println!(
                "Session: {}",
                if dashboard.is_authenticated() {
                    "logged in"
                } else {
                    "not logged in"
                }
            );
            println!("Reports: {:?}", dashboard.summary_panel().report_dir());
        }

        Commands::Upload { file } => {
            upload(&dashboard, file, format).await?;
        }

        Commands::History => {
            dashboard.refresh_datasets().await;
            let datasets = dashboard.datasets().await;
            print!("{}", render::render_history(&datasets, None, format)?);
        }

        Commands::Show { id, filter, sort } => {
            dashboard.navigate(&Route::Dataset(Some(id))).await;
            let table = dashboard.table_panel();
            if let Some(filter) = filter {
                table.set_filter(filter).await;
            }
            for column in sort {
                table.toggle_sort(column).await;
            }
            table.load(id).await;

            match table.rows().await {
                Some(rows) => print!(
                    "{}",
                    render::render_equipment(&table.headers().await, &rows, format)?
                ),
                None => eprintln!("Dataset {} could not be loaded", id),
            }
        }

        Commands::Summary { id } => {
            let panel = dashboard.summary_panel();
            panel.load(id).await;
            match panel.state().await.ready() {
                Some(summary) => print!("{}", render::render_summary(summary, format)?),
                None => eprintln!("Summary for dataset {} could not be loaded", id),
            }
        }

        Commands::Charts { id } => {
            let panel = dashboard.charts_panel();
            panel.load(id).await;
            match panel.charts().await {
                Some(charts) => print!("{}", render::render_charts(&charts, format)?),
                None => eprintln!("Dataset {} could not be loaded", id),
            }
        }

        Commands::Report { id, output } => {
            let path = match output {
                Some(dir) => {
                    let panel = chemviz::dashboard::SummaryPanel::new(client.clone(), dir);
                    panel.download_report(id).await
                }
                None => dashboard.summary_panel().download_report(id).await,
            }
            .map_err(|e| anyhow!(e.user_message(REPORT_FALLBACK)))?;
            println!("Report saved to {:?}", path);
        }

        Commands::Equipment { id, page } => {
            let result = client
                .get_equipment_page(id, page)
                .await
                .map_err(|e| anyhow!(e.user_message("Request failed")))?;
            print!("{}", render::render_page(&result, page, format)?);
        }

        Commands::Open { path } => {
            let destination = dashboard.navigate(&Route::parse(&path)).await;
            if destination == Route::Login {
                println!("Log in with: chemviz login <username>");
            } else {
                show_dashboard(&dashboard, format).await?;
            }
        }

        Commands::Dashboard { id } => {
            if let Some(id) = id {
                dashboard.navigate(&Route::Dataset(Some(id))).await;
            }
            show_dashboard(&dashboard, format).await?;
        }

        Commands::Config { output } => {
            write_default_config(output.as_ref())?;
        }
    }

    Ok(())
}

async fn upload(
    dashboard: &Arc<Dashboard>,
    file: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let file = match file {
        Some(path) => Some(
            UploadFile::from_path(&path)
                .await
                .with_context(|| format!("Cannot read {:?}", path))?,
        ),
        None => None,
    };

    let mut events = dashboard.subscribe();
    let event_loop = dashboard.spawn_event_loop();

    let result = dashboard.upload(file).await;
    if let Some(status) = dashboard.upload_panel().status().await {
        if status.is_error {
            eprintln!("{}", status.text);
        } else {
            println!("{}", status.text);
        }
    }
    if let Err(e) = result {
        event_loop.abort();
        return Err(anyhow!(e.user_message(UPLOAD_FALLBACK)));
    }

    let refreshed = tokio::time::timeout(REFRESH_WAIT, async {
        while let Ok(event) = events.recv().await {
            if let DashboardEvent::DatasetsRefreshed { .. } = event {
                return true;
            }
        }
        false
    })
    .await
    .unwrap_or(false);
    event_loop.abort();

    if refreshed {
        let datasets = dashboard.datasets().await;
        let active = dashboard.active_dataset().await;
        println!();
        print!("{}", render::render_history(&datasets, active, format)?);
    }
    Ok(())
}

async fn show_dashboard(dashboard: &Dashboard, format: OutputFormat) -> anyhow::Result<()> {
    dashboard.refresh_datasets().await;

    println!("Chemical Equipment Parameter Visualizer");
    println!(
        "{}",
        if dashboard.is_authenticated() {
            "Logged in"
        } else {
            "Not logged in"
        }
    );
    println!();

    let datasets = dashboard.datasets().await;
    let active = dashboard.active_dataset().await;
    print!("{}", render::render_history(&datasets, active, format)?);
    println!();

    let Some(id) = dashboard.load_panels().await else {
        println!("Upload a CSV file to visualize chemical equipment data.");
        println!("CSV columns: Equipment Name, Type, Flowrate, Pressure, Temperature");
        return Ok(());
    };

    match dashboard.summary_panel().state().await.ready() {
        Some(summary) => print!("{}", render::render_summary(summary, format)?),
        None => eprintln!("Summary for dataset {} could not be loaded", id),
    }
    println!();

    if let Some(charts) = dashboard.charts_panel().charts().await {
        print!("{}", render::render_charts(&charts, format)?);
        println!();
    }

    let table = dashboard.table_panel();
    match table.rows().await {
        Some(rows) => {
            println!("Equipment Data");
            print!(
                "{}",
                render::render_equipment(&table.headers().await, &rows, format)?
            );
        }
        None => eprintln!("Dataset {} could not be loaded", id),
    }
    Ok(())
}

fn password_or_prompt(password: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }
    Ok(())
}
