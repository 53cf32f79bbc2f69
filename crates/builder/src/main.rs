use std::{path::PathBuf, str::FromStr};

use anyhow::{Context, bail};
use builder::{
    client::ReportClient,
    debounce::Debouncer,
    session::{BuilderSession, BuilderState},
};
use clap::{Parser, Subcommand};
use services::services::custom_report::{ReportEntity, ReportFormat};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "builder", about = "Build custom field-sales reports")]
struct Cli {
    /// Report server base URL
    #[arg(long, env = "REPORT_SERVER_URL", default_value = "http://127.0.0.1:3001")]
    server: String,
    /// Company the reports are scoped to
    #[arg(long, env = "REPORT_COMPANY_ID")]
    company: Uuid,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List reportable tables and their columns
    Tables,
    /// Preview up to ten rows of one table
    Preview {
        #[arg(long)]
        table: String,
        #[arg(long = "column", required = true)]
        columns: Vec<String>,
    },
    /// Download columns from any tables as xlsx or csv
    Export {
        #[arg(long)]
        format: ReportFormat,
        /// `table.column`, repeatable
        #[arg(long = "column", required = true)]
        columns: Vec<String>,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::logging::init();
    let cli = Cli::parse();
    let client = ReportClient::new(&cli.server, cli.company);

    match cli.command {
        Command::Tables => {
            for table in client.tables().await? {
                println!("{} ({})", table.id, table.title);
                println!("  {}", table.columns.join(", "));
            }
        }
        Command::Preview { table, columns } => {
            let entity = parse_entity(&table)?;
            let mut session = BuilderSession::new();
            session.select_entity(entity)?;
            preview(&client, &mut session, &columns).await?;
        }
        Command::Export {
            format,
            columns,
            out,
        } => {
            let mut session = BuilderSession::new();
            for column in &columns {
                let (table, column) = column
                    .split_once('.')
                    .with_context(|| format!("expected table.column, got {column:?}"))?;
                let entity = parse_entity(table)?;
                if entity.table().column(column).is_none() {
                    bail!("{table} has no column {column:?}");
                }
                if session.selection().is_checked(entity, column) {
                    continue;
                }
                if session.state().active_entity() != Some(entity) {
                    session.select_entity(entity)?;
                }
                session.toggle(column)?;
            }

            let request = session.begin_export(format)?;
            let result = client.export(&request).await;
            session.finish_export();
            let download = result?;

            let path = out.join(&download.filename);
            tokio::fs::write(&path, &download.bytes)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = download.bytes.len(), "Report saved");
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn parse_entity(table: &str) -> anyhow::Result<ReportEntity> {
    ReportEntity::from_str(table).with_context(|| format!("unknown report table {table:?}"))
}

/// Tick `columns` one by one, letting the debouncer collapse the resulting
/// fetches into one, then print the preview. A failed preview is retried once.
async fn preview(
    client: &ReportClient,
    session: &mut BuilderSession,
    columns: &[String],
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut debouncer = Debouncer::default();

    for column in columns {
        let already_checked = session
            .state()
            .active_entity()
            .is_some_and(|entity| session.selection().is_checked(entity, column));
        if already_checked || !session.toggle(column)? {
            continue;
        }
        let Some(ticket) = session.preview_ticket() else {
            continue;
        };
        let client = client.clone();
        let tx = tx.clone();
        debouncer.schedule(async move {
            let result = client
                .preview(&ticket.request)
                .await
                .map_err(|err| err.to_string());
            let _ = tx.send((ticket.generation, result));
        });
    }
    drop(tx);

    let Some((generation, result)) = rx.recv().await else {
        bail!("none of the given columns exist on this table");
    };
    session.apply_preview(generation, result);

    if let BuilderState::PreviewFailed { message, .. } = session.state() {
        eprintln!("preview failed: {message}; retrying");
        let ticket = session.retry_preview()?;
        let result = client
            .preview(&ticket.request)
            .await
            .map_err(|err| err.to_string());
        session.apply_preview(ticket.generation, result);
    }

    match session.state() {
        BuilderState::PreviewReady { table, .. } => {
            println!("{table}");
            Ok(())
        }
        BuilderState::PreviewFailed { message, .. } => bail!("preview failed: {message}"),
        state => bail!("unexpected builder state: {state:?}"),
    }
}
