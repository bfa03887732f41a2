//! athena-query — command-line client for the Athena adapter.
//!
//! Connects with an `athena://` URL and runs one host operation:
//! - `query <sql>` — execute a statement and print the rows
//! - `columns <schema> <table>` — list a table's columns
//! - `structure` — list schemas with their tables and views
//! - `helpers <schema> <table>` — print the canned browse statements

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use quarry_athena::Athena;
use quarry_core::{
    collect_rows, render_table, Adapter, Driver, QueryContext, Structure, StructureType, TableOptions,
    Value,
};

// ── CLI ─────────────────────────────────────────────────────────────

/// Run queries and browse metadata on AWS Athena.
#[derive(Parser, Debug)]
#[command(name = "athena-query", version, about)]
struct Cli {
    /// Connection URL, e.g. athena://eu-central-1?work_group=primary
    #[arg(long, env = "ATHENA_URL")]
    url: String,

    /// Query deadline in seconds (0 = none).
    #[arg(long, env = "ATHENA_QUERY_TIMEOUT", default_value_t = 0)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a statement and print the result rows.
    Query { sql: String },
    /// List the columns of a table.
    Columns { schema: String, table: String },
    /// List schemas with their tables and views.
    Structure,
    /// Print canned browse statements for a table.
    Helpers { schema: String, table: String },
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let athena = Athena::new();

    if let Command::Helpers { schema, table } = &cli.command {
        let helpers = athena.helpers(&TableOptions::new(schema, table));
        let mut names: Vec<&String> = helpers.keys().collect();
        names.sort();
        for name in names {
            println!("{name}: {}", helpers[name]);
        }
        return Ok(());
    }

    let mut driver = athena.connect(&cli.url).await?;

    let outcome = match &cli.command {
        Command::Query { sql } => {
            let ctx = if cli.timeout > 0 {
                QueryContext::with_timeout(Duration::from_secs(cli.timeout))
            } else {
                QueryContext::background()
            };

            // Ctrl-C stops the running query instead of killing the process.
            let watcher = {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        ctx.cancel();
                    }
                })
            };

            let result = async {
                let mut stream = driver.query(&ctx, sql).await?;
                let rows = collect_rows(stream.as_mut()).await?;
                print!("{}", render_table(stream.header(), &rows));
                info!(rows = rows.len(), "query finished");
                Ok::<_, quarry_core::Error>(())
            }
            .await;
            watcher.abort();
            result
        }
        Command::Columns { schema, table } => driver
            .columns(&TableOptions::new(schema, table))
            .await
            .map(|columns| {
                let header = vec!["column".to_string(), "type".to_string()];
                let rows: Vec<Vec<Value>> = columns
                    .into_iter()
                    .map(|c| vec![Value::Text(c.name), Value::Text(c.data_type)])
                    .collect();
                print!("{}", render_table(&header, &rows));
            }),
        Command::Structure => driver.structure().await.map(|tree| print_tree(&tree)),
        Command::Helpers { .. } => Ok(()),
    };

    driver.close().await;
    outcome?;
    Ok(())
}

fn print_tree(tree: &[Structure]) {
    for schema in tree {
        println!("{}", schema.name);
        for child in &schema.children {
            let kind = match child.kind {
                StructureType::Table => "table",
                StructureType::View => "view",
                StructureType::None => "unknown",
            };
            println!("  {} ({kind})", child.name);
        }
    }
}
