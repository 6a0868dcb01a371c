use clap::{Parser, Subcommand};
use lottery_shared::{attempt_count_from_db, AuditLogEntry, ParticipantView};
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};

#[derive(Parser)]
#[command(name = "lottery-cli", about = "Admin CLI for the lottery server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Database URL, default sqlite://lottery.db
    #[arg(long, value_parser, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// View last N audit log entries
    ViewLogs {
        #[arg(default_value_t = 20)]
        n: i64,
    },
    /// Export the audit log to CSV path
    ExportCsv { path: String },
    /// Show one participant's draw state
    Show { participant_id: String },
    /// List attempt counts of every known participant
    Counts,
    /// Print the hash to publish for a provably fair server seed
    SeedHash { server_seed: String },
}

/// Connects on first use, so commands that never touch the database work without one.
fn get_pool(url: Option<String>) -> anyhow::Result<SqlitePool> {
    let url = url.unwrap_or_else(|| "sqlite://lottery.db".into());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_lazy(&url)?;
    Ok(pool)
}

fn audit_entry(r: &sqlx::sqlite::SqliteRow) -> anyhow::Result<AuditLogEntry> {
    let ts: String = r.get("timestamp");
    Ok(AuditLogEntry {
        id: r.get("id"),
        participant_name: r.get("participant_name"),
        outcome_description: r.get("outcome_description"),
        timestamp: chrono::DateTime::parse_from_rfc3339(&ts)?.with_timezone(&chrono::Utc),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let pool = get_pool(cli.database_url)?;

    match cli.command {
        Commands::ViewLogs { n } => {
            let rows = sqlx::query("SELECT id, participant_name, outcome_description, timestamp FROM audit_log ORDER BY id DESC LIMIT ?")
                .bind(n)
                .fetch_all(&pool).await?;
            for r in &rows {
                let e = audit_entry(r)?;
                println!(
                    "#{:>6} {} {} {}",
                    e.id,
                    lottery_shared::display_timestamp(e.timestamp),
                    e.participant_name,
                    e.outcome_description
                );
            }
        }
        Commands::ExportCsv { path } => {
            let mut wtr = csv::Writer::from_path(&path)?;
            wtr.write_record(["id", "participant_name", "outcome_description", "timestamp"])?;
            let rows = sqlx::query("SELECT id, participant_name, outcome_description, timestamp FROM audit_log ORDER BY id ASC")
                .fetch_all(&pool).await?;
            let total = rows.len();
            for r in &rows {
                let e = audit_entry(r)?;
                wtr.write_record(&[
                    e.id.to_string(),
                    e.participant_name,
                    e.outcome_description,
                    e.timestamp.to_rfc3339(),
                ])?;
            }
            wtr.flush()?;
            println!("Exported {} rows to {}", total, path);
        }
        Commands::Show { participant_id } => {
            let row = sqlx::query("SELECT attempt_count, last_attempt_time, in_pity FROM participant_state WHERE participant_id = ?")
                .bind(&participant_id)
                .fetch_optional(&pool)
                .await?;
            let view = match row {
                Some(r) => ParticipantView {
                    participant_id,
                    attempt_count: attempt_count_from_db(r.get("attempt_count")),
                    last_attempt_ms: r.get("last_attempt_time"),
                    in_pity: r.get("in_pity"),
                },
                None => ParticipantView {
                    participant_id,
                    attempt_count: 0,
                    last_attempt_ms: 0,
                    in_pity: false,
                },
            };
            println!(
                "{} attempts={} last={} pity={}",
                view.participant_id, view.attempt_count, view.last_attempt_ms, view.in_pity
            );
        }
        Commands::Counts => {
            let rows = sqlx::query("SELECT participant_id, attempt_count FROM participant_state ORDER BY participant_id")
                .fetch_all(&pool)
                .await?;
            for r in rows {
                let id: String = r.get("participant_id");
                let count = attempt_count_from_db(r.get("attempt_count"));
                println!("{id}\t{count}");
            }
        }
        Commands::SeedHash { server_seed } => {
            println!("{}", lottery_core::derive_hash_hex(server_seed.as_bytes()));
        }
    }

    pool.close().await;
    Ok(())
}
