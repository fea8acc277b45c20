//! Ask the oracle once from the command line and print the JSON response.
//!
//! ```text
//! cargo run --bin ask -- "ho paura del futuro"
//! ```

use oracolo::{OracleConfig, OracleService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let question = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if question.trim().is_empty() {
        anyhow::bail!("usage: ask <question>");
    }

    let cfg = OracleConfig::load()?;
    let oracle = OracleService::from_config(&cfg)?;
    let consultation = oracle.consult(&question).await?;

    println!("{}", serde_json::to_string_pretty(&consultation.response)?);
    eprintln!("source: {}", consultation.source);
    Ok(())
}
