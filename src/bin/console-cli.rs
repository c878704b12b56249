use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "console-cli")]
#[command(about = "Init-check CLI for the Console API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the v1 health endpoint
    Health,
    /// Show which hosts the write and read pools reach
    Hosts,
    /// Insert a probe row through the write pool
    Write {
        /// Note stored alongside the probe row
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Read a probe row back through the read pool
    Read { id: String },
    /// Report replica lag
    Lag,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client
                .get(format!("{}/api/v1/health", cli.url))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Hosts => {
            let res = client
                .get(format!("{}/api/_init/mysql/hosts", cli.url))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Write { note } => {
            let mut body = serde_json::Map::new();
            if let Some(note) = note {
                body.insert("note".to_string(), Value::String(note));
            }
            let res = client
                .post(format!("{}/api/_init/mysql/write", cli.url))
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Read { id } => {
            let res = client
                .get(format!("{}/api/_init/mysql/read/{}", cli.url, id))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Lag => {
            let res = client
                .get(format!("{}/api/_init/mysql/lag", cli.url))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
