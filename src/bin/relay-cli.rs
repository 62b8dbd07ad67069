use clap::{Parser, Subcommand};
use serde_json::Value;

use repo_relay::normalize::FileContent;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Command-line client for a running repo-relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check relay health
    Health,
    /// List the files of a repository
    Snapshot {
        project_id: String,
    },
    /// Show one file of a repository
    File {
        project_id: String,
        path: String,
        /// Print only the file content
        #[arg(long)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Snapshot { project_id } => {
            let res = client
                .get(format!("{}/api/repo-snapshot", base))
                .query(&[("project_id", project_id.as_str())])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::File { project_id, path, raw } => {
            let res = client
                .get(format!("{}/api/file", base))
                .query(&[("project_id", project_id.as_str()), ("path", path.as_str())])
                .send()
                .await?;
            if raw && res.status().is_success() {
                let file: FileContent = res.json().await?;
                print!("{}", file.content);
            } else {
                print_response(res).await?;
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
