//! Instruction Fetch Example
//!
//! Fetches the current instructions for one robot and prints them.
//!
//! To run this example:
//! ```
//! ROBOT_SERVER_BASE_URL=http://10.7.5.118:8000 \
//!     cargo run --example fetch_instructions -- 255f30bc-46f7-41d4-ba1d-db76a0afd7f7
//! ```

use anyhow::Context;
use uuid::Uuid;

use robot_client_sdk::{ErrorKind, InstructionClient, RetryConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let robot_id = match std::env::args().nth(1) {
        Some(arg) => Uuid::parse_str(&arg).with_context(|| format!("invalid robot id: {}", arg))?,
        None => {
            let id = Uuid::new_v4();
            println!("No robot id given, using random id {}", id);
            id
        }
    };

    // Base URL and paths come from ROBOT_SERVER_* variables, a short retry
    // budget rides over a restarting server
    let client = InstructionClient::builder()
        .from_env()
        .retry(RetryConfig::with_max_retries(2))
        .build()?;

    println!("Fetching instructions from {}...", client.config().base_url);

    match client.fetch_instructions(robot_id).await {
        Ok(blocks) if blocks.is_empty() => println!("No instructions yet for robot {}", robot_id),
        Ok(blocks) => {
            println!("\nInstructions for robot {}:", robot_id);
            for (i, block) in blocks.iter().enumerate() {
                println!("  {}. block {}", i + 1, block);
            }
        }
        Err(e) => {
            let hint = match e.kind() {
                ErrorKind::Transport => "is the server running?",
                ErrorKind::Server => "the server rejected the request",
                ErrorKind::Parse => "the server answered with an unexpected body",
                _ => "check the client configuration",
            };
            eprintln!("Fetch failed ({}): {}", hint, e);
            std::process::exit(1);
        }
    }

    Ok(())
}
