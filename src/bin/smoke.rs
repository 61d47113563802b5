//! Manual smoke test against a running backend.
//!
//! Checks that the server answers, reports which relay settings are
//! present in the environment, and pushes one test submission through
//! `POST /api/contact`. Point it at a non-default deployment with
//! `PORTFOLIO_SMOKE_URL`.

use std::time::Duration;

use anyhow::Context;
use console::style;
use portfolio_backend::handlers::ApiResponse;
use serde_json::json;

const RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url = std::env::var("PORTFOLIO_SMOKE_URL")
        .unwrap_or_else(|_| "http://localhost:5000".to_string());
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .context("failed to build HTTP client")?;

    println!("Smoke-testing {base_url}\n");

    if !check_server(&client, &base_url).await {
        println!(
            "\n{} Server is not running. Start it first with: cargo run",
            style("✗").red()
        );
        std::process::exit(1);
    }

    let config_ok = check_config();
    let contact_ok = check_contact_form(&client, &base_url).await;

    println!("\nSummary:");
    report("Server reachable", true);
    report("Relay settings", config_ok);
    report("Contact form", contact_ok);

    Ok(())
}

/// Poll `GET /` until the server answers or the retries run out.
async fn check_server(client: &reqwest::Client, base_url: &str) -> bool {
    println!("Checking server status...");
    for attempt in 1..=RETRIES {
        match client.get(base_url).send().await {
            Ok(_) => {
                println!("{} Server is running", style("✓").green());
                return true;
            }
            Err(err) if attempt < RETRIES => {
                println!(
                    "Server not responding ({err}), retrying in {}s... ({attempt}/{RETRIES})",
                    RETRY_DELAY.as_secs()
                );
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(err) => {
                println!("{} {err}", style("✗").red());
            }
        }
    }
    false
}

/// Report which relay settings are visible in this environment. The server
/// process reads the same variables, so absences here usually explain
/// delivery failures.
fn check_config() -> bool {
    println!("\nRelay settings:");
    let mut ok = true;
    for (var, secret) in [
        ("PORTFOLIO_SMTP__HOST", false),
        ("PORTFOLIO_SMTP__PORT", false),
        ("PORTFOLIO_SMTP__SENDER", false),
        ("PORTFOLIO_SMTP__PASSWORD", true),
    ] {
        match std::env::var(var) {
            Ok(value) if secret => println!("  {var}: present ({} chars)", value.len()),
            Ok(value) => println!("  {var}: {value}"),
            Err(_) => {
                println!("  {var}: {}", style("missing").yellow());
                if var.ends_with("SENDER") || var.ends_with("PASSWORD") {
                    ok = false;
                }
            }
        }
    }
    ok
}

/// Push one test submission through the endpoint.
async fn check_contact_form(client: &reqwest::Client, base_url: &str) -> bool {
    let payload = json!({
        "name": "Test User",
        "email": "test@example.com",
        "subject": "Test Message",
        "message": "This is a test message",
    });

    let result = async {
        let response = client
            .post(format!("{base_url}/api/contact"))
            .json(&payload)
            .send()
            .await?;
        response.json::<ApiResponse>().await
    }
    .await;

    match result {
        Ok(body) if body.success => {
            println!("\n{} Contact form: email relayed", style("✓").green());
            true
        }
        Ok(body) => {
            println!(
                "\n{} Contact form failed: {}",
                style("✗").red(),
                body.error.unwrap_or_else(|| "unknown error".to_string())
            );
            false
        }
        Err(err) => {
            println!("\n{} Contact form request error: {err}", style("✗").red());
            false
        }
    }
}

fn report(name: &str, ok: bool) {
    let mark = if ok {
        style("✓").green()
    } else {
        style("✗").red()
    };
    println!("  {mark} {name}");
}
