//! Health command - checks a running chainpad server.

use std::time::{Duration, Instant};

use chainpad::server::HealthResponse;

use crate::cli::HealthArgs;

/// What the health check found.
enum Status {
    Healthy { latency: Duration },
    Unhealthy(String),
}

async fn check(url: &str, timeout: Duration) -> Result<Status, Box<dyn std::error::Error>> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let started = Instant::now();

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => {
            return Ok(Status::Unhealthy(format!("no answer from {url} within {timeout:?}")));
        }
        Err(e) => return Ok(Status::Unhealthy(format!("failed to connect to {url}: {e}"))),
    };

    let status = response.status();
    if !status.is_success() {
        return Ok(Status::Unhealthy(format!("server returned HTTP {status}")));
    }

    match response.json::<HealthResponse>().await {
        Ok(body) if body.is_healthy() => Ok(Status::Healthy {
            latency: started.elapsed(),
        }),
        Ok(body) => Ok(Status::Unhealthy(format!("server reports '{}'", body.status))),
        Err(e) => Ok(Status::Unhealthy(format!("unreadable health body: {e}"))),
    }
}

/// Run the health command; exits non-zero when the server is not healthy.
pub async fn run(args: &HealthArgs) -> Result<(), Box<dyn std::error::Error>> {
    let url = format!("http://{}:{}/health", args.host, args.port);
    tracing::debug!(%url, "Checking server health");

    match check(&url, Duration::from_secs(args.timeout)).await? {
        Status::Healthy { latency } => {
            println!("healthy ({} ms)", latency.as_millis());
            Ok(())
        }
        Status::Unhealthy(reason) => {
            eprintln!("unhealthy: {reason}");
            std::process::exit(1);
        }
    }
}
