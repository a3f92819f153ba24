//! Line-delimited JSON requests from stdin.
//!
//! Each non-blank line is one request, for example
//! `{"op":"attack","attacker":1,"target":2,"skill":"Sword","delay_ms":250}`.
//! Lines starting with `#` are comments.
use std::io::BufRead;
use std::time::Duration;

use mechanics_runtime::{OperationRequest, RuntimeError, RuntimeHandle};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

const LINE_BUFFER: usize = 32;

#[derive(Debug, Deserialize)]
struct ScheduledRequest {
    #[serde(default)]
    delay_ms: u64,
    #[serde(flatten)]
    request: OperationRequest,
}

fn parse_line(line: &str) -> Option<Result<ScheduledRequest, serde_json::Error>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(serde_json::from_str(line))
}

/// Forwards stdin requests to the runtime until stdin closes or the runtime
/// stops.
pub async fn run_stdin(handle: RuntimeHandle) {
    let (line_tx, mut line_rx) = mpsc::channel::<String>(LINE_BUFFER);

    // Blocking reads stay off the async workers.
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    while let Some(line) = line_rx.recv().await {
        let scheduled = match parse_line(&line) {
            None => continue,
            Some(Ok(scheduled)) => scheduled,
            Some(Err(error)) => {
                warn!(target: "server::input", %error, "ignoring malformed request");
                continue;
            }
        };

        let delay = Duration::from_millis(scheduled.delay_ms);
        match handle.submit(scheduled.request, delay).await {
            Ok(submitted) => {
                info!(
                    target: "server::input",
                    id = %submitted.id,
                    operation = submitted.operation,
                    "request scheduled"
                );
            }
            Err(RuntimeError::Rejected(error)) => {
                warn!(target: "server::input", %error, "request rejected");
            }
            Err(error) => {
                warn!(target: "server::input", %error, "runtime unavailable, input closed");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mechanics_core::{CreatureId, SkillType};

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        assert!(parse_line("   ").is_none());
        assert!(parse_line("# warm-up").is_none());
    }

    #[test]
    fn request_with_delay_parses() {
        let scheduled = parse_line(
            r#"{"op":"attack","attacker":1,"target":2,"skill":"Sword","delay_ms":250}"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(scheduled.delay_ms, 250);
        assert!(matches!(
            scheduled.request,
            OperationRequest::Attack {
                attacker: CreatureId(1),
                target: CreatureId(2),
                skill: SkillType::Sword,
            }
        ));
    }

    #[test]
    fn delay_defaults_to_zero() {
        let scheduled = parse_line(r#"{"op":"update_awareness","observer":3}"#)
            .unwrap()
            .unwrap();

        assert_eq!(scheduled.delay_ms, 0);
    }

    #[test]
    fn unknown_operation_is_an_error() {
        assert!(parse_line(r#"{"op":"teleport","who":1}"#).unwrap().is_err());
    }
}
