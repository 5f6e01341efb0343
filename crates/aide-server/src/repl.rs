//! Interactive chat loop over stdin.

use aide_core::DispatchOutcome;
use aide_dispatch::Dispatcher;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::error;

/// Render one outcome as the lines shown to the user.
pub fn render_outcome(assistant_name: &str, outcome: &DispatchOutcome) -> String {
    let mut out = String::new();
    for result in &outcome.automations_run {
        let mark = if result.success { "ok" } else { "failed" };
        out.push_str(&format!("[{} {}] {}", result.category, mark, result.argument));
        if let Some(message) = &result.message {
            out.push_str(&format!(": {}", message));
        }
        out.push('\n');
    }
    for line in &outcome.unrecognized {
        out.push_str(&format!("[skipped] {}\n", line));
    }
    if let Some(reply) = &outcome.conversational_reply {
        out.push_str(&format!("{}: {}\n", assistant_name, reply));
    }
    out
}

/// Read instructions line by line until EOF or an exit request.
pub async fn run<R, W>(dispatcher: &Dispatcher, assistant_name: &str, input: R, mut output: W) -> std::io::Result<()>
where
    R: tokio::io::AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(input).lines();

    output.write_all(b"> ").await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let instruction = line.trim();
        if instruction.is_empty() {
            output.write_all(b"> ").await?;
            output.flush().await?;
            continue;
        }

        match dispatcher.dispatch(instruction).await {
            Ok(outcome) => {
                output.write_all(render_outcome(assistant_name, &outcome).as_bytes()).await?;
                if outcome.should_exit {
                    output.flush().await?;
                    return Ok(());
                }
            }
            Err(e) => {
                error!(error = %e, "Dispatch failed");
                output.write_all(format!("Error: {}\n", e).as_bytes()).await?;
            }
        }

        output.write_all(b"> ").await?;
        output.flush().await?;
    }

    Ok(())
}
