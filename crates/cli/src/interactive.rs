use anyhow::Context;
use empathy_engine_core::engine::EmpathyEngine;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Reads one line of text, speaks it and reports where the audio went.
pub async fn run<R, W>(engine: &EmpathyEngine, mut input: R, mut out: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    out.write_all(b"The Empathy Engine - CLI Mode\nEnter your text: ")
        .await?;
    out.flush().await?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .await
        .context("failed to read text from stdin")?;
    let text = line.trim();
    if text.is_empty() {
        out.write_all(b"No text provided.\n").await?;
        return Ok(());
    }

    out.write_all(b"Analyzing emotion and generating speech...\n")
        .await?;
    out.flush().await?;
    let outcome = engine.speak(text).await?;
    let report = format!(
        "Detected emotion: {} ({} intensity)\nAudio saved to: {}\n",
        outcome.emotion,
        outcome.intensity,
        outcome.path.display()
    );
    out.write_all(report.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}
