//! Interactive display: print the report, then wait for the operator

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use wobs_core::{ReportStyle, Sink};

use crate::SinkError;

pub const ACK_PROMPT: &str = "Enter any key to escape...";

pub struct ConsoleSink<W, R> {
    out: W,
    input: R,
}

impl ConsoleSink<tokio::io::Stdout, BufReader<tokio::io::Stdin>> {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdout(), BufReader::new(tokio::io::stdin()))
    }
}

impl<W, R> ConsoleSink<W, R>
where
    W: AsyncWrite + Unpin + Send,
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(out: W, input: R) -> Self {
        Self { out, input }
    }

    pub fn into_parts(self) -> (W, R) {
        (self.out, self.input)
    }
}

#[async_trait::async_trait]
impl<W, R> Sink for ConsoleSink<W, R>
where
    W: AsyncWrite + Unpin + Send,
    R: AsyncBufRead + Unpin + Send,
{
    fn name(&self) -> &str {
        "console"
    }

    fn style(&self) -> ReportStyle {
        ReportStyle::Plain
    }

    async fn deliver(&mut self, report: &str) -> Result<()> {
        self.out
            .write_all(report.as_bytes())
            .await
            .map_err(SinkError::from)?;
        if !report.ends_with('\n') {
            self.out.write_all(b"\n").await.map_err(SinkError::from)?;
        }
        self.out
            .write_all(ACK_PROMPT.as_bytes())
            .await
            .map_err(SinkError::from)?;
        self.out.flush().await.map_err(SinkError::from)?;

        // EOF counts as an acknowledgment so piped stdin does not hang the run.
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .await
            .map_err(SinkError::from)?;
        Ok(())
    }
}
