//! The half-duplex protocol loop.
//!
//! Contract with the engine:
//! - the readiness sentinel line goes out, flushed, before any input is read
//! - each input line produces exactly one reply line, flushed immediately
//! - an empty read is end-of-stream: return cleanly, emit nothing further
//! - a line that does not decode is fatal; there is no partial-line recovery
//!
//! The loop is generic over its endpoints so tests can drive it with
//! in-memory buffers; the runner binds it to stdin/stdout.

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::harness::{self, BotSession, HarnessConfig};
use crate::view::decode_view;
use crate::wire::ready_line;

pub async fn run<R, W>(
    session: &mut BotSession,
    cfg: &HarnessConfig,
    mut input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut handshake = ready_line();
    handshake.push('\n');
    output
        .write_all(handshake.as_bytes())
        .await
        .context("write ready sentinel")?;
    output.flush().await.context("flush ready sentinel")?;

    let mut line = String::new();
    loop {
        line.clear();
        let n = input
            .read_line(&mut line)
            .await
            .context("read tick view")?;
        if n == 0 {
            tracing::info!("transport.eof clean shutdown");
            return Ok(());
        }

        let view = decode_view(line.trim_end())?;
        let reply = harness::tick(session, &view, cfg).await?;

        let mut out = serde_json::to_string(&reply).context("encode tick reply")?;
        out.push('\n');
        output
            .write_all(out.as_bytes())
            .await
            .context("write tick reply")?;
        output.flush().await.context("flush tick reply")?;
    }
}
