//! Console loop: one turn per input line, strictly in order.

use crate::adapter::ConsoleAdapter;
use anyhow::Result;
use handler_chain::HandlerChain;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{error, info, instrument};

/// Reads stdin until EOF, running the chain for each line.
pub async fn listen(adapter: Arc<ConsoleAdapter>, chain: HandlerChain) -> Result<()> {
    listen_on(adapter, chain, BufReader::new(tokio::io::stdin())).await
}

/// Same as [`listen`] over any line source. A failed turn is printed to the error sink and the loop goes on.
#[instrument(skip(adapter, chain, reader))]
pub async fn listen_on<R>(adapter: Arc<ConsoleAdapter>, chain: HandlerChain, reader: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    info!(handlers = chain.len(), "step: console listening");
    let mut lines = reader.lines();
    let mut processed = 0usize;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end_matches('\r');
        if let Err(e) = adapter.process_line(line, &chain).await {
            error!(error = %e, "Console turn failed");
            adapter.print_error(&e.to_string());
        }
        processed += 1;
    }
    info!(processed, "step: console input closed");
    Ok(())
}
