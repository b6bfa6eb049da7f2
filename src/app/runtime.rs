use crate::app::{render_response, Application};
use crate::error::{LogscopeError, Result};
use crate::input::parse_command;
use crate::render::protocol::{RequestId, SearchCommand};
use crate::render::render_error;
use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Capacity of the command and response channels
const CHANNEL_CAPACITY: usize = 16;

/// Read commands line-by-line and write each reply as it becomes available.
///
/// Searches run concurrently on the background worker, so replies to different commands
/// can interleave in completion order. Returns once input is exhausted and every
/// accepted command has been answered.
pub async fn run_command_loop<R, W>(app: &Application, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (cmd_tx, mut resp_rx, worker) = app.spawn_worker(CHANNEL_CAPACITY);
    let mut lines = input.lines();
    let mut next_request: RequestId = 0;
    let mut pending = 0usize;
    let mut input_open = true;

    while input_open || pending > 0 {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    continue;
                };
                match parse_command(&line) {
                    Ok(Some(query)) => {
                        next_request += 1;
                        cmd_tx
                            .send(SearchCommand::ExecuteSearch { request_id: next_request, query })
                            .await
                            .map_err(|_| LogscopeError::search("Search worker stopped"))?;
                        pending += 1;
                    }
                    Ok(None) => debug!("Ignoring non-command input"),
                    Err(invalid) => {
                        write_messages(&mut output, &[render_error(&LogscopeError::from(invalid))]).await?;
                    }
                }
            }
            Some(response) = resp_rx.recv(), if pending > 0 => {
                pending -= 1;
                debug!("Request {} answered", response.request_id());
                write_messages(&mut output, &render_response(&response)).await?;
            }
            else => break,
        }
    }

    // The worker exits once it sees Shutdown; a send failure means it is already gone
    let _ = cmd_tx.send(SearchCommand::Shutdown).await;
    worker
        .await
        .map_err(|e| LogscopeError::search(format!("Search worker panicked: {e}")))?;
    output.flush().await?;
    Ok(())
}

/// Write each message followed by a blank line
async fn write_messages<W: AsyncWrite + Unpin>(output: &mut W, messages: &[String]) -> Result<()> {
    for message in messages {
        output.write_all(message.as_bytes()).await?;
        output.write_all(b"\n\n").await?;
    }
    output.flush().await?;
    Ok(())
}
