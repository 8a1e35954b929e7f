//! Line-oriented I/O for the command protocol.
//!
//! [`serve`] reads one command per line and hands it to the
//! [`ProtocolDispatcher`], writing the reply before the next line is read.
//! [`LineWriter`] serializes every outgoing line (responses and
//! notifications) behind one async mutex so the two sources never interleave
//! bytes within a line.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use pilot_core::protocol::{encode_line, LinkStatus, Notification, ProtocolError};

use crate::application::dispatcher::ProtocolDispatcher;

/// Error type for protocol line I/O.
#[derive(Debug, Error)]
pub enum LineIoError {
    /// Reading from the command input failed.
    #[error("failed to read command input: {0}")]
    Read(#[source] std::io::Error),

    /// Writing to the reply output failed.
    #[error("failed to write reply output: {0}")]
    Write(#[source] std::io::Error),

    /// An outgoing message could not be serialized.
    #[error(transparent)]
    Encode(#[from] ProtocolError),
}

/// Shared, line-atomic writer for the protocol output.
pub struct LineWriter<W> {
    inner: Arc<Mutex<W>>,
}

impl<W> Clone for LineWriter<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: AsyncWrite + Unpin + Send + 'static> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    /// Serializes `message` and writes it as one flushed line.
    ///
    /// # Errors
    ///
    /// [`LineIoError::Encode`] if serialization fails, [`LineIoError::Write`]
    /// if the sink fails.
    pub async fn write_message<T: Serialize>(&self, message: &T) -> Result<(), LineIoError> {
        let line = encode_line(message)?;
        let mut writer = self.inner.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(LineIoError::Write)?;
        writer.flush().await.map_err(LineIoError::Write)
    }

    /// Spawns a task that writes a `linkStatus` notification for every status
    /// received on `rx`.  The task ends when every sender is dropped or the
    /// output fails.
    pub fn spawn_notification_forwarder(
        &self,
        mut rx: mpsc::UnboundedReceiver<LinkStatus>,
    ) -> JoinHandle<()> {
        let writer = self.clone();
        tokio::spawn(async move {
            while let Some(status) = rx.recv().await {
                info!(?status, "device link status changed");
                let notification = Notification::link_status(&status);
                if let Err(e) = writer.write_message(&notification).await {
                    error!("failed to write notification: {e}");
                    break;
                }
            }
            debug!("notification forwarder stopped");
        })
    }
}

/// Reads command lines from `reader` until EOF, replying through `writer`.
///
/// Invalid UTF-8 is replaced rather than treated as a read failure, so the
/// line still reaches the decoder and fails there.
///
/// # Errors
///
/// [`LineIoError::Read`] on an input failure and [`LineIoError::Write`] when
/// a reply cannot be written.  The dispatcher is closed in every case.
pub async fn serve<R, W>(
    dispatcher: &mut ProtocolDispatcher,
    mut reader: R,
    writer: &LineWriter<W>,
) -> Result<(), LineIoError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let mut buf = Vec::new();
    let result = loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                info!("command input reached EOF");
                break Ok(());
            }
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                if let Some(response) = dispatcher.handle_line(&line).await {
                    if let Err(e) = writer.write_message(&response).await {
                        break Err(e);
                    }
                }
            }
            Err(e) => {
                warn!("command input failed: {e}");
                break Err(LineIoError::Read(e));
            }
        }
    };
    dispatcher.close();
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────
