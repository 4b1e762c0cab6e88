//! The session stream: connect, serve, reconnect — forever.

use std::io;
use std::time::Duration;

use prost::Message;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{error, info, warn};

use proverd_proto as proto;

use crate::{Dispatcher, SessionError};

/// Frames larger than this are rejected before the payload is allocated.
const MAX_FRAME_LEN: u32 = 64 * 1024 * 1024;

/// Reconnection policy: a fixed delay between attempts, unbounded attempts,
/// no backoff growth, no jitter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::with_delay(Duration::from_secs(5))
    }
}

/// Owns the connection to the orchestrator for the life of the process.
///
/// The loop is strictly request-then-response: exactly one message is in
/// flight at a time on a given stream, even though the transport is readable
/// and writable in both directions.
pub struct StreamSession {
    addr: String,
    dispatcher: Dispatcher,
    retry: RetryPolicy,
}

impl StreamSession {
    pub fn new(addr: impl Into<String>, dispatcher: Dispatcher, retry: RetryPolicy) -> Self {
        Self {
            addr: addr.into(),
            dispatcher,
            retry,
        }
    }

    /// Run the session until the process exits.
    ///
    /// Transport failures (connect, read or write) are logged and retried
    /// after the fixed delay. Jobs already admitted to the registry are
    /// unaffected by a broken stream. The only way out is an unrecoverable
    /// registry error.
    pub async fn run(self) -> Result<(), SessionError> {
        loop {
            match TcpStream::connect(&self.addr).await {
                Ok(stream) => {
                    info!(addr = %self.addr, "Connected to orchestrator");

                    match self.serve(stream).await {
                        Err(SessionError::Registry(e)) => {
                            error!(error = %e, "Registry failure, shutting the session down");
                            return Err(SessionError::Registry(e));
                        }
                        Err(e) => warn!(error = %e, "Stream broken"),
                        Ok(()) => {}
                    }
                }
                Err(e) => {
                    warn!(addr = %self.addr, error = %e, "Failed to connect to orchestrator");
                }
            }

            info!(delay = ?self.retry.delay, "Retrying connection after delay");
            tokio::time::sleep(self.retry.delay).await;
        }
    }

    /// Serve one established stream: block for the next command, dispatch
    /// it, write the paired response, repeat until the transport fails.
    async fn serve(&self, mut stream: TcpStream) -> Result<(), SessionError> {
        loop {
            let request: proto::OrchestratorMessage = read_frame(&mut stream).await?;
            let response = self.dispatcher.dispatch(request)?;
            write_frame(&mut stream, &response).await?;
        }
    }
}

/// Read one length-prefixed protobuf frame.
pub async fn read_frame<M, R>(reader: &mut R) -> Result<M, SessionError>
where
    M: Message + Default,
    R: AsyncRead + Unpin,
{
    let len = reader.read_u32().await?;
    if len > MAX_FRAME_LEN {
        return Err(SessionError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame of {len} bytes exceeds the {MAX_FRAME_LEN} byte limit"),
        )));
    }

    let mut buf = vec![0; len as usize];
    reader.read_exact(&mut buf).await?;

    Ok(M::decode(buf.as_slice())?)
}

/// Write one length-prefixed protobuf frame.
pub async fn write_frame<M, W>(writer: &mut W, message: &M) -> Result<(), SessionError>
where
    M: Message,
    W: AsyncWrite + Unpin,
{
    let bytes = message.encode_to_vec();
    writer.write_u32(bytes.len() as u32).await?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;

    Ok(())
}
