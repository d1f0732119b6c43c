//! stdio transport for the MCP server.
//!
//! - Messages are UTF-8 encoded JSON-RPC, one per line
//! - Messages must not contain embedded newlines
//! - stdin carries client messages, stdout carries replies
//! - stderr is reserved for logging

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::mcp::protocol::OutgoingMessage;

/// A newline-delimited JSON-RPC transport over an async reader and writer.
///
/// [`StdioTransport::stdio`] builds the transport the server normally uses;
/// tests can plug in in-memory buffers instead.
pub struct StdioTransport<R, W> {
    reader: R,
    writer: W,
}

impl StdioTransport<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Creates a transport over the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a transport over the given reader and writer.
    pub const fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Reads the next message line.
    ///
    /// Returns `None` once the input is closed (EOF).
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Some(line))
    }

    /// Writes a reply, serialised to JSON and terminated with a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_message(&mut self, message: &OutgoingMessage) -> io::Result<()> {
        let json = serde_json::to_string(message)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        debug_assert!(
            !json.contains('\n'),
            "JSON message must not contain embedded newlines"
        );

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        Ok(())
    }

    /// Consumes the transport and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::{JsonRpcError, JsonRpcResponse, RequestId};

    #[tokio::test]
    async fn reads_lines_and_strips_endings() {
        let input: &[u8] = b"first\r\nsecond\nthird";
        let mut transport = StdioTransport::new(input, Vec::new());

        assert_eq!(transport.read_line().await.unwrap().as_deref(), Some("first"));
        assert_eq!(transport.read_line().await.unwrap().as_deref(), Some("second"));
        assert_eq!(transport.read_line().await.unwrap().as_deref(), Some("third"));
        assert_eq!(transport.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn writes_one_line_per_message() {
        let input: &[u8] = b"";
        let mut transport = StdioTransport::new(input, Vec::new());

        let response = JsonRpcResponse::success(
            RequestId::Number(1),
            serde_json::json!({
                "message": "hello\nworld",
                "nested": {"key": "value"}
            }),
        );
        transport.write_message(&response.into()).await.unwrap();
        transport
            .write_message(&JsonRpcError::parse_error().into())
            .await
            .unwrap();

        let written = String::from_utf8(transport.into_writer()).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(r#""id":1"#));
        assert!(lines[1].contains("-32700"));
    }
}
