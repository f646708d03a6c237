//! Serializes and writes HTTP responses to the client.

use crate::http::response::Response;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const FILE_CHUNK_SIZE: usize = 8192;

/// Writes one serialized response, then an optional file payload.
///
/// The file path is used by the static responder: headers go out first with
/// the Content-Length already set to the file size, then the file contents
/// are streamed from disk without ever entering the response body buffer.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
    file: Option<PathBuf>,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: response.serialize(),
            written: 0,
            file: None,
        }
    }

    /// Attach a file whose contents are streamed after the headers.
    pub fn with_file(mut self, path: PathBuf) -> Self {
        self.file = Some(path);
        self
    }

    pub async fn write_to_stream(&mut self, stream: &mut TcpStream) -> anyhow::Result<()> {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        if let Some(path) = self.file.take() {
            let mut file = File::open(&path).await?;
            let mut chunk = vec![0u8; FILE_CHUNK_SIZE];

            loop {
                let n = file.read(&mut chunk).await?;
                if n == 0 {
                    break;
                }
                stream.write_all(&chunk[..n]).await?;
            }
        }

        stream.flush().await?;
        Ok(())
    }
}
