use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.0";

/// Size of the chunks used when streaming file contents or CGI output.
pub const CHUNK_SIZE: usize = 8192;

fn serialize_response(resp: &Response) -> BytesMut {
    let mut buf = BytesMut::with_capacity(128 + resp.body.len());

    // Status line
    buf.put_slice(format!("{} {}\r\n", HTTP_VERSION, resp.status).as_bytes());

    for (k, v) in &resp.headers {
        buf.put_slice(k.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
        buf.put_slice(b"\r\n");
    }

    // Header/body separator
    buf.put_slice(b"\r\n");

    buf.put_slice(&resp.body);

    buf
}

pub struct ResponseWriter {
    buffer: BytesMut,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    /// Serialized bytes, including whatever has already been written.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(std::io::ErrorKind::WriteZero.into());
            }

            self.written += n;
        }

        stream.flush().await
    }
}

/// Copies `reader` to `stream` verbatim in `CHUNK_SIZE` pieces until EOF.
///
/// Returns the number of body bytes written.
pub async fn stream_body<R, W>(reader: &mut R, stream: &mut W) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut chunk = BytesMut::with_capacity(CHUNK_SIZE);
    let mut total = 0u64;

    loop {
        chunk.clear();
        let n = reader.read_buf(&mut chunk).await?;
        if n == 0 {
            break;
        }
        stream.write_all(&chunk).await?;
        total += n as u64;
    }

    stream.flush().await?;
    Ok(total)
}
