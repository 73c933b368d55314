use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

/// A source of human lines.
#[async_trait]
pub trait InputSource: Send {
    /// Next line without its terminator, or `None` at end of input.
    async fn next_line(&mut self) -> std::io::Result<Option<String>>;
}

/// Line reader over any buffered async reader.
///
/// Accepts `\n` and `\r\n` terminators. Bytes that are not valid UTF-8
/// are replaced with U+FFFD instead of failing the read.
pub struct LineInput<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl LineInput<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> InputSource for LineInput<R> {
    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
            return Ok(None);
        }

        let mut line = self.buf.as_slice();
        if let Some(rest) = line.strip_suffix(b"\n") {
            line = rest.strip_suffix(b"\r").unwrap_or(rest);
        }
        Ok(Some(String::from_utf8_lossy(line).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn yields_lines_then_eof() {
        let mut input = LineInput::new(&b"first\r\nsecond\n\nlast"[..]);

        assert_eq!(input.next_line().await.unwrap().as_deref(), Some("first"));
        assert_eq!(input.next_line().await.unwrap().as_deref(), Some("second"));
        assert_eq!(input.next_line().await.unwrap().as_deref(), Some(""));
        assert_eq!(input.next_line().await.unwrap().as_deref(), Some("last"));
        assert_eq!(input.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        let mut input = LineInput::new(&b"caf\xe9\r\nnext\n"[..]);

        assert_eq!(
            input.next_line().await.unwrap().as_deref(),
            Some("caf\u{FFFD}")
        );
        assert_eq!(input.next_line().await.unwrap().as_deref(), Some("next"));
        assert_eq!(input.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_input_is_immediate_eof() {
        let mut input = LineInput::new(&b""[..]);
        assert_eq!(input.next_line().await.unwrap(), None);
    }
}
