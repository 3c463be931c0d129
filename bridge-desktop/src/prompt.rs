//! Console Verifier Prompt

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    prompt::VerifierPrompt,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

/// Prompts on a terminal: prints the authorization URL and reads one line
pub struct ConsolePrompt<R = BufReader<tokio::io::Stdin>, W = tokio::io::Stdout> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl ConsolePrompt {
    /// Prompt on the process's stdin/stdout
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> ConsolePrompt<R, W>
where
    R: AsyncBufRead + Send + Unpin,
    W: AsyncWrite + Send + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }
}

#[async_trait]
impl<R, W> VerifierPrompt for ConsolePrompt<R, W>
where
    R: AsyncBufRead + Send + Unpin,
    W: AsyncWrite + Send + Unpin,
{
    async fn request_verifier(&self, authorize_url: &str) -> Result<String> {
        {
            let mut output = self.output.lock().await;
            let banner = format!(
                "Go to {} in a web browser.\nEnter the six-digit code: ",
                authorize_url
            );
            output.write_all(banner.as_bytes()).await?;
            output.flush().await?;
        }

        let mut line = String::new();
        let read = self.input.lock().await.read_line(&mut line).await?;
        if read == 0 {
            return Err(BridgeError::OperationFailed(
                "No verifier entered before end of input".to_string(),
            ));
        }

        Ok(line.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_trimmed_verifier() {
        let input = BufReader::new(&b"  123456 \n"[..]);
        let prompt = ConsolePrompt::new(input, Vec::new());

        let code = prompt
            .request_verifier("https://example.com/authorize?oauth_token=t")
            .await
            .unwrap();
        assert_eq!(code, "123456");

        let shown = String::from_utf8(prompt.output.into_inner()).unwrap();
        assert!(shown.contains("https://example.com/authorize?oauth_token=t"));
    }

    #[tokio::test]
    async fn test_empty_input_is_an_error() {
        let prompt = ConsolePrompt::new(BufReader::new(&b""[..]), Vec::new());
        assert!(prompt.request_verifier("https://example.com").await.is_err());
    }
}
