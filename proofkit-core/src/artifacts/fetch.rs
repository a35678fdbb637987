use std::error::Error as StdError;
use std::io::{self, Read, Write};
#[cfg(feature = "host")]
use std::time::Duration;

#[cfg(feature = "host")]
use reqwest::blocking::Client;
use thiserror::Error;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),
    #[error("Server responded with status {0}")]
    Status(u16),
    #[error("Could not write response body: {0}")]
    Sink(#[source] io::Error),
    #[error("Received {received} bytes, expected at least {expected}")]
    Truncated { expected: u64, received: u64 },
}

impl FetchError {
    pub fn transport<E>(error: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Transport(error.into())
    }
}

/// The single download primitive: stream the resource at `url` into `sink`.
///
/// Implementations make exactly one attempt; retry policy belongs to the caller.
pub trait Fetch {
    /// Returns the number of bytes written to `sink`.
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64, FetchError>;
}

/// Copies `reader` into `sink`, keeping read failures apart from write failures.
pub fn pump<R: Read + ?Sized>(reader: &mut R, sink: &mut dyn Write) -> Result<u64, FetchError> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut written = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(FetchError::transport(e)),
        };
        sink.write_all(&buf[..n]).map_err(FetchError::Sink)?;
        written += n as u64;
    }
    sink.flush().map_err(FetchError::Sink)?;
    Ok(written)
}

/// Plain HTTP(S) GET over a blocking `reqwest` client.
#[cfg(feature = "host")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

#[cfg(feature = "host")]
impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("proofkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::transport)?;
        Ok(Self { client })
    }
}

#[cfg(feature = "host")]
impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64, FetchError> {
        let mut response = self.client.get(url).send().map_err(FetchError::transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        pump(&mut response, sink)
    }
}
