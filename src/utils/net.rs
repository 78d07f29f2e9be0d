// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::{
    fmt, io,
    path::PathBuf,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use bytes::Bytes;
use futures::{TryStreamExt as _, stream::BoxStream};
use pin_project_lite::pin_project;
use tokio::io::{AsyncBufRead, AsyncRead, BufReader, ReadBuf};
use tokio_util::{either::Either, io::StreamReader};
use tracing::info;
use url::Url;

use crate::init::Error;

/// Where a genesis archive is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveSource {
    Local(PathBuf),
    Remote(Url),
}

impl ArchiveSource {
    /// Classifies a user supplied location. The empty string means there is no
    /// archive at all and yields `None`.
    ///
    /// Anything that parses as a URL must use `http` or `https`. Strings that
    /// do not parse as a URL are taken to be local paths.
    pub fn parse(location: &str) -> Result<Option<Self>, Error> {
        if location.is_empty() {
            return Ok(None);
        }
        match Url::parse(location) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Some(Self::Remote(url))),
                other => Err(Error::UnsupportedScheme(other.to_owned())),
            },
            Err(_) => Ok(Some(Self::Local(PathBuf::from(location)))),
        }
    }

    /// Opens the source for reading. Remote sources are streamed, nothing is
    /// buffered to disk. Read failures of the returned reader carry a
    /// [`SourceReadError`].
    pub async fn open(
        &self,
        client: &reqwest::Client,
    ) -> Result<SourceReader<impl AsyncBufRead + Unpin + Send + use<>>, Error> {
        self.open_raw(client).await.map(SourceReader::new)
    }

    async fn open_raw(
        &self,
        client: &reqwest::Client,
    ) -> Result<impl AsyncBufRead + Unpin + Send + use<>, Error> {
        match self {
            Self::Remote(url) => {
                info!("Downloading genesis: {url}");
                let response = client
                    .get(url.clone())
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|e| Error::SourceUnavailable(format!("{url}: {e}")))?;
                let stream: BoxStream<'static, std::io::Result<Bytes>> =
                    Box::pin(response.bytes_stream().map_err(std::io::Error::other));
                Ok(Either::Left(StreamReader::new(stream)))
            }
            Self::Local(path) => {
                info!("Reading genesis: {}", path.display());
                let file = tokio::fs::File::open(path)
                    .await
                    .map_err(|e| Error::SourceUnavailable(format!("{}: {e}", path.display())))?;
                Ok(Either::Right(BufReader::new(file)))
            }
        }
    }
}

impl fmt::Display for ArchiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// An I/O failure of the archive source itself, as opposed to bytes that do
/// not form a valid archive.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct SourceReadError(io::Error);

impl SourceReadError {
    fn tag(e: io::Error) -> io::Error {
        io::Error::new(e.kind(), SourceReadError(e))
    }

    /// Whether `e` was raised by a [`SourceReader`].
    pub fn is_source_error(e: &io::Error) -> bool {
        e.get_ref().is_some_and(|inner| inner.is::<SourceReadError>())
    }
}

pin_project! {
    /// Tags every I/O error of the wrapped reader with [`SourceReadError`].
    pub struct SourceReader<R> {
        #[pin]
        inner: R,
    }
}

impl<R> SourceReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: AsyncRead> AsyncRead for SourceReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.project()
            .inner
            .poll_read(cx, buf)
            .map_err(SourceReadError::tag)
    }
}

impl<R: AsyncBufRead> AsyncBufRead for SourceReader<R> {
    fn poll_fill_buf(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<&[u8]>> {
        self.project()
            .inner
            .poll_fill_buf(cx)
            .map_err(SourceReadError::tag)
    }

    fn consume(self: Pin<&mut Self>, amt: usize) {
        self.project().inner.consume(amt)
    }
}

/// HTTP client used during bootstrap. The overall deadline is enforced by the
/// caller; this only bounds connection setup.
pub fn http_client(connect_timeout: Duration) -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .user_agent(concat!("forest-init/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};
    use tokio::io::AsyncReadExt as _;

    async fn serve(router: Router) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await });
        addr
    }

    #[tokio::test]
    async fn reader_errors_are_tagged() {
        let chunks: Vec<io::Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")),
        ];
        let mut reader = SourceReader::new(StreamReader::new(futures::stream::iter(chunks)));
        let mut buf = vec![];
        let err = reader.read_to_end(&mut buf).await.unwrap_err();
        assert_eq!(buf, b"partial");
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        assert!(SourceReadError::is_source_error(&err));
        assert!(!SourceReadError::is_source_error(&io::Error::other(
            "decoder failure"
        )));
    }

    async fn read_all(source: &ArchiveSource) -> Result<Vec<u8>, Error> {
        let client = http_client(Duration::from_secs(5)).unwrap();
        let mut reader = source.open(&client).await?;
        let mut buf = vec![];
        reader.read_to_end(&mut buf).await.unwrap();
        Ok(buf)
    }

    #[test]
    fn classify_sources() {
        assert_eq!(ArchiveSource::parse("").unwrap(), None);
        assert_eq!(
            ArchiveSource::parse("/tmp/genesis.car").unwrap(),
            Some(ArchiveSource::Local("/tmp/genesis.car".into()))
        );
        assert_eq!(
            ArchiveSource::parse("genesis.car").unwrap(),
            Some(ArchiveSource::Local("genesis.car".into()))
        );
        assert!(matches!(
            ArchiveSource::parse("https://example.com/genesis.car").unwrap(),
            Some(ArchiveSource::Remote(_))
        ));
        assert!(matches!(
            ArchiveSource::parse("http://example.com/genesis.car").unwrap(),
            Some(ArchiveSource::Remote(_))
        ));
        assert_eq!(
            ArchiveSource::parse("ftp://example.com/genesis.car").unwrap_err(),
            Error::UnsupportedScheme("ftp".into())
        );
        assert_eq!(
            ArchiveSource::parse("file:///tmp/genesis.car").unwrap_err(),
            Error::UnsupportedScheme("file".into())
        );
    }

    #[tokio::test]
    async fn open_local_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"car bytes").unwrap();
        let source = ArchiveSource::Local(file.path().to_owned());
        assert_eq!(read_all(&source).await.unwrap(), b"car bytes");
    }

    #[tokio::test]
    async fn open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = ArchiveSource::Local(dir.path().join("missing.car"));
        assert!(matches!(
            read_all(&source).await,
            Err(Error::SourceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn open_remote() {
        let addr = serve(
            Router::new()
                .route("/genesis.car", get(|| async { "remote car bytes" }))
                .route("/gone.car", get(|| async { StatusCode::NOT_FOUND })),
        )
        .await;

        let source = ArchiveSource::parse(&format!("http://{addr}/genesis.car"))
            .unwrap()
            .unwrap();
        assert_eq!(read_all(&source).await.unwrap(), b"remote car bytes");

        let source = ArchiveSource::parse(&format!("http://{addr}/gone.car"))
            .unwrap()
            .unwrap();
        assert!(matches!(
            read_all(&source).await,
            Err(Error::SourceUnavailable(_))
        ));
    }
}
