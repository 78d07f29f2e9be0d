// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT
use async_compression::tokio::bufread::ZstdDecoder;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use cid::Cid;
use futures::ready;
use futures::{Stream, StreamExt, sink::Sink};
use fvm_ipld_encoding::to_vec;
use integer_encoding::VarInt;
use multihash_codetable::{Code, MultihashDigest as _};
use pin_project_lite::pin_project;
use serde::{Deserialize, Serialize};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, Chain};
use tokio_util::codec::{Decoder, Encoder, FramedRead};
use tokio_util::either::Either;
use unsigned_varint::codec::UviBytes;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarV1Header {
    // The roots array must contain one or more CIDs,
    // each of which should be present somewhere in the remainder of the CAR.
    // See <https://ipld.io/specs/transport/car/carv1/#constraints>
    // Emptiness is checked by the caller so it can be reported separately.
    pub roots: Vec<Cid>,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarBlock {
    pub cid: Cid,
    pub data: Vec<u8>,
}

impl CarBlock {
    // Write a varint frame containing the cid and the data
    pub fn write(&self, mut writer: &mut impl io::Write) -> io::Result<()> {
        let frame_length = self.cid.encoded_len() + self.data.len();
        writer.write_all(&frame_length.encode_var_vec())?;
        #[allow(clippy::needless_borrows_for_generic_args)]
        self.cid
            .write_bytes(&mut writer)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writer.write_all(&self.data)?;
        Ok(())
    }

    pub fn from_bytes(bytes: impl Into<Bytes>) -> io::Result<CarBlock> {
        let bytes: Bytes = bytes.into();
        let mut cursor = bytes.reader();
        let cid = Cid::read_bytes(&mut cursor)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let bytes = cursor.into_inner();
        Ok(CarBlock {
            cid,
            data: bytes.to_vec(),
        })
    }

    pub fn valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let actual = {
            let code = Code::try_from(self.cid.hash().code())?;
            Cid::new_v1(self.cid.codec(), code.digest(&self.data))
        };
        anyhow::ensure!(
            actual == self.cid,
            "CID/Block mismatch for block {}, actual: {actual}",
            self.cid
        );
        Ok(())
    }

    fn into_validated(self) -> io::Result<Self> {
        self.validate()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(self)
    }
}

/// Length-prefixed CAR frames. A stream that ends in the middle of a frame is
/// reported as [`io::ErrorKind::UnexpectedEof`], a bad length prefix as
/// [`io::ErrorKind::InvalidData`].
#[derive(Default)]
struct CarFrameCodec(UviBytes);

impl Decoder for CarFrameCodec {
    type Item = BytesMut;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> io::Result<Option<Self::Item>> {
        self.0
            .decode(src)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> io::Result<Option<Self::Item>> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "archive ends in the middle of a frame",
            )),
        }
    }
}

pin_project! {
    /// Stream of CAR blocks. If the input data is compressed with zstd, it will
    /// automatically be decompressed. Every block is checked against its CID.
    pub struct CarStream<ReaderT> {
        #[pin]
        reader: FramedRead<Either<Peeked<ReaderT>, ZstdDecoder<Peeked<ReaderT>>>, CarFrameCodec>,
        pub header: CarV1Header,
    }
}

/// The reader with the bytes taken by [`peek_prefix`] put back in front.
type Peeked<ReaderT> = Chain<io::Cursor<Vec<u8>>, ReaderT>;

// The zstd header has a maximum size of 18 bytes:
// https://github.com/facebook/zstd/blob/dev/doc/zstd_compression_format.md#zstandard-frames.
const ZSTD_MAX_FRAME_HEADER: usize = 18;

// This method checks the header in order to see whether or not we are operating on a zstd
// archive.
fn is_zstd(buf: &[u8]) -> bool {
    zstd::zstd_safe::get_frame_content_size(buf).is_ok()
}

/// Reads up to [`ZSTD_MAX_FRAME_HEADER`] bytes, however the reader chunks them.
async fn peek_prefix<ReaderT: AsyncBufRead + Unpin>(reader: &mut ReaderT) -> io::Result<Vec<u8>> {
    let mut prefix = Vec::with_capacity(ZSTD_MAX_FRAME_HEADER);
    while prefix.len() < ZSTD_MAX_FRAME_HEADER {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            break;
        }
        let n = buf.len().min(ZSTD_MAX_FRAME_HEADER - prefix.len());
        prefix.extend_from_slice(&buf[..n]);
        reader.consume(n);
    }
    Ok(prefix)
}

impl<ReaderT: AsyncBufRead + Unpin> CarStream<ReaderT> {
    pub async fn new(mut reader: ReaderT) -> io::Result<Self> {
        let prefix = peek_prefix(&mut reader).await?;
        let is_compressed = is_zstd(&prefix);
        let reader = AsyncReadExt::chain(io::Cursor::new(prefix), reader);
        let mut reader = if is_compressed {
            let mut zstd = ZstdDecoder::new(reader);
            zstd.multiple_members(true);
            FramedRead::new(Either::Right(zstd), CarFrameCodec::default())
        } else {
            FramedRead::new(Either::Left(reader), CarFrameCodec::default())
        };
        let header = read_v1_header(&mut reader).await?;
        Ok(CarStream { reader, header })
    }
}

impl<ReaderT: AsyncBufRead> Stream for CarStream<ReaderT> {
    type Item = io::Result<CarBlock>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let item = futures::ready!(this.reader.poll_next(cx));
        Poll::Ready(item.map(|ret| {
            ret.and_then(CarBlock::from_bytes)
                .and_then(CarBlock::into_validated)
        }))
    }
}

pin_project! {
    pub struct CarWriter<W> {
        #[pin]
        inner: W,
        buffer: BytesMut,
    }
}

impl<W: AsyncWrite> CarWriter<W> {
    pub fn new_carv1(roots: Vec<Cid>, writer: W) -> io::Result<Self> {
        let car_header = CarV1Header { roots, version: 1 };

        let mut header_uvi_frame = BytesMut::new();
        UviBytes::default().encode(Bytes::from(to_vec(&car_header)?), &mut header_uvi_frame)?;

        Ok(Self {
            inner: writer,
            buffer: header_uvi_frame,
        })
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: AsyncWrite> Sink<CarBlock> for CarWriter<W> {
    type Error = io::Error;

    fn poll_ready(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        let mut this = self.as_mut().project();

        while !this.buffer.is_empty() {
            this = self.as_mut().project();
            let bytes_written = ready!(this.inner.poll_write(cx, this.buffer))?;
            this.buffer.advance(bytes_written);
        }
        Poll::Ready(Ok(()))
    }
    fn start_send(self: Pin<&mut Self>, item: CarBlock) -> Result<(), Self::Error> {
        item.write(&mut self.project().buffer.writer())
    }
    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        ready!(self.as_mut().poll_ready(cx))?;
        self.project().inner.poll_flush(cx)
    }
    fn poll_close(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        ready!(self.as_mut().poll_ready(cx))?;
        self.project().inner.poll_shutdown(cx)
    }
}

async fn read_v1_header<ReaderT: tokio::io::AsyncRead + Unpin>(
    framed_reader: &mut FramedRead<ReaderT, CarFrameCodec>,
) -> io::Result<CarV1Header> {
    let invalid = |msg: String| io::Error::new(io::ErrorKind::InvalidData, msg);
    let frame = framed_reader
        .next()
        .await
        .transpose()?
        .ok_or_else(|| invalid("archive is empty".into()))?;
    let header = fvm_ipld_encoding::from_slice::<CarV1Header>(&frame)
        .map_err(|e| invalid(format!("invalid header block: {e}")))?;
    if header.version != 1 {
        return Err(invalid(format!(
            "unsupported CAR version {}",
            header.version
        )));
    }
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_compression::tokio::write::ZstdEncoder;
    use futures::{SinkExt as _, TryStreamExt};
    use pretty_assertions::assert_eq;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use tokio::io::AsyncWriteExt as _;

    impl Arbitrary for CarBlock {
        fn arbitrary(g: &mut Gen) -> CarBlock {
            let data = Vec::<u8>::arbitrary(g);
            let encoding = g
                .choose(&[
                    fvm_ipld_encoding::DAG_CBOR,
                    fvm_ipld_encoding::CBOR,
                    fvm_ipld_encoding::IPLD_RAW,
                ])
                .unwrap();
            let code = g.choose(&[Code::Blake2b256, Code::Sha2_256]).unwrap();
            let cid = Cid::new_v1(*encoding, code.digest(&data));
            CarBlock { cid, data }
        }
    }

    async fn write_car(roots: Vec<Cid>, blocks: Vec<CarBlock>) -> Vec<u8> {
        let mut writer = CarWriter::new_carv1(roots, Vec::new()).unwrap();
        for block in blocks {
            writer.feed(block).await.unwrap();
        }
        writer.close().await.unwrap();
        writer.into_inner()
    }

    fn sample_blocks() -> Vec<CarBlock> {
        [b"one".as_slice(), b"two", b"three"]
            .into_iter()
            .map(|data| CarBlock {
                cid: Cid::new_v1(fvm_ipld_encoding::IPLD_RAW, Code::Blake2b256.digest(data)),
                data: data.to_vec(),
            })
            .collect()
    }

    #[quickcheck]
    fn blocks_survive_writer_and_stream(blocks: Vec<CarBlock>) -> bool {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let roots = vec![Cid::default()];
            let bytes = write_car(roots.clone(), blocks.clone()).await;
            let stream = CarStream::new(bytes.as_slice()).await.unwrap();
            assert_eq!(stream.header.roots, roots);
            let read: Vec<CarBlock> = stream.try_collect().await.unwrap();
            read == blocks
        })
    }

    #[tokio::test]
    async fn zstd_archives_are_decompressed() {
        let blocks = sample_blocks();
        let plain = write_car(vec![blocks[0].cid], blocks.clone()).await;
        let mut encoder = ZstdEncoder::new(Vec::new());
        encoder.write_all(&plain).await.unwrap();
        encoder.shutdown().await.unwrap();
        let compressed = encoder.into_inner();

        let stream = CarStream::new(compressed.as_slice()).await.unwrap();
        let read: Vec<CarBlock> = stream.try_collect().await.unwrap();
        assert_eq!(read, blocks);
    }

    #[tokio::test]
    async fn zstd_detected_across_small_chunks() {
        let blocks = sample_blocks();
        let plain = write_car(vec![blocks[0].cid], blocks.clone()).await;
        let compressed = zstd::encode_all(plain.as_slice(), 3).unwrap();
        let chunks = compressed
            .chunks(1)
            .map(|chunk| Ok::<_, io::Error>(Bytes::copy_from_slice(chunk)))
            .collect::<Vec<_>>();
        let reader = tokio_util::io::StreamReader::new(futures::stream::iter(chunks));

        let stream = CarStream::new(reader).await.unwrap();
        let read: Vec<CarBlock> = stream.try_collect().await.unwrap();
        assert_eq!(read, blocks);
    }

    #[tokio::test]
    async fn bad_frame_length_is_invalid_data() {
        let mut oversized = vec![0xff, 0xff, 0xff, 0xff, 0x0f];
        oversized.extend_from_slice(&[0; 8]);
        for bytes in [oversized, vec![0xff; 16]] {
            let err = CarStream::new(bytes.as_slice()).await.err().unwrap();
            assert_eq!(err.kind(), io::ErrorKind::InvalidData, "{err}");
        }
    }

    #[tokio::test]
    async fn garbage_header_is_invalid_data() {
        let err = CarStream::new(b"\x05hello".as_slice())
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let err = CarStream::new(b"".as_slice()).await.err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn unsupported_version_is_invalid_data() {
        let header = CarV1Header {
            roots: vec![Cid::default()],
            version: 2,
        };
        let mut bytes = BytesMut::new();
        UviBytes::default()
            .encode(Bytes::from(to_vec(&header).unwrap()), &mut bytes)
            .unwrap();
        let err = CarStream::new(&bytes[..]).await.err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn tampered_block_is_rejected() {
        let mut blocks = sample_blocks();
        blocks[1].data = b"not two".to_vec();
        let bytes = write_car(vec![blocks[0].cid], blocks).await;
        let stream = CarStream::new(bytes.as_slice()).await.unwrap();
        let err = stream.try_collect::<Vec<_>>().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn truncated_archive_is_unexpected_eof() {
        let blocks = sample_blocks();
        let bytes = write_car(vec![blocks[0].cid], blocks).await;
        let truncated = &bytes[..bytes.len() - 2];
        let stream = CarStream::new(truncated).await.unwrap();
        let err = stream.try_collect::<Vec<_>>().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
