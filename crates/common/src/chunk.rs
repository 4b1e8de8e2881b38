//! Splitting byte streams into size-bounded blocks
//!
//! The remote medium enforces a hard per-object size limit, so file content
//! is carried as an ordered sequence of chunks that each fit inside one
//! object. The final chunk may be shorter than the block size; no padding is
//! ever added (the crypto layer owns any framing it needs).

use bytes::{Bytes, BytesMut};

#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    #[error("block size of {0} bytes is not usable")]
    SizeLimit(usize),
}

/// Split `data` into chunks of at most `max_block_size` bytes.
///
/// Chunks are zero-copy slices of the input. An empty input yields zero
/// chunks. Fails if `max_block_size` is zero.
pub fn split(data: Bytes, max_block_size: usize) -> Result<Vec<Bytes>, ChunkError> {
    if max_block_size == 0 {
        return Err(ChunkError::SizeLimit(max_block_size));
    }

    let mut chunks = Vec::with_capacity(data.len().div_ceil(max_block_size));
    let mut offset = 0;
    while offset < data.len() {
        let end = std::cmp::min(offset + max_block_size, data.len());
        chunks.push(data.slice(offset..end));
        offset = end;
    }

    Ok(chunks)
}

/// Concatenate chunks in index order back into one stream.
///
/// Zero chunks yield an empty stream, the inverse of [`split`].
pub fn join<I>(chunks: I) -> Bytes
where
    I: IntoIterator<Item = Bytes>,
{
    let mut out = BytesMut::new();
    for chunk in chunks {
        out.extend_from_slice(&chunk);
    }
    out.freeze()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_split_join_round_trip() {
        let data = Bytes::from(vec![7u8; 1000]);
        let chunks = split(data.clone(), 64).unwrap();
        assert_eq!(join(chunks), data);
    }

    #[test]
    fn test_chunk_count_law() {
        // ceil(len / max) chunks for non-empty input
        for (len, max, expected) in [(25usize, 10usize, 3usize), (10, 10, 1), (11, 10, 2), (1, 10, 1)] {
            let chunks = split(Bytes::from(vec![0u8; len]), max).unwrap();
            assert_eq!(chunks.len(), expected, "len={} max={}", len, max);
        }
    }

    #[test]
    fn test_split_sizes() {
        // 25 bytes at a block size of 10 -> 10, 10, 5
        let chunks = split(Bytes::from(vec![1u8; 25]), 10).unwrap();
        let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![10, 10, 5]);
    }

    #[test]
    fn test_empty_stream() {
        let chunks = split(Bytes::new(), 10).unwrap();
        assert!(chunks.is_empty());
        assert_eq!(join(chunks), Bytes::new());
    }

    #[test]
    fn test_zero_block_size_rejected() {
        assert!(matches!(
            split(Bytes::from_static(b"data"), 0),
            Err(ChunkError::SizeLimit(0))
        ));
    }

    #[test]
    fn test_chunks_preserve_content_order() {
        let data: Vec<u8> = (0..=255).collect();
        let chunks = split(Bytes::from(data.clone()), 100).unwrap();
        assert_eq!(chunks[0][0], 0);
        assert_eq!(chunks[2][55], 255);
        assert_eq!(join(chunks).to_vec(), data);
    }
}
