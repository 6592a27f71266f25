use strata_geom::{LocalPos, Size2};
use strata_tiles::types::EMPTY_FIELD;
use strata_tiles::{AtlasCoord, TileRef};

use crate::ChunkError;

/// Bytes reserved for the format version at the start of each buffer.
pub const HEADER_LEN: usize = 2;
/// Six little-endian `u16` fields: local x, local y, source, atlas x, atlas y, variant.
pub const RECORD_LEN: usize = 12;

/// Decoded cell of a [`TileBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRecord {
    pub local: LocalPos,
    pub tile: Option<TileRef>,
}

impl TileRecord {
    #[inline]
    pub const fn empty(local: LocalPos) -> Self {
        Self { local, tile: None }
    }
}

/// Packed storage for one layer of one chunk.
///
/// The length is fixed at `w * h * 12 + 2` for the lifetime of the buffer and
/// this byte layout is the interchange format for layer data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileBuffer {
    size: Size2,
    bytes: Vec<u8>,
}

impl TileBuffer {
    #[inline]
    pub fn byte_len(size: Size2) -> usize {
        size.area() * RECORD_LEN + HEADER_LEN
    }

    /// Every cell empty, version header zeroed.
    pub fn new(size: Size2) -> Self {
        let mut bytes = vec![0xFF; Self::byte_len(size)];
        bytes[0] = 0;
        bytes[1] = 0;
        Self { size, bytes }
    }

    pub fn from_bytes(size: Size2, bytes: Vec<u8>) -> Result<Self, ChunkError> {
        let expected = Self::byte_len(size);
        if bytes.len() != expected {
            return Err(ChunkError::BadLength {
                expected,
                got: bytes.len(),
            });
        }
        Ok(Self { size, bytes })
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn size(&self) -> Size2 {
        self.size
    }

    #[inline]
    pub fn version(&self) -> u16 {
        u16::from_le_bytes([self.bytes[0], self.bytes[1]])
    }

    #[inline]
    pub fn offset(&self, local: LocalPos) -> Option<usize> {
        if !self.size.contains(local) {
            return None;
        }
        let idx = local.y as usize * self.size.w as usize + local.x as usize;
        Some(HEADER_LEN + idx * RECORD_LEN)
    }

    pub fn read(&self, local: LocalPos) -> Option<TileRecord> {
        let o = self.offset(local)?;
        let field = |i: usize| u16::from_le_bytes([self.bytes[o + i * 2], self.bytes[o + i * 2 + 1]]);
        let source = field(2);
        let tile = if source == EMPTY_FIELD {
            None
        } else {
            Some(TileRef::new(
                source,
                AtlasCoord::new(field(3), field(4)),
                field(5),
            ))
        };
        Some(TileRecord { local, tile })
    }

    /// Returns false (and leaves the buffer untouched) when `local` is out of range.
    pub fn write(&mut self, local: LocalPos, tile: Option<TileRef>) -> bool {
        let Some(o) = self.offset(local) else {
            return false;
        };
        let (source, ax, ay, variant) = match tile {
            Some(t) => (t.source, t.atlas.x, t.atlas.y, t.variant),
            None => (EMPTY_FIELD, EMPTY_FIELD, EMPTY_FIELD, EMPTY_FIELD),
        };
        let fields = [local.x as u16, local.y as u16, source, ax, ay, variant];
        for (i, v) in fields.into_iter().enumerate() {
            self.bytes[o + i * 2..o + i * 2 + 2].copy_from_slice(&v.to_le_bytes());
        }
        true
    }

    /// Occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = TileRecord> + '_ {
        let Size2 { w, h } = self.size;
        (0..h)
            .flat_map(move |y| (0..w).map(move |x| LocalPos::new(x, y)))
            .filter_map(move |l| self.read(l))
            .filter(|r| r.tile.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_buffer_layout() {
        let buf = TileBuffer::new(Size2::new(3, 2));
        let bytes = buf.as_bytes();
        assert_eq!(bytes.len(), 3 * 2 * 12 + 2);
        assert_eq!(&bytes[..2], &[0, 0]);
        assert!(bytes[2..].iter().all(|b| *b == 0xFF));
        assert_eq!(buf.occupied().count(), 0);
    }

    #[test]
    fn record_bytes_are_little_endian_at_row_major_offset() {
        let mut buf = TileBuffer::new(Size2::new(4, 4));
        let t = TileRef::new(0x0102, AtlasCoord::new(3, 0x0A0B), 7);
        assert!(buf.write(LocalPos::new(1, 2), Some(t)));
        let o = 2 + (2 * 4 + 1) * 12;
        assert_eq!(
            &buf.as_bytes()[o..o + 12],
            &[1, 0, 2, 0, 0x02, 0x01, 3, 0, 0x0B, 0x0A, 7, 0]
        );
    }

    #[test]
    fn erase_writes_sentinels_but_keeps_coordinates() {
        let mut buf = TileBuffer::new(Size2::square(2));
        let l = LocalPos::new(1, 1);
        buf.write(l, Some(TileRef::new(0, AtlasCoord::new(0, 0), 0)));
        buf.write(l, None);
        let o = buf.offset(l).unwrap();
        assert_eq!(&buf.as_bytes()[o..o + 4], &[1, 0, 1, 0]);
        assert!(buf.as_bytes()[o + 4..o + 12].iter().all(|b| *b == 0xFF));
        assert_eq!(buf.read(l), Some(TileRecord::empty(l)));
    }

    #[test]
    fn from_bytes_checks_length() {
        let size = Size2::square(2);
        let buf = TileBuffer::new(size);
        let copy = TileBuffer::from_bytes(size, buf.as_bytes().to_vec()).unwrap();
        assert_eq!(copy, buf);
        assert!(TileBuffer::from_bytes(size, vec![0; 10]).is_err());
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut buf = TileBuffer::new(Size2::square(2));
        let before = buf.clone();
        assert!(!buf.write(LocalPos::new(2, 0), None));
        assert!(!buf.write(LocalPos::new(0, -1), None));
        assert_eq!(buf, before);
        assert!(buf.read(LocalPos::new(-1, 0)).is_none());
    }
}
