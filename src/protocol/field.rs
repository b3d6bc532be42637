//! Field Scanner: Delimiter-Split Views (Zero-Copy)
//!
//! Satu datagram = satu command, field dipisah byte 0x1F (ASCII Unit Separator).
//!
//! Prinsip desain:
//! - Zero-Copy: `Field` hanya view (offset, length) ke buffer datagram
//! - No-Allocation: scanner tidak pernah alokasi
//! - Never fails: semua byte sequence adalah input valid

/// Reserved delimiter byte. Tidak pernah valid di dalam isi field.
pub const UNIT_SEPARATOR: u8 = 0x1F;

/// Posisi delimiter berikutnya mulai dari `start`, atau `buf.len()` jika tidak ada.
#[inline(always)]
pub fn field_end(buf: &[u8], start: usize) -> usize {
    let start = start.min(buf.len());
    buf[start..]
        .iter()
        .position(|&b| b == UNIT_SEPARATOR)
        .map_or(buf.len(), |i| start + i)
}

/// Posisi tepat setelah delimiter berikutnya, atau `buf.len()` jika tidak ada.
///
/// Dipakai untuk skip ke field selanjutnya.
#[inline(always)]
pub fn next_field_start(buf: &[u8], start: usize) -> usize {
    let end = field_end(buf, start);
    if end < buf.len() {
        end + 1
    } else {
        buf.len()
    }
}

/// Exact comparison, bounded oleh panjang field. Tidak ada trimming, bukan prefix match.
#[inline(always)]
pub fn field_equals(candidate: &[u8], field: Field<'_>) -> bool {
    candidate == field.as_bytes()
}

/// View ke satu field di dalam datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    buf: &'a [u8],
    offset: usize,
    len: usize,
}

impl<'a> Field<'a> {
    /// Field yang dimulai di `start` dan berakhir di delimiter berikutnya.
    ///
    /// Scanning past end menghasilkan empty span di `buf.len()`.
    #[inline(always)]
    pub fn at(buf: &'a [u8], start: usize) -> Self {
        let offset = start.min(buf.len());
        let end = field_end(buf, offset);
        Self {
            buf,
            offset,
            len: end - offset,
        }
    }

    /// Empty field positioned at the end of `buf`.
    #[inline(always)]
    pub fn empty(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: buf.len(),
            len: 0,
        }
    }

    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw bytes of the field (zero-copy).
    #[inline(always)]
    pub fn as_bytes(&self) -> &'a [u8] {
        &self.buf[self.offset..self.offset + self.len]
    }

    /// Posisi awal field berikutnya (setelah delimiter), atau end of buffer.
    #[inline(always)]
    pub fn next_start(&self) -> usize {
        next_field_start(self.buf, self.offset)
    }
}

/// Lazy, finite iterator atas field-field dalam satu datagram.
///
/// Field pertama selalu ada (input kosong menghasilkan tepat satu empty field).
/// Delimiter di byte terakhir tidak menghasilkan trailing empty field.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    buf: &'a [u8],
    pos: usize,
    first: bool,
}

/// Split `buf` on [`UNIT_SEPARATOR`].
#[inline(always)]
pub fn scan(buf: &[u8]) -> Fields<'_> {
    Fields {
        buf,
        pos: 0,
        first: true,
    }
}

impl<'a> Iterator for Fields<'a> {
    type Item = Field<'a>;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if !self.first && self.pos >= self.buf.len() {
            return None;
        }
        self.first = false;

        let field = Field::at(self.buf, self.pos);
        self.pos = field.next_start();
        Some(field)
    }
}

impl<'a> std::iter::FusedIterator for Fields<'a> {}
