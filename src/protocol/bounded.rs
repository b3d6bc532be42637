//! Fixed-Capacity String Builder
//!
//! Pengganti pointer arithmetic ke stack buffer: hanya ada operasi
//! bounded copy / append / finish. Input yang terlalu panjang di-truncate,
//! tidak pernah overflow dan tidak pernah error.

use std::borrow::Cow;
use std::fmt;

use super::field::Field;

/// Terminator byte ditulis oleh [`BoundedStringBuilder::finish`].
pub const TERMINATOR: u8 = 0;

/// Fixed-capacity byte buffer dengan write cursor.
///
/// Invariant: `cursor <= N`. Setelah `finish()`, `cursor < N` dan
/// `buf[cursor] == TERMINATOR`, jadi content maksimal `N - 1` bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct BoundedStringBuilder<const N: usize> {
    buf: [u8; N],
    cursor: usize,
    truncated: bool,
    terminated: bool,
}

impl<const N: usize> Default for BoundedStringBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> BoundedStringBuilder<N> {
    /// Membuat builder kosong dengan capacity `N`.
    ///
    /// # Panics
    /// Panic jika N == 0 (tidak ada tempat untuk terminator)
    pub fn new() -> Self {
        assert!(N > 0, "capacity must leave room for the terminator");
        Self {
            buf: [0u8; N],
            cursor: 0,
            truncated: false,
            terminated: false,
        }
    }

    /// Total capacity, termasuk slot terminator.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        N - self.cursor
    }

    /// Copy bytes dari field, maksimal sisa capacity. Sisanya dibuang diam-diam.
    #[inline]
    pub fn copy_field(&mut self, field: Field<'_>) -> &mut Self {
        self.copy_bytes(field.as_bytes())
    }

    /// Append literal byte-by-byte sampai NUL milik literal atau capacity habis.
    #[inline]
    pub fn append_literal(&mut self, text: &str) -> &mut Self {
        let bytes = text.as_bytes();
        let len = bytes
            .iter()
            .position(|&b| b == TERMINATOR)
            .unwrap_or(bytes.len());
        self.copy_bytes(&bytes[..len])
    }

    #[inline(always)]
    fn copy_bytes(&mut self, src: &[u8]) -> &mut Self {
        let n = src.len().min(self.remaining());
        self.buf[self.cursor..self.cursor + n].copy_from_slice(&src[..n]);
        self.cursor += n;
        if n > 0 {
            self.terminated = false;
        }
        if n < src.len() {
            self.truncated = true;
            tracing::trace!(
                capacity = N,
                dropped = src.len() - n,
                "bounded string truncated"
            );
        }
        self
    }

    /// Tulis terminator di cursor. Jika cursor sudah di (atau lewat) capacity,
    /// mundur tepat satu posisi dari akhir buffer dulu.
    ///
    /// Never fails, idempotent.
    #[inline]
    pub fn finish(&mut self) -> &mut Self {
        if self.cursor >= N {
            self.cursor = N - 1;
            self.truncated = true;
        }
        self.buf[self.cursor] = TERMINATOR;
        self.terminated = true;
        self
    }

    /// Content bytes (tanpa terminator).
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.cursor]
    }

    /// Content plus terminator. `None` sampai `finish()` dipanggil setelah write terakhir.
    #[inline]
    pub fn as_bytes_with_terminator(&self) -> Option<&[u8]> {
        if self.terminated {
            Some(&self.buf[..=self.cursor])
        } else {
            None
        }
    }

    /// Content sebagai text; invalid UTF-8 (misal multi-byte char yang terpotong) di-replace.
    #[inline]
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.cursor
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// `true` jika ada input yang dibuang karena capacity.
    #[inline(always)]
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }
}

impl<const N: usize> fmt::Debug for BoundedStringBuilder<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedStringBuilder")
            .field("capacity", &N)
            .field("content", &self.to_str_lossy())
            .field("truncated", &self.truncated)
            .finish()
    }
}

impl<const N: usize> fmt::Display for BoundedStringBuilder<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(buf: &[u8]) -> Field<'_> {
        Field::at(buf, 0)
    }

    #[test]
    fn test_copy_within_capacity() {
        let mut b = BoundedStringBuilder::<16>::new();
        b.copy_field(field(b"H264")).finish();
        assert_eq!(b.as_bytes(), b"H264");
        assert_eq!(b.as_bytes_with_terminator(), Some(&b"H264\0"[..]));
        assert!(!b.was_truncated());
    }

    #[test]
    fn test_copy_stops_at_delimiter() {
        let mut b = BoundedStringBuilder::<16>::new();
        b.copy_field(field(b"Cam A\x1Frest")).finish();
        assert_eq!(b.as_bytes(), b"Cam A");
    }

    #[test]
    fn test_overflow_keeps_capacity_minus_one() {
        let input = [b'x'; 260];
        let mut b = BoundedStringBuilder::<128>::new();
        b.copy_field(field(&input)).finish();
        assert_eq!(b.len(), 127);
        assert_eq!(b.as_bytes(), &input[..127]);
        let terminated = b.as_bytes_with_terminator().unwrap();
        assert_eq!(terminated.len(), 128);
        assert_eq!(terminated[127], TERMINATOR);
        assert!(b.was_truncated());
    }

    #[test]
    fn test_exactly_full_backs_off_one() {
        // Tepat N bytes: tidak ada byte yang dibuang saat copy, tapi finish mundur satu
        let mut b = BoundedStringBuilder::<4>::new();
        b.copy_field(field(b"abcd"));
        assert_eq!(b.len(), 4);
        b.finish();
        assert_eq!(b.as_bytes(), b"abc");
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut b = BoundedStringBuilder::<8>::new();
        b.copy_field(field(b"0123456789")).finish();
        let first = b.clone();
        b.finish().finish();
        assert_eq!(b, first);
        assert_eq!(b.as_bytes(), b"0123456");
    }

    #[test]
    fn test_append_literal_and_concat() {
        let mut b = BoundedStringBuilder::<128>::new();
        b.copy_field(field(b"Cam A"))
            .append_literal(" --- ")
            .copy_field(field(b"Backup Feed"))
            .finish();
        assert_eq!(b.as_bytes(), b"Cam A --- Backup Feed");
    }

    #[test]
    fn test_append_literal_stops_at_nul() {
        let mut b = BoundedStringBuilder::<16>::new();
        b.append_literal("ab\0cd").finish();
        assert_eq!(b.as_bytes(), b"ab");
    }

    #[test]
    fn test_each_half_truncated_independently() {
        let mut b = BoundedStringBuilder::<8>::new();
        b.copy_field(field(b"abcdef"))
            .append_literal(" --- ")
            .copy_field(field(b"XYZ"))
            .finish();
        // "abcdef" + " -" mengisi 8 bytes, finish mundur ke 7
        assert_eq!(b.as_bytes(), b"abcdef ");
    }

    #[test]
    fn test_empty_finish() {
        let mut b = BoundedStringBuilder::<1>::new();
        b.copy_field(field(b"zz"));
        assert_eq!(b.as_bytes_with_terminator(), None);
        b.finish();
        assert!(b.is_empty());
        assert_eq!(b.as_bytes_with_terminator(), Some(&b"\0"[..]));
    }

    #[test]
    fn test_lossy_text_after_cut_multibyte() {
        let text = "ab\u{00e9}";
        let mut b = BoundedStringBuilder::<4>::new();
        b.copy_field(field(text.as_bytes())).finish();
        // Cut di tengah 'é' (2 bytes), content cuma "ab" + byte pertama
        assert_eq!(b.len(), 3);
        assert_eq!(b.to_str_lossy(), "ab\u{fffd}");
    }
}
