//! Zero-Allocation Command Encoder
//!
//! Encode command langsung ke pre-allocated datagram buffer.
//! Tidak ada alokasi setelah inisialisasi. Dipakai oleh `mongrid_send`
//! dan oleh test untuk membangun datagram.

use super::command::Verb;
use super::field::UNIT_SEPARATOR;
use crate::error::EncodeError;

/// Batas payload satu datagram (buffer receive 1024, satu byte cadangan).
pub const MAX_DATAGRAM_LEN: usize = 1023;

/// Field-field `play` sebelum di-encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayFields<'a> {
    pub description: &'a str,
    pub uri: &'a str,
    pub stream_type: &'a str,
    pub title: Option<&'a str>,
}

/// Pre-allocated encoder buffer
///
/// Semua operasi encode dilakukan ke buffer internal,
/// tidak ada alokasi dinamis.
pub struct Encoder {
    buffer: Box<[u8]>,
    write_pos: usize,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            buffer: vec![0u8; MAX_DATAGRAM_LEN].into_boxed_slice(),
            write_pos: 0,
        }
    }

    /// Reset encoder untuk reuse
    #[inline(always)]
    pub fn reset(&mut self) {
        self.write_pos = 0;
    }

    /// Encode `play` dengan description, uri, stream type, dan optional title.
    ///
    /// Field tidak pernah di-escape: field yang mengandung 0x1F ditolak.
    /// Title kosong ditulis sebagai `␟␟` di akhir, karena satu delimiter
    /// trailing saja berarti tidak ada title.
    pub fn encode_play(&mut self, play: &PlayFields<'_>) -> Result<&[u8], EncodeError> {
        let mut fields: [(&'static str, &str); 4] = [
            ("description", play.description),
            ("uri", play.uri),
            ("stream_type", play.stream_type),
            ("title", ""),
        ];
        let count = match play.title {
            Some(title) => {
                fields[3].1 = title;
                4
            }
            None => 3,
        };
        let fields = &fields[..count];

        if let Some((name, _)) = fields
            .iter()
            .find(|(_, value)| value.as_bytes().contains(&UNIT_SEPARATOR))
        {
            return Err(EncodeError::DelimiterInField { field: *name });
        }

        let empty_title = play.title == Some("");
        let verb = Verb::Play.as_str().as_bytes();
        let total = verb.len()
            + fields
                .iter()
                .map(|(_, value)| 1 + value.len())
                .sum::<usize>()
            + usize::from(empty_title);
        if total > self.buffer.len() {
            return Err(EncodeError::TooLarge {
                len: total,
                max: self.buffer.len(),
            });
        }

        self.write_pos = 0;
        self.put(verb);
        for (_, value) in fields {
            self.put(&[UNIT_SEPARATOR]);
            self.put(value.as_bytes());
        }
        if empty_title {
            self.put(&[UNIT_SEPARATOR]);
        }

        Ok(self.as_bytes())
    }

    /// Encode verb tanpa argumen (`stop`, `monitor`, `config`, atau `play` kosong).
    pub fn encode_verb(&mut self, verb: Verb) -> &[u8] {
        self.write_pos = 0;
        self.put(verb.as_str().as_bytes());
        self.as_bytes()
    }

    #[inline(always)]
    fn put(&mut self, bytes: &[u8]) {
        self.buffer[self.write_pos..self.write_pos + bytes.len()].copy_from_slice(bytes);
        self.write_pos += bytes.len();
    }

    /// Get current buffer content
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.write_pos]
    }

    /// Available space in buffer
    #[inline(always)]
    pub fn available(&self) -> usize {
        self.buffer.len() - self.write_pos
    }
}
