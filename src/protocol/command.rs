//! Command Parser: datagram -> typed `Command`
//!
//! One-shot per datagram, tidak ada state yang persist antar datagram.
//!
//! Wire format:
//! ```text
//! play<US><description><US><uri><US><stream_type>[<US><secondary_title>]
//! stop
//! monitor
//! config
//! ```
//!
//! Missing `play` fields dianggap empty field, bukan error.

#![allow(clippy::large_enum_variant)] // Play dibangun di stack, tanpa alokasi

use super::bounded::BoundedStringBuilder;
use super::field::{field_equals, scan, Field};
use crate::error::ParseError;

pub const DESCRIPTION_CAPACITY: usize = 128;
pub const URI_CAPACITY: usize = 128;
pub const STREAM_TYPE_CAPACITY: usize = 16;

/// Penyambung description dan secondary title.
pub const TITLE_SEPARATOR: &str = " --- ";

pub type Description = BoundedStringBuilder<DESCRIPTION_CAPACITY>;
pub type StreamUri = BoundedStringBuilder<URI_CAPACITY>;
pub type StreamType = BoundedStringBuilder<STREAM_TYPE_CAPACITY>;

/// Verb = field pertama, case-sensitive ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Play,
    Stop,
    Monitor,
    Config,
}

impl Verb {
    pub const ALL: [Verb; 4] = [Verb::Play, Verb::Stop, Verb::Monitor, Verb::Config];

    #[inline(always)]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Stop => "stop",
            Self::Monitor => "monitor",
            Self::Config => "config",
        }
    }

    /// Exact byte match terhadap verb field.
    #[inline]
    pub fn from_field(field: Field<'_>) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|verb| field_equals(verb.as_str().as_bytes(), field))
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Argumen `play`, sudah bounded dan terminated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayRequest {
    pub description: Description,
    pub uri: StreamUri,
    pub stream_type: StreamType,
}

impl PlayRequest {
    /// Build dari field setelah verb: description, uri, stream type, optional title.
    ///
    /// Title hanya dipakai jika ada field di posisinya (termasuk empty field
    /// sebelum trailing delimiter).
    pub fn from_fields<'a, I>(mut fields: I, empty: Field<'a>) -> Self
    where
        I: Iterator<Item = Field<'a>>,
    {
        let description_field = fields.next().unwrap_or(empty);
        let uri_field = fields.next().unwrap_or(empty);
        let stream_type_field = fields.next().unwrap_or(empty);
        let title_field = fields.next();

        let mut request = Self::default();

        request.description.copy_field(description_field);
        if let Some(title) = title_field {
            request
                .description
                .append_literal(TITLE_SEPARATOR)
                .copy_field(title);
        }
        request.description.finish();

        request.uri.copy_field(uri_field).finish();
        request.stream_type.copy_field(stream_type_field).finish();

        request
    }

    /// `true` jika salah satu builder membuang input.
    pub fn was_truncated(&self) -> bool {
        self.description.was_truncated()
            || self.uri.was_truncated()
            || self.stream_type.was_truncated()
    }
}

/// Satu command per datagram. Dibuat sekali, langsung di-dispatch, lalu dibuang.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(PlayRequest),
    Stop,
    Monitor,
    Config,
}

impl Command {
    #[inline(always)]
    pub fn verb(&self) -> Verb {
        match self {
            Self::Play(_) => Verb::Play,
            Self::Stop => Verb::Stop,
            Self::Monitor => Verb::Monitor,
            Self::Config => Verb::Config,
        }
    }
}

/// Parse satu datagram. Fully constructed command, atau error tanpa side effect.
pub fn parse_command(datagram: &[u8]) -> Result<Command, ParseError> {
    let mut fields = scan(datagram);
    let verb_field = fields.next().unwrap_or(Field::empty(datagram));

    let Some(verb) = Verb::from_field(verb_field) else {
        return Err(ParseError::UnrecognizedVerb {
            verb: String::from_utf8_lossy(verb_field.as_bytes()).into_owned(),
        });
    };

    let command = match verb {
        Verb::Play => Command::Play(PlayRequest::from_fields(fields, Field::empty(datagram))),
        Verb::Stop => Command::Stop,
        Verb::Monitor => Command::Monitor,
        Verb::Config => Command::Config,
    };
    Ok(command)
}
