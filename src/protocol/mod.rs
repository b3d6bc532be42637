//! Protocol Layer: 0x1F-Delimited Text Commands
//!
//! Prinsip desain:
//! - One datagram = one command, fire-and-forget (tidak ada response)
//! - Zero-copy field views, bounded copy hanya saat materialize
//! - Truncate, never overflow, never fail

mod bounded;
mod command;
mod encoder;
mod field;

pub use bounded::{BoundedStringBuilder, TERMINATOR};
pub use command::{
    parse_command, Command, Description, PlayRequest, StreamType, StreamUri, Verb,
    DESCRIPTION_CAPACITY, STREAM_TYPE_CAPACITY, TITLE_SEPARATOR, URI_CAPACITY,
};
pub use encoder::{Encoder, PlayFields, MAX_DATAGRAM_LEN};
pub use field::{field_end, field_equals, next_field_start, scan, Field, Fields, UNIT_SEPARATOR};
