// Copyright 2026 driedpampas@proton.me
// SPDX-License-Identifier: GPL-3.0-or-later

//! Crate-wide error type.
//!
//! The NBT codec and the MUTF-8 decoder raise their own small error types
//! close to the byte stream (see [`crate::nbt::parse::ParseError`] and
//! [`crate::nbt::mutf8::Mutf8Error`]); everything above that layer —
//! palettes, sections, chunk columns, region files — reports through this
//! enum.

use crate::nbt::mutf8::Mutf8Error;
use crate::nbt::parse::ParseError;
use thiserror::Error;

/// Errors surfaced by the palette, chunk, and region layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown tag kind, negative array length, invalid compression byte,
    /// or a truncated payload.
    #[error("malformed data: {0}")]
    Malformed(String),

    /// Invalid Modified UTF-8 in an NBT string.
    #[error("invalid modified utf-8: {0}")]
    Encoding(String),

    /// A chunk, block, or biome coordinate fell outside the range the
    /// operation requires (region bounds, 0..=255 for y, a chunk's local
    /// 0..16 block grid, ...).
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// A read targeted a chunk slot that has no data (on disk or cached).
    #[error("not present: {0}")]
    NotPresent(String),

    /// A serialized chunk column would need 256 or more sectors (1 MiB).
    #[error("capacity exceeded: {0}")]
    Capacity(String),

    /// A palette operation referenced a block state the palette does not
    /// contain, or tried to decrement a state with no references.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An underlying I/O failure, bubbled up unchanged.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::InvalidString => Error::Encoding(e.to_string()),
            _ => Error::Malformed(e.to_string()),
        }
    }
}

impl From<Mutf8Error> for Error {
    fn from(e: Mutf8Error) -> Self {
        Error::Encoding(e.to_string())
    }
}

/// Convenience alias used throughout the palette/chunk/region layers.
pub type Result<T> = std::result::Result<T, Error>;
