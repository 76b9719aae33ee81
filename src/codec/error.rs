//! Codec error types.

use crate::codec::StreamError;
use std::fmt;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Primitive being encoded or decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    TinyInt,
    Short,
    Int,
    Float,
    Bool,
    String,
    Binary,
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Datatype::TinyInt => "tiny integer",
            Datatype::Short => "short integer",
            Datatype::Int => "integer",
            Datatype::Float => "double precision float",
            Datatype::Bool => "boolean",
            Datatype::String => "string",
            Datatype::Binary => "binary data",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Read,
    Write,
}

impl Direction {
    fn capitalized(&self) -> &'static str {
        match self {
            Direction::Read => "Reading",
            Direction::Write => "Writing",
        }
    }

    fn preposition(&self) -> &'static str {
        match self {
            Direction::Read => "from",
            Direction::Write => "to",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Read => "reading",
            Direction::Write => "writing",
        })
    }
}

/// Why a codec operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cause {
    NotOpen,
    Io,
    OutOfRange,
    Malformed,
    Unknown,
}

/// Errors raised while encoding or decoding primitives
#[derive(Error, Debug)]
pub enum CodecError {
    #[error(
        "{} a {datatype} {} a closed binary stream is impossible",
        .direction.capitalized(),
        .direction.preposition()
    )]
    NotOpen {
        datatype: Datatype,
        direction: Direction,
    },

    #[error("An error occurred while {direction} a {datatype}: {source}")]
    Io {
        datatype: Datatype,
        direction: Direction,
        #[source]
        source: StreamError,
    },

    #[error("A {datatype} of {length} bytes exceeds the maximum length of {max} bytes")]
    OutOfRange {
        datatype: Datatype,
        direction: Direction,
        length: usize,
        max: usize,
    },

    #[error("An error occurred while {direction} a {datatype}: {source}")]
    Malformed {
        datatype: Datatype,
        direction: Direction,
        #[source]
        source: FromUtf8Error,
    },

    #[error("An unknown error occurred while {direction} a {datatype}: {source}")]
    Unknown {
        datatype: Datatype,
        direction: Direction,
        #[source]
        source: StreamError,
    },
}

impl CodecError {
    /// Wrap a stream failure, classifying it by its kind
    pub(crate) fn from_stream(datatype: Datatype, direction: Direction, source: StreamError) -> Self {
        match source {
            StreamError::NotOpen => CodecError::NotOpen {
                datatype,
                direction,
            },
            StreamError::Read { .. } | StreamError::Io(_) => CodecError::Io {
                datatype,
                direction,
                source,
            },
            StreamError::Other(_) => CodecError::Unknown {
                datatype,
                direction,
                source,
            },
        }
    }

    pub fn cause(&self) -> Cause {
        match self {
            CodecError::NotOpen { .. } => Cause::NotOpen,
            CodecError::Io { .. } => Cause::Io,
            CodecError::OutOfRange { .. } => Cause::OutOfRange,
            CodecError::Malformed { .. } => Cause::Malformed,
            CodecError::Unknown { .. } => Cause::Unknown,
        }
    }

    pub fn datatype(&self) -> Datatype {
        match self {
            CodecError::NotOpen { datatype, .. }
            | CodecError::Io { datatype, .. }
            | CodecError::OutOfRange { datatype, .. }
            | CodecError::Malformed { datatype, .. }
            | CodecError::Unknown { datatype, .. } => *datatype,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            CodecError::NotOpen { direction, .. }
            | CodecError::Io { direction, .. }
            | CodecError::OutOfRange { direction, .. }
            | CodecError::Malformed { direction, .. }
            | CodecError::Unknown { direction, .. } => *direction,
        }
    }
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
