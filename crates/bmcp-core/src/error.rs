//! Error types for instance construction and parsing.

use thiserror::Error;

use crate::instance::{ElementId, ItemId};

/// Main error type for BMCP instance handling.
#[derive(Debug, Error)]
pub enum BmcpError {
    /// Failed to read an instance file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A token could not be parsed as an integer.
    #[error("line {line}: expected {expected}, found `{token}`")]
    Parse {
        line: usize,
        expected: &'static str,
        token: String,
    },

    /// The input ended before the instance was complete.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    /// Extra tokens after the relation matrix.
    #[error("line {line}: trailing data `{token}` after relation matrix")]
    TrailingData { line: usize, token: String },

    /// A relation matrix entry other than 0 or 1.
    #[error("line {line}: relation flag must be 0 or 1, found {value}")]
    InvalidFlag { line: usize, value: i64 },

    #[error("capacity must be non-negative, got {0}")]
    NegativeCapacity(i64),

    #[error("item {item} has negative weight {weight}")]
    NegativeWeight { item: ItemId, weight: i64 },

    #[error("element {element} has negative profit {profit}")]
    NegativeProfit { element: ElementId, profit: i64 },

    #[error("item {item} out of range (instance has {count} items)")]
    ItemOutOfRange { item: ItemId, count: usize },

    #[error("element {element} out of range (instance has {count} elements)")]
    ElementOutOfRange { element: ElementId, count: usize },

    /// A solution lists the same item twice.
    #[error("item {0} selected more than once")]
    DuplicateItem(ItemId),
}

/// Result type alias for BMCP instance operations.
pub type Result<T> = std::result::Result<T, BmcpError>;
