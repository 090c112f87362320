// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Library level error type.

/// The errors that may occur while recording, aggregating or archiving
/// transactions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The transaction input was rejected before any record was created.
    #[error("invalid transaction: {0}")]
    Validation(String),

    /// The backing key-value store could not be read or written.
    ///
    /// In-memory state is left as it was after the mutation; the next
    /// successful persist writes it out in full.
    #[error("storage failure: {0}")]
    Persistence(String),

    /// A stored collection could not be parsed.
    #[error("stored value for '{key}' is malformed: {reason}")]
    MalformedStoredData { key: String, reason: String },

    #[error("invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Persistence(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
