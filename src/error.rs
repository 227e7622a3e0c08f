//! Error types for the two lookup pipelines.
//!
//! Each variant maps to a short message that is safe to show in the UI. The
//! underlying transport error never reaches these types; it is logged by the
//! fetch helper instead.

use thiserror::Error;

/// Errors from looking up a surah by number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChapterError {
    /// Blank or non-numeric input. No request is made.
    #[error("no surah number entered")]
    EmptyInput,

    /// The corpus was fetched but contains no surah with this number.
    #[error("surah {0} not found")]
    NotFound(i64),

    /// Network error, non-JSON body, or a body without `data.surahs`.
    #[error("failed to fetch the Quran corpus")]
    FetchFailed,
}

impl ChapterError {
    /// Returns a user-friendly error message suitable for display in the UI.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyInput => "Please enter a surah number.",
            Self::NotFound(_) => "Surah not found.",
            Self::FetchFailed => "Failed to fetch Quran data.",
        }
    }
}

/// Errors from searching ayahs by keyword.
///
/// There is no not-found case: zero matches is a successful, empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeywordError {
    /// Blank input. No request is made.
    #[error("no keyword entered")]
    EmptyInput,

    /// Network error, non-JSON body, or a body without `data`.
    #[error("failed to search for the keyword")]
    FetchFailed,
}

impl KeywordError {
    /// Returns a user-friendly error message suitable for display in the UI.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyInput => "Please enter a keyword.",
            Self::FetchFailed => "Failed to search for the keyword.",
        }
    }
}
