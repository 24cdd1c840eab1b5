// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use thiserror::Error;

/// Validation failures surfaced to the user as a transient status.  None of
/// them leave the store modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Please enter a message")]
    BlankInput,

    #[error("Please enter a title")]
    BlankTitle,
}
