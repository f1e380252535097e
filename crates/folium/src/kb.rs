//! The knowledge-base surface shared by both inference engines: tell/ask,
//! the tri-state answer, and the cooperative cancellation token.

use crate::fol::{Clause, Sentence};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A store of asserted sentences that can be queried by inference
pub trait KnowledgeBase {
    type Query;

    /// Assert a sentence. Rejection leaves the knowledge base unchanged.
    fn tell(&mut self, sentence: &Sentence) -> Result<(), TellError>;

    /// Assert several sentences, stopping at the first rejection
    fn tell_all(&mut self, sentences: &[Sentence]) -> Result<(), TellError> {
        for sentence in sentences {
            self.tell(sentence)?;
        }
        Ok(())
    }

    /// Pose a query, returning an executable handle
    fn ask(&self, query: &Sentence) -> Result<Self::Query, AskError>;
}

/// Tri-state truth of a queried sentence, plus the distinct cancellation
/// outcome (which is never folded into `Unknown`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Answer {
    /// The knowledge base entails the sentence
    Proved,
    /// The knowledge base entails the sentence's negation
    Disproved,
    /// Neither was established before the search gave out
    Unknown,
    /// The caller's cancellation signal fired mid-search
    Cancelled,
}

/// Synchronous rejection of a `tell`
#[derive(Debug, Clone, PartialEq)]
pub enum TellError {
    /// The backward-chaining engine accepts definite clauses only
    NotDefinite(Clause),
}

impl fmt::Display for TellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TellError::NotDefinite(clause) => {
                write!(f, "not a definite clause: {}", clause)
            }
        }
    }
}

impl std::error::Error for TellError {}

/// Synchronous rejection of an `ask`
#[derive(Debug, Clone, PartialEq)]
pub enum AskError {
    /// The engine cannot execute this goal form
    UnsupportedGoal(Sentence),
}

impl fmt::Display for AskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AskError::UnsupportedGoal(sentence) => {
                write!(f, "unsupported goal sentence: {:?}", sentence)
            }
        }
    }
}

impl std::error::Error for AskError {}

/// A cloneable cooperative-cancellation signal. Engines check it between
/// iterations of every potentially unbounded loop and surface a distinct
/// cancelled outcome when it has fired.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Signal cancellation to every clone of this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_tell_error_display() {
        let err = TellError::NotDefinite(Clause::empty());
        assert_eq!(err.to_string(), "not a definite clause: ⊥");
    }
}
