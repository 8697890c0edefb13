//! Error surface for the Magpie front-end.
//!
//! The parser itself accumulates plain formatted messages so a single
//! run can report every syntax problem it finds; this module wraps the
//! collected lists into one value that implements `std::error::Error`
//! for callers that want a conventional `Result` boundary.

#[cfg(test)]
mod tests;

use std::fmt;

/// Every syntax error collected while parsing one source file.
///
/// `messages` and `lines` are index-aligned: `lines[i]` is the
/// `"filename:line"` location of `messages[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxErrors {
    messages: Vec<String>,
    lines: Vec<String>,
}

impl SyntaxErrors {
    pub fn new(messages: Vec<String>, lines: Vec<String>) -> Self {
        debug_assert_eq!(messages.len(), lines.len());
        Self { messages, lines }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl fmt::Display for SyntaxErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(message)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxErrors {}
