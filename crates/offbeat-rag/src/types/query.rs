//! Query types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A validated, non-empty travel question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Trim the input and reject it if nothing is left
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Body of `POST /api/query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The travel question to answer
    pub question: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let query = Query::parse("  offbeat places near Manali \n").unwrap();
        assert_eq!(query.as_str(), "offbeat places near Manali");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(matches!(Query::parse(""), Err(Error::EmptyQuery)));
        assert!(matches!(Query::parse(" \t\n"), Err(Error::EmptyQuery)));
    }
}
