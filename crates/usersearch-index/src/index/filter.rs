//! Conjunctive exact-match filter expressions.
//!
//! Textual form: `Mail = "a@x.com" AND UserID = "7"`. Field names are
//! case-insensitive and `AND` between predicates is optional, so the
//! concatenated form `Mail = "a@x.com"UserID = "7"` is accepted too.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use usersearch_core::model::FilterField;

use crate::error::{IndexError, IndexResult};

/// One exact-match predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub field: FilterField,
    pub value: String,
}

/// ## Summary
/// AND-ed list of exact-match predicates. An empty expression matches every
/// document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpression {
    clauses: Vec<FilterClause>,
}

impl FilterExpression {
    #[must_use]
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Adds a predicate, builder style.
    #[must_use]
    pub fn and(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.push(field, value);
        self
    }

    pub fn push(&mut self, field: FilterField, value: impl Into<String>) {
        self.clauses.push(FilterClause {
            field,
            value: value.into(),
        });
    }

    /// Appends every predicate of `other`.
    pub fn extend(&mut self, other: Self) {
        self.clauses.extend(other.clauses);
    }

    #[must_use]
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    #[must_use]
    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }

    /// ## Summary
    /// Order-independent rendering used to fingerprint cursors.
    #[must_use]
    pub fn canonical(&self) -> String {
        let mut rendered: Vec<String> = self.clauses.iter().map(render_clause).collect();
        rendered.sort_unstable();
        rendered.dedup();
        rendered.join(" AND ")
    }

    /// ## Summary
    /// Parses the textual filter syntax.
    ///
    /// Blank input parses to the match-all expression.
    ///
    /// ## Errors
    /// Returns `IndexError::QueryInvalid` for malformed syntax, unterminated
    /// strings or unknown field names.
    pub fn parse(input: &str) -> IndexResult<Self> {
        let mut parser = Parser {
            input,
            chars: input.char_indices().peekable(),
        };
        parser.parse_expression()
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.clauses.iter().map(render_clause).collect();
        f.write_str(&rendered.join(" AND "))
    }
}

fn render_clause(clause: &FilterClause) -> String {
    let escaped = clause.value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{} = \"{escaped}\"", clause.field.index_name())
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn parse_expression(&mut self) -> IndexResult<FilterExpression> {
        let mut expression = FilterExpression::match_all();

        self.skip_whitespace();
        if self.chars.peek().is_none() {
            return Ok(expression);
        }

        loop {
            let clause = self.parse_clause()?;
            expression.clauses.push(clause);

            self.skip_whitespace();
            if self.chars.peek().is_none() {
                return Ok(expression);
            }

            // Optional conjunction keyword.
            let checkpoint = self.chars.clone();
            let word = self.identifier();
            if !word.eq_ignore_ascii_case("and") {
                self.chars = checkpoint;
            }
            self.skip_whitespace();
            if self.chars.peek().is_none() {
                return Err(invalid("expected a predicate after AND"));
            }
        }
    }

    fn parse_clause(&mut self) -> IndexResult<FilterClause> {
        let name = self.identifier();
        if name.is_empty() {
            return Err(invalid(format!(
                "expected a field name at offset {}",
                self.offset()
            )));
        }
        let field = FilterField::from_name(name)
            .ok_or_else(|| invalid(format!("unknown field: {name}")))?;

        self.skip_whitespace();
        match self.chars.next() {
            Some((_, '=')) => {}
            Some((at, c)) => {
                return Err(invalid(format!("expected '=' at offset {at}, found {c:?}")));
            }
            None => return Err(invalid("expected '=' after field name")),
        }

        self.skip_whitespace();
        let value = self.quoted()?;
        Ok(FilterClause { field, value })
    }

    fn identifier(&mut self) -> &'a str {
        let start = self.offset();
        while let Some((_, c)) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || *c == '_' {
                self.chars.next();
            } else {
                break;
            }
        }
        &self.input[start..self.offset()]
    }

    fn quoted(&mut self) -> IndexResult<String> {
        match self.chars.next() {
            Some((_, '"')) => {}
            Some((at, c)) => {
                return Err(invalid(format!(
                    "expected '\"' at offset {at}, found {c:?}"
                )));
            }
            None => return Err(invalid("expected a quoted value")),
        }

        let mut value = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '"' => return Ok(value),
                '\\' => match self.chars.next() {
                    Some((_, escaped)) => value.push(escaped),
                    None => break,
                },
                other => value.push(other),
            }
        }
        Err(invalid("unterminated quoted value"))
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |(at, _)| *at)
    }
}

fn invalid(message: impl Into<String>) -> IndexError {
    IndexError::QueryInvalid(message.into())
}
