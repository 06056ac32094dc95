//! Backend-agnostic query model.
//!
//! A search is described as a tree: [`Query`] leaves pair a search term with a
//! handler (the field or search type it targets), and [`QueryGroup`] nodes join
//! their children with a [`BooleanOperator`]. The tree is built bottom-up and
//! walked top-down by a query builder, so groups own their children outright and
//! keep no parent links.
//!
//! # Examples
//!
//! ```
//! use findcore::query::{BooleanOperator, Query, QueryGroup};
//!
//! let mut group = QueryGroup::new("AND", Vec::new(), None).unwrap();
//! group.add_query(Query::new("dickens", Some("Author")));
//! group.add_query(Query::new("london", None));
//!
//! assert_eq!(group.operator(), BooleanOperator::And);
//! assert_eq!(group.to_string(), "(Author:dickens AND AllFields:london)");
//! ```

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Handler used when a query does not name one.
pub const DEFAULT_HANDLER: &str = "AllFields";

/// A single search term paired with an optional handler.
///
/// Immutable once built; two queries are equal when term and handler match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    term: String,
    handler: Option<String>,
}

impl Query {
    /// Create a query for `term`, optionally restricted to `handler`.
    ///
    /// Whether an empty term is acceptable is left to the caller.
    #[must_use]
    pub fn new(term: impl Into<String>, handler: Option<&str>) -> Self {
        Query {
            term: term.into(),
            handler: handler.map(str::to_string),
        }
    }

    /// The search term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The handler, falling back to [`DEFAULT_HANDLER`].
    #[must_use]
    pub fn handler(&self) -> &str {
        self.handler.as_deref().unwrap_or(DEFAULT_HANDLER)
    }

    /// Whether a handler was given explicitly.
    #[must_use]
    pub fn has_explicit_handler(&self) -> bool {
        self.handler.is_some()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.handler(), self.term)
    }
}

/// Boolean operator joining the children of a [`QueryGroup`].
///
/// Only `AND` and `OR` are stored; `NOT` is accepted on input and normalized to
/// `OR` plus negation of the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanOperator {
    /// All children must match
    And,
    /// Any child may match
    Or,
}

impl BooleanOperator {
    /// Upper-case operator keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for BooleanOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of parsing an operator keyword: the stored operator and whether the
/// keyword asked for negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedOperator {
    /// Normalized operator
    pub operator: BooleanOperator,
    /// True when the keyword was `NOT`
    pub negated: bool,
}

impl FromStr for ParsedOperator {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "AND" => Ok(ParsedOperator {
                operator: BooleanOperator::And,
                negated: false,
            }),
            "OR" => Ok(ParsedOperator {
                operator: BooleanOperator::Or,
                negated: false,
            }),
            "NOT" => Ok(ParsedOperator {
                operator: BooleanOperator::Or,
                negated: true,
            }),
            other => Err(SearchError::InvalidArgument(format!(
                "Unknown or invalid boolean operator: {other}"
            ))),
        }
    }
}

/// A node of the query tree: either a leaf query or a nested group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryNode {
    /// Single term/handler pair
    Query(Query),
    /// Boolean group of further nodes
    Group(QueryGroup),
}

impl QueryNode {
    /// Collect every leaf query, depth first, in child order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&Query> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Query>) {
        match self {
            QueryNode::Query(q) => out.push(q),
            QueryNode::Group(g) => {
                for child in g.queries() {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

impl From<Query> for QueryNode {
    fn from(query: Query) -> Self {
        QueryNode::Query(query)
    }
}

impl From<QueryGroup> for QueryNode {
    fn from(group: QueryGroup) -> Self {
        QueryNode::Group(group)
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryNode::Query(q) => write!(f, "{q}"),
            QueryNode::Group(g) => write!(f, "{g}"),
        }
    }
}

/// A boolean group of queries.
///
/// Children keep their insertion order, which downstream query builders rely on
/// when generating boolean expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryGroup {
    operator: BooleanOperator,
    negated: bool,
    queries: Vec<QueryNode>,
    reduced_handler: Option<String>,
}

impl QueryGroup {
    /// Create a group from an operator keyword (`AND`, `OR` or `NOT`).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidArgument`] for any other keyword.
    pub fn new(
        operator: &str,
        queries: Vec<QueryNode>,
        reduced_handler: Option<&str>,
    ) -> Result<Self> {
        let mut group = QueryGroup {
            operator: BooleanOperator::And,
            negated: false,
            queries: Vec::new(),
            reduced_handler: None,
        };
        group.set_operator(operator)?;
        group.set_queries(queries);
        group.set_reduced_handler(reduced_handler);
        Ok(group)
    }

    /// Set the boolean operator from a keyword.
    ///
    /// `NOT` stores `OR` and marks the group negated. A later `AND`/`OR` changes
    /// the operator but leaves an earlier negation in place.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidArgument`] for an unknown keyword; the group
    /// is left untouched in that case.
    pub fn set_operator(&mut self, operator: &str) -> Result<()> {
        let parsed: ParsedOperator = operator.parse()?;
        self.operator = parsed.operator;
        if parsed.negated {
            self.negated = true;
        }
        Ok(())
    }

    /// The stored operator (never `NOT`).
    #[must_use]
    pub fn operator(&self) -> BooleanOperator {
        self.operator
    }

    /// True when the group was built (or re-set) with `NOT`.
    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Append a child.
    pub fn add_query(&mut self, query: impl Into<QueryNode>) {
        self.queries.push(query.into());
    }

    /// Append each of `queries` in order.
    pub fn set_queries(&mut self, queries: Vec<QueryNode>) {
        for query in queries {
            self.add_query(query);
        }
    }

    /// Children in insertion order.
    #[must_use]
    pub fn queries(&self) -> &[QueryNode] {
        &self.queries
    }

    /// Handler hint for query builders that can collapse this group into a
    /// single handler call. `None` means no reduction.
    #[must_use]
    pub fn reduced_handler(&self) -> Option<&str> {
        self.reduced_handler.as_deref()
    }

    /// Set or clear the reduced handler hint.
    pub fn set_reduced_handler(&mut self, handler: Option<&str>) {
        self.reduced_handler = handler.map(str::to_string);
    }

    /// Clear the reduced handler hint.
    pub fn unset_reduced_handler(&mut self) {
        self.reduced_handler = None;
    }
}

impl fmt::Display for QueryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("NOT ")?;
        }
        f.write_str("(")?;
        for (i, child) in self.queries.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.operator)?;
            }
            write!(f, "{child}")?;
        }
        f.write_str(")")
    }
}
