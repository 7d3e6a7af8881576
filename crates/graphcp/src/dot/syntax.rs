//! DOT grammar checker
//!
//! A chumsky parser for the Graphviz DOT language. It is used to verify
//! that emitted documents are well-formed and to validate caller-supplied
//! documents before they are handed to the renderer.
//!
//! Supported: `strict`, `graph`/`digraph`, node/edge/attribute statements,
//! `key=value` statements, subgraphs (named and anonymous), edge chains with
//! subgraph endpoints, ports, quoted strings with `+` concatenation, HTML
//! strings, and `//`, `/* */` and `#` comments. Keywords are
//! case-insensitive.

use chumsky::prelude::*;
use tracing::{debug, span, trace, warn, Level};

use crate::core::{is_dot_keyword, DiagramError, Result};

/// A `key=value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotAttr {
    pub key: String,
    pub value: String,
}

/// Target of an attribute statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrTarget {
    Graph,
    Node,
    Edge,
}

/// A node reference with an optional port (`id:port:compass`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub id: String,
    pub port: Option<String>,
}

/// Edge operator as written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOp {
    /// `->`
    Directed,
    /// `--`
    Undirected,
}

/// One end of an edge chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeEnd {
    Node(NodeRef),
    Subgraph(DotSubgraph),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotSubgraph {
    pub id: Option<String>,
    pub statements: Vec<DotStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotStatement {
    Node {
        node: NodeRef,
        attrs: Vec<DotAttr>,
    },
    /// `a -> b -> c [attrs]`; each operator carries its byte offset
    Edge {
        ends: Vec<EdgeEnd>,
        ops: Vec<(EdgeOp, usize)>,
        attrs: Vec<DotAttr>,
    },
    Attr {
        target: AttrTarget,
        attrs: Vec<DotAttr>,
    },
    Assign(DotAttr),
    Subgraph(DotSubgraph),
}

/// A parsed DOT document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotGraph {
    pub strict: bool,
    pub directed: bool,
    pub id: Option<String>,
    pub statements: Vec<DotStatement>,
}

impl DotGraph {
    /// Every node ID mentioned in the document, in first-seen order
    pub fn node_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        collect_node_ids(&self.statements, &mut ids);
        ids
    }

    /// Number of individual edges, counting each link of a chain
    pub fn edge_count(&self) -> usize {
        count_edges(&self.statements)
    }

    /// Number of subgraphs whose name starts with `cluster`
    pub fn cluster_count(&self) -> usize {
        count_subgraphs(&self.statements, true)
    }

    /// Number of subgraphs, named or anonymous
    pub fn subgraph_count(&self) -> usize {
        count_subgraphs(&self.statements, false)
    }

    /// Value of a top-level `key=value` statement or `graph [key=value]`
    pub fn graph_attr(&self, key: &str) -> Option<&str> {
        self.statements.iter().rev().find_map(|stmt| match stmt {
            DotStatement::Assign(attr) if attr.key == key => Some(attr.value.as_str()),
            DotStatement::Attr {
                target: AttrTarget::Graph,
                attrs,
            } => attrs
                .iter()
                .rev()
                .find(|a| a.key == key)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }
}

fn push_unique(ids: &mut Vec<String>, id: &str) {
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
    }
}

fn collect_node_ids(statements: &[DotStatement], ids: &mut Vec<String>) {
    for stmt in statements {
        match stmt {
            DotStatement::Node { node, .. } => push_unique(ids, &node.id),
            DotStatement::Edge { ends, .. } => {
                for end in ends {
                    match end {
                        EdgeEnd::Node(node) => push_unique(ids, &node.id),
                        EdgeEnd::Subgraph(sub) => collect_node_ids(&sub.statements, ids),
                    }
                }
            }
            DotStatement::Subgraph(sub) => collect_node_ids(&sub.statements, ids),
            DotStatement::Attr { .. } | DotStatement::Assign(_) => {}
        }
    }
}

fn count_edges(statements: &[DotStatement]) -> usize {
    statements
        .iter()
        .map(|stmt| match stmt {
            DotStatement::Edge { ops, ends, .. } => {
                let nested: usize = ends
                    .iter()
                    .map(|end| match end {
                        EdgeEnd::Subgraph(sub) => count_edges(&sub.statements),
                        EdgeEnd::Node(_) => 0,
                    })
                    .sum();
                ops.len() + nested
            }
            DotStatement::Subgraph(sub) => count_edges(&sub.statements),
            _ => 0,
        })
        .sum()
}

fn count_subgraphs(statements: &[DotStatement], clusters_only: bool) -> usize {
    let counts = |sub: &DotSubgraph| {
        let own = if clusters_only {
            sub.id.as_deref().is_some_and(|id| id.starts_with("cluster"))
        } else {
            true
        };
        usize::from(own) + count_subgraphs(&sub.statements, clusters_only)
    };
    statements
        .iter()
        .map(|stmt| match stmt {
            DotStatement::Subgraph(sub) => counts(sub),
            DotStatement::Edge { ends, .. } => ends
                .iter()
                .map(|end| match end {
                    EdgeEnd::Subgraph(sub) => counts(sub),
                    EdgeEnd::Node(_) => 0,
                })
                .sum(),
            _ => 0,
        })
        .sum()
}

/// Whitespace and comments
fn padding<'src>() -> impl Parser<'src, &'src str, (), extra::Err<Rich<'src, char>>> + Clone {
    let line_comment = just("//")
        .or(just("#"))
        .then(none_of("\n").repeated())
        .ignored();
    let block_comment = just("/*")
        .then(any().and_is(just("*/").not()).repeated())
        .then(just("*/"))
        .ignored();
    choice((one_of(" \t\n\r").ignored(), line_comment, block_comment))
        .repeated()
        .ignored()
}

/// A single punctuation character followed by padding
fn symbol<'src>(
    c: char,
) -> impl Parser<'src, &'src str, char, extra::Err<Rich<'src, char>>> + Clone {
    just(c).then_ignore(padding())
}

/// An alphanumeric word, not starting with a digit
fn bare_word<'src>() -> impl Parser<'src, &'src str, &'src str, extra::Err<Rich<'src, char>>> + Clone
{
    any()
        .filter(|c: &char| c.is_alphabetic() || *c == '_')
        .then(
            any()
                .filter(|c: &char| c.is_alphanumeric() || *c == '_')
                .repeated(),
        )
        .to_slice()
}

/// A case-insensitive keyword followed by padding
fn keyword<'src>(
    word: &'static str,
) -> impl Parser<'src, &'src str, (), extra::Err<Rich<'src, char>>> + Clone {
    bare_word()
        .filter(move |w: &&str| w.eq_ignore_ascii_case(word))
        .ignored()
        .then_ignore(padding())
}

fn numeral<'src>() -> impl Parser<'src, &'src str, String, extra::Err<Rich<'src, char>>> + Clone {
    let digits = any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1);
    let fraction = just('.').then(digits.clone());
    let trailing = just('.').then(digits.clone().or_not());
    just('-')
        .or_not()
        .then(choice((
            fraction.ignored(),
            digits.then(trailing.or_not()).ignored(),
        )))
        .to_slice()
        .map(|s: &str| s.to_string())
}

/// `"..."` with `\"` escapes, joined by `+`
fn quoted<'src>() -> impl Parser<'src, &'src str, String, extra::Err<Rich<'src, char>>> + Clone {
    let escaped = just('\\').then(any()).ignored();
    let plain = none_of("\\\"").ignored();
    let single = escaped
        .or(plain)
        .repeated()
        .to_slice()
        .delimited_by(just('"'), just('"'))
        .map(|s: &str| s.replace("\\\"", "\""));
    single
        .separated_by(just('+').padded_by(padding()))
        .at_least(1)
        .collect::<Vec<String>>()
        .map(|parts| parts.concat())
}

/// `<...>` with balanced nested angle brackets, kept verbatim
fn html<'src>() -> impl Parser<'src, &'src str, String, extra::Err<Rich<'src, char>>> + Clone {
    recursive(|nested| {
        none_of("<>")
            .ignored()
            .or(nested)
            .repeated()
            .delimited_by(just('<'), just('>'))
            .ignored()
    })
    .to_slice()
    .map(|s: &str| s.to_string())
}

/// Any DOT ID followed by padding
fn id<'src>() -> impl Parser<'src, &'src str, String, extra::Err<Rich<'src, char>>> + Clone {
    let identifier = bare_word()
        .filter(|w: &&str| !is_dot_keyword(w))
        .map(|w: &str| w.to_string());
    choice((html(), quoted(), numeral(), identifier)).then_ignore(padding())
}

fn attr<'src>() -> impl Parser<'src, &'src str, DotAttr, extra::Err<Rich<'src, char>>> + Clone {
    id().then_ignore(symbol('='))
        .then(id())
        .map(|(key, value)| DotAttr { key, value })
}

/// One or more `[ ... ]` blocks, flattened
fn attr_list<'src>(
) -> impl Parser<'src, &'src str, Vec<DotAttr>, extra::Err<Rich<'src, char>>> + Clone {
    let separator = one_of(";,").then_ignore(padding()).or_not();
    attr()
        .then_ignore(separator)
        .repeated()
        .collect::<Vec<DotAttr>>()
        .delimited_by(symbol('['), symbol(']'))
        .repeated()
        .at_least(1)
        .collect::<Vec<Vec<DotAttr>>>()
        .map(|blocks| blocks.into_iter().flatten().collect())
}

fn node_ref<'src>() -> impl Parser<'src, &'src str, NodeRef, extra::Err<Rich<'src, char>>> + Clone
{
    let port = symbol(':').ignore_then(id());
    id().then(port.repeated().at_most(2).collect::<Vec<String>>())
        .map(|(id, ports)| NodeRef {
            id,
            port: if ports.is_empty() {
                None
            } else {
                Some(ports.join(":"))
            },
        })
}

fn statements<'src>(
) -> impl Parser<'src, &'src str, Vec<DotStatement>, extra::Err<Rich<'src, char>>> + Clone {
    recursive(|stmt_list| {
        let subgraph = keyword("subgraph")
            .ignore_then(id().or_not())
            .or_not()
            .then(stmt_list.delimited_by(symbol('{'), symbol('}')))
            .map(|(id, statements)| DotSubgraph {
                id: id.flatten(),
                statements,
            });

        let edge_end = subgraph
            .clone()
            .map(EdgeEnd::Subgraph)
            .or(node_ref().map(EdgeEnd::Node));

        let edge_op = just("->")
            .to(EdgeOp::Directed)
            .or(just("--").to(EdgeOp::Undirected))
            .map_with(|op, e| {
                let s: SimpleSpan = e.span();
                (op, s.start)
            })
            .then_ignore(padding());

        let edge_stmt = edge_end
            .clone()
            .then(
                edge_op
                    .then(edge_end)
                    .repeated()
                    .at_least(1)
                    .collect::<Vec<_>>(),
            )
            .then(attr_list().or_not())
            .map(|((first, links), attrs)| {
                let mut ends = vec![first];
                let mut ops = Vec::with_capacity(links.len());
                for (op, end) in links {
                    ops.push(op);
                    ends.push(end);
                }
                DotStatement::Edge {
                    ends,
                    ops,
                    attrs: attrs.unwrap_or_default(),
                }
            });

        let attr_stmt = choice((
            keyword("graph").to(AttrTarget::Graph),
            keyword("node").to(AttrTarget::Node),
            keyword("edge").to(AttrTarget::Edge),
        ))
        .then(attr_list())
        .map(|(target, attrs)| DotStatement::Attr { target, attrs });

        let node_stmt = node_ref()
            .then(attr_list().or_not())
            .map(|(node, attrs)| DotStatement::Node {
                node,
                attrs: attrs.unwrap_or_default(),
            });

        choice((
            attr_stmt,
            edge_stmt,
            subgraph.map(DotStatement::Subgraph),
            attr().map(DotStatement::Assign),
            node_stmt,
        ))
        .then_ignore(symbol(';').or_not())
        .repeated()
        .collect::<Vec<DotStatement>>()
    })
}

fn graph<'src>() -> impl Parser<'src, &'src str, DotGraph, extra::Err<Rich<'src, char>>> + Clone {
    padding()
        .ignore_then(keyword("strict").or_not().map(|s| s.is_some()))
        .then(keyword("graph").to(false).or(keyword("digraph").to(true)))
        .then(id().or_not())
        .then(statements().delimited_by(symbol('{'), symbol('}')))
        .then_ignore(end())
        .map(|(((strict, directed), id), statements)| DotGraph {
            strict,
            directed,
            id,
            statements,
        })
}

/// 1-based line and column of a byte offset
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let prefix = source.get(..offset).unwrap_or(source);
    let line = prefix.matches('\n').count() + 1;
    let column = match prefix.rfind('\n') {
        Some(newline) => prefix[newline + 1..].chars().count() + 1,
        None => prefix.chars().count() + 1,
    };
    (line, column)
}

/// `source` without leading whitespace and comments
fn skip_leading_trivia(source: &str) -> &str {
    let mut rest = source.trim_start();
    loop {
        if rest.starts_with("//") || rest.starts_with('#') {
            rest = rest.find('\n').map_or("", |end| &rest[end..]).trim_start();
        } else if let Some(body) = rest.strip_prefix("/*") {
            rest = body.find("*/").map_or("", |end| &body[end + 2..]).trim_start();
        } else {
            return rest;
        }
    }
}

/// The header must open with `[strict] graph` or `[strict] digraph`
fn has_graph_header(source: &str) -> bool {
    let trimmed = skip_leading_trivia(source);
    let mut words = trimmed.split(|c: char| c.is_whitespace() || c == '{');
    let mut first = words.next().unwrap_or_default();
    if first.eq_ignore_ascii_case("strict") {
        first = words.find(|w| !w.is_empty()).unwrap_or_default();
    }
    first.eq_ignore_ascii_case("graph") || first.eq_ignore_ascii_case("digraph")
}

/// Offset of the first unbalanced brace outside strings and comments
fn unbalanced_brace(source: &str) -> Option<usize> {
    let mut open: Vec<usize> = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut html_depth = 0usize;
    let mut chars = source.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        if in_quotes {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {}
            }
            continue;
        }
        if html_depth > 0 {
            match c {
                '<' => html_depth += 1,
                '>' => html_depth -= 1,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            '<' => html_depth = 1,
            '#' => skip_line(&mut chars),
            '/' if matches!(chars.peek(), Some((_, '/'))) => skip_line(&mut chars),
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut previous = ' ';
                for (_, c) in chars.by_ref() {
                    if previous == '*' && c == '/' {
                        break;
                    }
                    previous = c;
                }
            }
            '{' => open.push(offset),
            '}' => {
                if open.pop().is_none() {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }
    open.first().copied()
}

fn skip_line<I>(chars: &mut I)
where
    I: Iterator<Item = (usize, char)>,
{
    for (_, c) in chars.by_ref() {
        if c == '\n' {
            break;
        }
    }
}

/// Verify that `source` is a well-formed DOT document
///
/// Cheap structural checks run first so the most common mistakes get a
/// direct message; then the full grammar is applied. Edge operators must
/// match the graph kind.
pub fn check_dot(source: &str) -> Result<DotGraph> {
    let span = span!(Level::DEBUG, "check_dot", bytes = source.len());
    let _enter = span.enter();

    if source.trim().is_empty() {
        warn!("Rejected empty DOT document");
        return Err(DiagramError::dot_syntax("document is empty", 1, 1));
    }

    if !has_graph_header(source) {
        let start = source.len() - skip_leading_trivia(source).len();
        let (line, column) = line_column(source, start);
        warn!(line, column, "Rejected DOT document without graph header");
        return Err(DiagramError::dot_syntax(
            "document must start with 'graph' or 'digraph'",
            line,
            column,
        ));
    }

    if let Some(offset) = unbalanced_brace(source) {
        let (line, column) = line_column(source, offset);
        warn!(line, column, "Rejected DOT document with unbalanced braces");
        return Err(DiagramError::dot_syntax("unbalanced braces", line, column));
    }

    let parsed = graph().parse(source).into_result().map_err(|errors| {
        let (message, offset) = errors
            .first()
            .map(|e| (e.to_string(), e.span().start))
            .unwrap_or_else(|| ("invalid DOT document".to_string(), 0));
        let (line, column) = line_column(source, offset);
        warn!(line, column, error = %message, "DOT grammar rejected document");
        DiagramError::dot_syntax(message, line, column)
    })?;

    check_edge_ops(source, parsed.directed, &parsed.statements)?;

    debug!(
        directed = parsed.directed,
        statements = parsed.statements.len(),
        "DOT document accepted"
    );
    Ok(parsed)
}

fn check_edge_ops(source: &str, directed: bool, statements: &[DotStatement]) -> Result<()> {
    let expected = if directed {
        EdgeOp::Directed
    } else {
        EdgeOp::Undirected
    };
    for stmt in statements {
        match stmt {
            DotStatement::Edge { ends, ops, .. } => {
                if let Some((_, offset)) = ops.iter().find(|(op, _)| *op != expected) {
                    let (line, column) = line_column(source, *offset);
                    let message = if directed {
                        "'--' used in a digraph"
                    } else {
                        "'->' used in an undirected graph"
                    };
                    trace!(line, column, "Edge operator mismatch");
                    return Err(DiagramError::dot_syntax(message, line, column));
                }
                for end in ends {
                    if let EdgeEnd::Subgraph(sub) = end {
                        check_edge_ops(source, directed, &sub.statements)?;
                    }
                }
            }
            DotStatement::Subgraph(sub) => check_edge_ops(source, directed, &sub.statements)?,
            _ => {}
        }
    }
    Ok(())
}
