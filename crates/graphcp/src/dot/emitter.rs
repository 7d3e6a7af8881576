//! DOT document emitter
//!
//! Serializes a [`GraphModel`] into Graphviz DOT text. All layout and style
//! decisions were made by the builder; the emitter only fixes the statement
//! order and the quoting, so identical models produce identical bytes.

use std::fmt::Write;

use tracing::{debug, info, span, Level};

use super::escape::{escape_html, quote};
use super::Emitter;
use crate::core::{
    AttrValue, Attributes, CellAlign, Cluster, GraphModel, HtmlCell, HtmlTable, Result, TextSpan,
};

const INDENT: &str = "    ";

/// Emits Graphviz DOT text
#[derive(Debug, Clone, Default)]
pub struct DotEmitter;

impl DotEmitter {
    pub fn new() -> Self {
        Self
    }

    fn write_attr_statements(&self, out: &mut String, attrs: &Attributes, depth: usize) {
        let indent = INDENT.repeat(depth);
        for (key, value) in attrs.iter() {
            let _ = writeln!(out, "{}{}={};", indent, key, attr_value(value));
        }
    }

    fn write_cluster(&self, out: &mut String, model: &GraphModel, cluster: &Cluster, depth: usize) {
        let indent = INDENT.repeat(depth);
        let _ = writeln!(out, "{}subgraph {} {{", indent, quote(&cluster.id));
        self.write_attr_statements(out, &cluster.attrs, depth + 1);

        for &index in &cluster.nodes {
            if let Some(node) = model.nodes().get(index) {
                let _ = writeln!(
                    out,
                    "{}{}{};",
                    INDENT.repeat(depth + 1),
                    quote(&node.id),
                    attr_list(&node.attrs)
                );
            }
        }
        for &child in &cluster.children {
            if let Some(child) = model.cluster(child) {
                self.write_cluster(out, model, child, depth + 1);
            }
        }
        let _ = writeln!(out, "{}}}", indent);
    }
}

impl Emitter for DotEmitter {
    type Output = String;

    fn emit(&self, model: &GraphModel) -> Result<Self::Output> {
        let span = span!(
            Level::INFO,
            "emit_document",
            nodes = model.node_count(),
            edges = model.edge_count(),
            clusters = model.cluster_count()
        );
        let _enter = span.enter();

        let mut out = String::new();
        let keyword = if model.directed { "digraph" } else { "graph" };
        let _ = writeln!(out, "{} {} {{", keyword, quote(&model.name));

        self.write_attr_statements(&mut out, &model.graph_attrs, 1);
        if !model.node_defaults.is_empty() {
            let _ = writeln!(out, "{}node{};", INDENT, attr_list(&model.node_defaults));
        }
        if !model.edge_defaults.is_empty() {
            let _ = writeln!(out, "{}edge{};", INDENT, attr_list(&model.edge_defaults));
        }

        if model.node_count() > 0 {
            out.push('\n');
        }
        for node in model.root_nodes() {
            let _ = writeln!(out, "{}{}{};", INDENT, quote(&node.id), attr_list(&node.attrs));
        }

        for &index in model.root_clusters() {
            if let Some(cluster) = model.cluster(index) {
                out.push('\n');
                self.write_cluster(&mut out, model, cluster, 1);
            }
        }

        if model.edge_count() > 0 {
            out.push('\n');
        }
        let op = model.edge_op();
        for edge in model.edges() {
            let _ = writeln!(
                out,
                "{}{} {} {}{};",
                INDENT,
                quote(&edge.from),
                op,
                quote(&edge.to),
                attr_list(&edge.attrs)
            );
        }

        for rank in model.ranks() {
            let members: Vec<String> = rank.nodes.iter().map(|id| quote(id)).collect();
            let _ = writeln!(
                out,
                "{}{{ rank={}; {}; }}",
                INDENT,
                rank.rank,
                members.join("; ")
            );
        }

        out.push_str("}\n");

        debug!(bytes = out.len(), "Serialized DOT document");
        info!("Document emitted");
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "dot"
    }

    fn format(&self) -> &'static str {
        "dot"
    }

    fn extension(&self) -> &'static str {
        "dot"
    }
}

/// ` [k=v, k=v]`, or nothing for an empty list
fn attr_list(attrs: &Attributes) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    let items: Vec<String> = attrs
        .iter()
        .map(|(key, value)| format!("{}={}", key, attr_value(value)))
        .collect();
    format!(" [{}]", items.join(", "))
}

fn attr_value(value: &AttrValue) -> String {
    match value {
        AttrValue::Text(text) => quote(text),
        AttrValue::Html(table) => format!("<{}>", html_table(table)),
    }
}

fn html_table(table: &HtmlTable) -> String {
    let mut out = format!(
        "<TABLE BORDER=\"{}\" CELLBORDER=\"{}\" CELLSPACING=\"0\" CELLPADDING=\"{}\"",
        table.border, table.cell_border, table.cell_padding
    );
    if let Some(color) = &table.color {
        let _ = write!(out, " COLOR=\"{}\"", escape_html(color));
    }
    if let Some(bgcolor) = &table.bgcolor {
        let _ = write!(out, " BGCOLOR=\"{}\"", escape_html(bgcolor));
    }
    if let Some(style) = &table.style {
        let _ = write!(out, " STYLE=\"{}\"", escape_html(style));
    }
    out.push('>');
    for cell in &table.rows {
        out.push_str("<TR>");
        out.push_str(&html_cell(cell));
        out.push_str("</TR>");
    }
    out.push_str("</TABLE>");
    out
}

fn html_cell(cell: &HtmlCell) -> String {
    let mut out = String::from("<TD");
    if cell.align == CellAlign::Left {
        out.push_str(" ALIGN=\"LEFT\" BALIGN=\"LEFT\"");
    }
    if let Some(bgcolor) = &cell.bgcolor {
        let _ = write!(out, " BGCOLOR=\"{}\"", escape_html(bgcolor));
    }
    out.push('>');

    let lines: Vec<String> = cell
        .lines
        .iter()
        .flat_map(|spans| break_lines(spans))
        .map(|spans| spans.iter().map(html_span).collect::<String>())
        .collect();
    let content = lines.join("<BR/>");
    if content.is_empty() {
        out.push(' ');
    } else {
        out.push_str(&content);
    }
    out.push_str("</TD>");
    out
}

// Newlines inside span text start a new line of the cell; the pieces keep
// the formatting of the span they came from.
fn break_lines(spans: &[TextSpan]) -> Vec<Vec<TextSpan>> {
    let mut lines = vec![Vec::new()];
    for span in spans {
        for (i, piece) in span.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if let Some(line) = lines.last_mut() {
                line.push(TextSpan {
                    text: piece.trim_end_matches('\r').to_string(),
                    ..span.clone()
                });
            }
        }
    }
    lines
}

fn html_span(span: &TextSpan) -> String {
    if span.text.is_empty() {
        return String::new();
    }
    let mut text = escape_html(&span.text);
    if span.underline {
        text = format!("<U>{}</U>", text);
    }
    if span.italic {
        text = format!("<I>{}</I>", text);
    }
    if span.bold {
        text = format!("<B>{}</B>", text);
    }
    text
}
