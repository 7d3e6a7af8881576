use crate::core::{
    CellAlign, ColumnSpec, EntitySpec, HtmlCell, HtmlTable, LineStyle, ResolvedStyle, TextSpan,
};

/// Outline and border settings shared by table-shaped nodes
pub(crate) fn styled_table(style: &ResolvedStyle) -> HtmlTable {
    let mut table = HtmlTable::new();
    table.color = Some(style.line_color.to_string());
    match style.line_style {
        LineStyle::Solid => {}
        LineStyle::Bold => table.cell_border = 2,
        LineStyle::Dashed | LineStyle::Dotted | LineStyle::Invisible => {
            table.style = Some(style.line_style.dot_name().to_string());
        }
    }
    table
}

fn column_line(column: &ColumnSpec) -> Vec<TextSpan> {
    let mut name = TextSpan::plain(column.name.as_str());
    if column.primary_key {
        name = name.underline();
    }
    if column.foreign_key {
        name = name.italic();
    }

    let mut spans = vec![name];
    if let Some(data_type) = &column.data_type {
        spans.push(TextSpan::plain(format!(" : {}", data_type)));
    }

    let marker = match (column.primary_key, column.foreign_key) {
        (true, true) => Some("PK, FK"),
        (true, false) => Some("PK"),
        (false, true) => Some("FK"),
        (false, false) => None,
    };
    if let Some(marker) = marker {
        spans.push(TextSpan::plain(format!("  {}", marker)).bold());
    }
    spans
}

/// HTML label for an ER table: a header row, then one row per column
pub fn table_label(entity: &EntitySpec, style: &ResolvedStyle) -> HtmlTable {
    let mut header = HtmlCell::line(vec![TextSpan::plain(entity.display_label()).bold()]);
    if style.filled {
        header = header.with_bgcolor(style.fill_color.to_string());
    }

    entity.columns.iter().fold(styled_table(style).row(header), |table, column| {
        table.row(HtmlCell::line(column_line(column)).with_align(CellAlign::Left))
    })
}
