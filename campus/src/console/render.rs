//! Plain-text rendering of table views for the console.

use tabula::node::{Content, Direction as Flow};
use tabula::prelude::*;
use tabula::table::ColumnView;
use tabula::toolbar::{ActionView, FilterEditorView, FilterSection, ToolbarView};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Narrowest a column is ever squeezed to.
const MIN_COLUMN_WIDTH: usize = 3;

// =============================================================================
// Text helpers
// =============================================================================

pub fn display_width(s: &str) -> usize {
    s.width()
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target = max_width - 1;
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

/// Pad (or truncate) to exactly `width` display columns.
pub fn fit(s: &str, width: usize) -> String {
    let text = truncate_to_width(s, width);
    let pad = width.saturating_sub(display_width(&text));
    format!("{}{}", text, " ".repeat(pad))
}

fn checkbox(state: PageSelection) -> &'static str {
    match state {
        PageSelection::None => "[ ]",
        PageSelection::Some => "[-]",
        PageSelection::All => "[x]",
    }
}

fn button(action: &ActionView) -> String {
    if action.enabled {
        format!("<{}>", action.label)
    } else {
        format!("({})", action.label)
    }
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// =============================================================================
// Nodes
// =============================================================================

/// One-line text of a node.
pub fn node_text(node: &Node) -> String {
    match &node.content {
        Content::None => String::new(),
        Content::Text(text) => text.clone(),
        Content::Checkbox {
            indeterminate: true,
            ..
        } => "[-]".to_string(),
        Content::Checkbox { checked: true, .. } => "[x]".to_string(),
        Content::Checkbox { .. } => "[ ]".to_string(),
        Content::Button { label, enabled } => button(&ActionView::new(label, *enabled)),
        Content::Input { value, placeholder } if value.is_empty() => {
            format!("[{}]", placeholder)
        }
        Content::Input { value, .. } => format!("[{}]", value),
        Content::Children(children) => children
            .iter()
            .map(node_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Lines of a node: column containers stack their children.
pub fn node_lines(node: &Node, out: &mut Vec<String>) {
    match (&node.content, node.direction) {
        (Content::Children(children), Flow::Column) => {
            for child in children {
                node_lines(child, out);
            }
        }
        _ => {
            let text = node_text(node);
            if !text.is_empty() {
                out.push(text);
            }
        }
    }
}

// =============================================================================
// Toolbar
// =============================================================================

fn toolbar(view: &ToolbarView, out: &mut Vec<String>) {
    let mut title = format!("== {} ==", view.title);
    if let Some(create) = &view.create {
        title = format!("{}  {}", title, button(create));
    }
    out.push(title);

    let search = if view.search.value.is_empty() {
        format!("Search: [{}]", view.search.placeholder)
    } else {
        format!("Search: [{}]", view.search.value)
    };
    out.push(if view.search.clearable {
        format!("{} (x)", search)
    } else {
        search
    });

    if let Some(filters) = &view.filters {
        filter_section(filters, out);
    }

    if let Some(selection) = &view.selection {
        out.push(format!(
            "{}  {} {}",
            selection.text,
            button(&selection.edit),
            button(&selection.delete)
        ));
    }
}

fn filter_section(section: &FilterSection, out: &mut Vec<String>) {
    if !section.chips.is_empty() {
        let chips: Vec<String> = section
            .chips
            .iter()
            .map(|chip| format!("[{}: {} x]", chip.label, chip.text))
            .collect();
        let mut line = format!("Filters: {}", chips.join(" "));
        if let Some(clear_all) = &section.clear_all {
            line = format!("{}  {}", line, button(clear_all));
        }
        out.push(line);
    }

    let picker: Vec<String> = section
        .picker
        .iter()
        .map(|option| {
            let marker = if section.picked.as_deref() == Some(option.key.as_str()) {
                ">"
            } else {
                ""
            };
            let applied = if option.applied { "*" } else { "" };
            format!("{}{}{} ({})", marker, option.label, applied, option.key)
        })
        .collect();
    out.push(format!("{}: {}", section.picker_placeholder, picker.join(" | ")));

    if let Some(editor) = &section.editor {
        out.push(format!("  {}", editor_line(editor)));
    }
}

fn editor_line(editor: &FilterEditorView) -> String {
    let control = match &editor.control {
        EditorControl::Text { value, placeholder } => {
            if value.is_empty() {
                format!("[{}]", placeholder)
            } else {
                format!("[{}]", value)
            }
        }
        EditorControl::Number {
            value,
            placeholder,
            min,
            max,
        } => {
            let shown = if value.is_empty() { placeholder } else { value };
            match (min, max) {
                (None, None) => format!("[{}]", shown),
                _ => format!("[{}] ({}..{})", shown, number(*min), number(*max)),
            }
        }
        EditorControl::Range {
            min,
            max,
            min_label,
            max_label,
            ..
        } => format!(
            "{} [{}]  {} [{}]",
            min_label,
            number(*min),
            max_label,
            number(*max)
        ),
        EditorControl::Select { options, selected } => options
            .iter()
            .map(|option| {
                if selected.as_deref() == Some(option.value.as_str()) {
                    format!("({}) {}", option.value, option.label)
                } else {
                    format!("{} {}", option.value, option.label)
                }
            })
            .collect::<Vec<_>>()
            .join(" | "),
        EditorControl::Date { value } => match value {
            Some(date) => format!("[{}]", date.format("%Y-%m-%d")),
            None => "[YYYY-MM-DD]".to_string(),
        },
    };

    let mut line = format!("{}: {}", editor.label, control);
    for action in [&editor.apply, &editor.clear].into_iter().flatten() {
        line = format!("{} {}", line, button(action));
    }
    line
}

// =============================================================================
// Grid
// =============================================================================

fn header(column: &ColumnView) -> String {
    if let Some(state) = column.checkbox {
        return checkbox(state).to_string();
    }
    match column.sort {
        Some(Direction::Asc) => format!("{} ^", column.header),
        Some(Direction::Desc) => format!("{} v", column.header),
        None => column.header.clone(),
    }
}

/// Column widths fitting `width`, shrinking the widest column first.
fn column_widths(cells: &[Vec<String>], width: usize) -> Vec<usize> {
    let count = cells.first().map_or(0, Vec::len);
    let mut widths: Vec<usize> = (0..count)
        .map(|i| {
            cells
                .iter()
                .map(|row| display_width(&row[i]))
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_WIDTH)
        })
        .collect();

    // Each column takes its width plus a " | " separator
    let budget = width.saturating_sub(count * 3 + 1);
    while widths.iter().sum::<usize>() > budget {
        let Some(widest) = widths
            .iter()
            .enumerate()
            .max_by_key(|(_, w)| **w)
            .map(|(i, _)| i)
        else {
            break;
        };
        if widths[widest] <= MIN_COLUMN_WIDTH {
            break;
        }
        widths[widest] -= 1;
    }
    widths
}

fn grid<R: Record>(view: &TableView<R>, width: usize, out: &mut Vec<String>) {
    let mut cells: Vec<Vec<String>> = vec![view.columns.iter().map(header).collect()];
    cells.extend(
        view.rows
            .iter()
            .map(|row| row.cells.iter().map(node_text).collect()),
    );

    let widths = column_widths(&cells, width);
    let rule = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let line = |row: &[String]| {
        let fitted: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| fit(cell, *w))
            .collect();
        format!("| {} |", fitted.join(" | "))
    };

    out.push(rule.clone());
    out.push(line(&cells[0][..]));
    out.push(rule.clone());
    for row in &cells[1..] {
        out.push(line(&row[..]));
    }
    if cells.len() > 1 {
        out.push(rule);
    }
}

// =============================================================================
// Screen
// =============================================================================

/// Render a table view, with `modal` as the body of the open modal when
/// the caller keeps a fresher one than the view's.
pub fn screen<R: Record>(view: &TableView<R>, modal: Option<&Node>, width: usize) -> String {
    let mut out = Vec::new();

    toolbar(&view.toolbar, &mut out);
    grid(view, width, &mut out);

    if let Some(empty) = &view.empty {
        out.push(empty.message.clone());
    }

    let mut footer = match &view.pagination {
        Some(pages) => {
            let numbers: Vec<String> = pages
                .window
                .iter()
                .map(|&i| {
                    if i == pages.page_index {
                        format!("[{}]", i + 1)
                    } else {
                        (i + 1).to_string()
                    }
                })
                .collect();
            format!(
                "{} {} {}  page {} of {}",
                button(&pages.previous),
                numbers.join(" "),
                button(&pages.next),
                pages.page_index + 1,
                pages.page_count
            )
        }
        None => String::new(),
    };
    let sizes: Vec<String> = view
        .page_size
        .options
        .iter()
        .map(|size| size.to_string())
        .collect();
    footer = format!(
        "{}  {} rows, {} per page ({})",
        footer,
        view.total_rows,
        view.page_size.current,
        sizes.join("/")
    );
    out.push(footer.trim_start().to_string());

    if let Some(open) = &view.modal {
        out.push(String::new());
        out.push(format!("--- {} ---", open.title));
        let mut body = Vec::new();
        node_lines(modal.unwrap_or(&open.content), &mut body);
        out.extend(body.into_iter().map(|line| format!("  {}", line)));
    }

    out.join("\n")
}
