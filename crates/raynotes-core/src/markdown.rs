//! Render a document tree to Markdown.
//!
//! The output contract matches the note exporter the archives come from,
//! quirks included, so rendered files diff cleanly against ones produced
//! by that tool. The rules worth knowing before touching anything here:
//!
//! - Child outputs are concatenated and the joined string is trimmed of
//!   trailing whitespace once, before the node's own formatting applies.
//! - Every node type appends exactly one trailing newline to its output,
//!   except `text`, which flows inline inside its parent.
//! - Ordered numbering threads a counter through the child walk by value.
//!   The counter advances after each ordered list child and restarts at 1
//!   before every nested sublist. A list item's own number is read *after*
//!   its children have been walked, so an ordered item containing a
//!   sublist numbers itself 1. Counter changes inside a child never leak
//!   into the parent's walk.
//! - Marks wrap the text in reverse declaration order; a `code` mark wraps
//!   whatever has accumulated and stops the walk.
//!
//! Rendering is total: unknown node types and unknown marks contribute
//! nothing, and no input tree causes an error.

use crate::document::{DocumentNode, ListKind, Mark};

/// Render a document tree to Markdown.
///
/// Ordered numbering starts at 1. Equivalent to [`render_from`] with a
/// start index of 1.
///
/// # Examples
///
/// ```
/// use raynotes_core::document::DocumentNode;
/// use raynotes_core::markdown;
///
/// let node: DocumentNode = serde_json::from_str(
///     r#"{"type":"heading","attrs":{"level":2},"content":[{"type":"text","text":"Hi"}]}"#,
/// )
/// .unwrap();
/// assert_eq!(markdown::render(&node), "## Hi\n");
/// ```
pub fn render(node: &DocumentNode) -> String {
    render_from(node, 1)
}

/// Render a document tree to Markdown with an explicit starting ordinal.
///
/// `start_index` seeds the sibling counter for `node`'s children and is
/// the number an ordered `node` itself displays when its children include
/// no sublist.
pub fn render_from(node: &DocumentNode, start_index: usize) -> String {
    // Text runs flow inline inside their parent; they are the one node
    // type realized without a trailing newline.
    if let DocumentNode::Text { text, marks } = node {
        return apply_marks(text, marks);
    }

    let (children, index) = fold_children(node, start_index);
    let body = children.trim_end();

    let mut rendered = match node {
        DocumentNode::Doc { .. } | DocumentNode::Paragraph { .. } => body.to_string(),
        DocumentNode::Heading { attrs, .. } => {
            format!("{} {}", "#".repeat(attrs.level as usize), body)
        }
        DocumentNode::CodeBlock { attrs, .. } => {
            let language = attrs.language.as_deref().unwrap_or("");
            format!("```{language}\n{body}\n```")
        }
        DocumentNode::Blockquote { .. } => body
            .split('\n')
            .map(|line| format!("> {line}").trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        DocumentNode::HorizontalRule => "\n---\n".to_string(),
        DocumentNode::List { attrs, .. } => match attrs.kind {
            ListKind::Bullet => format!("- {body}"),
            ListKind::Ordered => format!("{index}. {body}"),
            ListKind::Task => {
                let check = if attrs.checked { 'x' } else { ' ' };
                format!("- [{check}] {body}")
            }
        },
        DocumentNode::Unknown => String::new(),
        // Handled by the early return above.
        DocumentNode::Text { .. } => String::new(),
    };
    rendered.push('\n');
    rendered
}

/// Walk a node's children, concatenating their output and threading the
/// sibling ordinal. Returns the joined output and the counter value after
/// the walk, which is what an ordered parent displays as its own number.
fn fold_children(node: &DocumentNode, start_index: usize) -> (String, usize) {
    let mut rendered = String::new();
    let mut index = start_index;
    for child in node.children() {
        if node.is_list() && child.is_list() {
            // Sublist inside a list item: indent it and restart numbering.
            rendered.push_str("  ");
            index = 1;
        }
        rendered.push_str(&render_from(child, index));
        if child.is_ordered_list() {
            index += 1;
        }
    }
    (rendered, index)
}

/// Apply marks to a text run, innermost-last: the reverse of declaration
/// order. `code` short-circuits, capturing any decorations already applied
/// inside the backticks and dropping the rest.
fn apply_marks(text: &str, marks: &[Mark]) -> String {
    let mut out = text.to_string();
    for mark in marks.iter().rev() {
        match mark {
            Mark::Code => return format!("`{out}`"),
            Mark::Bold => out = format!("**{out}**"),
            Mark::Italic => out = format!("*{out}*"),
            Mark::Underline => out = format!("~{out}~"),
            Mark::Strike => out = format!("~~{out}~~"),
            Mark::Link { attrs } => {
                let href = attrs.href.as_deref().unwrap_or("");
                out = format!("[{out}]({href})");
            }
            Mark::Unknown => {}
        }
    }
    out
}
