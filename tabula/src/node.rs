//! Renderable content tree.
//!
//! Custom cell renderers and modal content factories return a [`Node`].
//! The table never lays nodes out itself; it only needs their text for
//! global search, and hands them back to the caller inside a
//! [`TableView`](crate::TableView).

/// Layout direction for container nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Children flow left to right.
    #[default]
    Row,
    /// Children flow top to bottom.
    Column,
}

/// What a node displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Content {
    #[default]
    None,
    Text(String),
    /// A checkbox; `indeterminate` wins over `checked` when set.
    Checkbox { checked: bool, indeterminate: bool },
    /// A clickable action.
    Button { label: String, enabled: bool },
    /// A single-line input showing `value`, or `placeholder` when empty.
    Input { value: String, placeholder: String },
    Children(Vec<Node>),
}

/// A node in the content tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    /// Optional identifier, used by callers to route events.
    pub id: Option<String>,
    pub direction: Direction,
    pub content: Content,
}

impl Node {
    /// Create an empty node.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Content::Text(content.into()),
            ..Default::default()
        }
    }

    /// Create a horizontal container.
    pub fn row() -> Self {
        Self {
            direction: Direction::Row,
            content: Content::Children(Vec::new()),
            ..Default::default()
        }
    }

    /// Create a vertical container.
    pub fn col() -> Self {
        Self {
            direction: Direction::Column,
            content: Content::Children(Vec::new()),
            ..Default::default()
        }
    }

    /// Create a checkbox node.
    pub fn checkbox(checked: bool) -> Self {
        Self {
            content: Content::Checkbox {
                checked,
                indeterminate: false,
            },
            ..Default::default()
        }
    }

    /// Create a button node.
    pub fn button(label: impl Into<String>, enabled: bool) -> Self {
        Self {
            content: Content::Button {
                label: label.into(),
                enabled,
            },
            ..Default::default()
        }
    }

    /// Create an input node.
    pub fn input(value: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            content: Content::Input {
                value: value.into(),
                placeholder: placeholder.into(),
            },
            ..Default::default()
        }
    }

    /// Set the node id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Mark a checkbox as indeterminate. No effect on other content.
    pub fn indeterminate(mut self, value: bool) -> Self {
        if let Content::Checkbox { indeterminate, .. } = &mut self.content {
            *indeterminate = value;
        }
        self
    }

    /// Append a child. Turns leaf content into a container.
    pub fn child(mut self, child: Node) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    /// Append several children.
    pub fn children(self, children: impl IntoIterator<Item = Node>) -> Self {
        children.into_iter().fold(self, Node::child)
    }

    /// Find a node by id, depth first.
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }

        if let Content::Children(children) = &self.content {
            for child in children {
                if let Some(found) = child.find(id) {
                    return Some(found);
                }
            }
        }

        None
    }

    /// Visible text of the subtree, leaves joined by a single space.
    ///
    /// Inputs contribute their value, buttons their label; checkboxes
    /// contribute nothing.
    pub fn plain_text(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        match &self.content {
            Content::Text(text) if !text.is_empty() => parts.push(text),
            Content::Button { label, .. } => parts.push(label),
            Content::Input { value, .. } if !value.is_empty() => parts.push(value),
            Content::Children(children) => {
                for child in children {
                    child.collect_text(parts);
                }
            }
            _ => {}
        }
    }
}
