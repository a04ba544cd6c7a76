//! Ordered labeled trees rendered as indented text.

/// A labeled node with ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTree {
    pub label: String,
    pub children: Vec<DisplayTree>,
}

impl DisplayTree {
    pub fn new(label: impl Into<String>) -> Self {
        DisplayTree {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Attach `child` after any existing children.
    pub fn push(&mut self, child: DisplayTree) -> &mut DisplayTree {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Render one line per node. Each depth level is indented by four
    /// columns of branch drawing.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.label);
        out.push('\n');
        self.render_children("", &mut out);
        out
    }

    fn render_children(&self, prefix: &str, out: &mut String) {
        let count = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            let last = i + 1 == count;
            out.push_str(prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push_str(&child.label);
            out.push('\n');

            let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
            child.render_children(&nested, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_nested_children_with_branches() {
        let mut root = DisplayTree::new("Root");
        let child1 = root.push(DisplayTree::new("Child 1"));
        child1.push(DisplayTree::new("Grandchild 1"));
        let child2 = root.push(DisplayTree::new("Child 2"));
        child2.push(DisplayTree::new("Grandchild 2"));

        let expected = [
            "Root",
            "├── Child 1",
            "│   └── Grandchild 1",
            "└── Child 2",
            "    └── Grandchild 2",
            "",
        ]
        .join("\n");
        assert_eq!(root.render(), expected);
    }

    #[test]
    fn leaf_renders_single_line() {
        assert_eq!(DisplayTree::new("alone").render(), "alone\n");
    }
}
