//! Tree structure rendering utilities for joint hierarchy visualization

use console::Style;
use std::collections::HashMap;

/// Represents a node in a tree structure
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub children: Vec<TreeNode>,
    pub metadata: HashMap<String, String>,
}

/// Types of nodes in the tree
#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    Root,
    Joint,
    EndSite,
}

/// Options for tree rendering
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub no_color: bool,
    pub show_metadata: bool,
    pub compact: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            no_color: false,
            show_metadata: true,
            compact: false,
        }
    }
}

impl TreeNode {
    /// Create a new tree node
    pub fn new(name: String, node_type: NodeType) -> Self {
        Self {
            name,
            node_type,
            children: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// Add a child node
    pub fn add_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

impl NodeType {
    /// Get emoji icon for node type
    pub fn icon(&self) -> &'static str {
        match self {
            NodeType::Root => "🧍",
            NodeType::Joint => "🦴",
            NodeType::EndSite => "⚪",
        }
    }

    /// Get color style for node type
    pub fn style(&self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self {
                NodeType::Root => Style::new().bold().cyan(),
                NodeType::Joint => Style::new().green(),
                NodeType::EndSite => Style::new().dim(),
            }
        }
    }
}

/// Render a tree structure to string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

/// Render a single node and its children
fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if let Some(max_depth) = options.max_depth
        && depth > max_depth
    {
        return;
    }

    let icon = node.node_type.icon();
    let style = node.node_type.style(options.no_color);
    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    let mut line = format!(
        "{}{}{} {}",
        prefix,
        connector,
        icon,
        style.apply_to(&node.name)
    );

    if options.show_metadata && !node.metadata.is_empty() && options.compact {
        let mut meta_parts = Vec::new();
        for (key, value) in &node.metadata {
            if ["channels", "offset"].contains(&key.as_str()) {
                meta_parts.push(format!("{key}:{value}"));
            }
        }
        meta_parts.sort();
        if !meta_parts.is_empty() {
            line.push_str(&format!(" [{}]", meta_parts.join(", ")));
        }
    }

    output.push_str(&line);
    output.push('\n');

    if options.show_metadata && !options.compact && !node.metadata.is_empty() {
        let child_prefix = if depth == 0 {
            ""
        } else if is_last {
            "    "
        } else {
            "│   "
        };
        let meta_prefix = format!("{prefix}{child_prefix}    ");

        let mut entries: Vec<_> = node.metadata.iter().collect();
        entries.sort();
        for (key, value) in entries {
            let meta_style = Style::new().dim();
            output.push_str(&format!(
                "{}🏷️  {}: {}\n",
                meta_prefix,
                meta_style.apply_to(key),
                value
            ));
        }
    }

    // Render children
    if !node.children.is_empty() {
        let new_prefix = if depth == 0 {
            String::new()
        } else {
            format!("{}{}", prefix, if is_last { "    " } else { "│   " })
        };

        for (i, child) in node.children.iter().enumerate() {
            let is_last_child = i == node.children.len() - 1;
            render_node(
                child,
                output,
                &new_prefix,
                is_last_child,
                depth + 1,
                options,
            );
        }
    }
}
