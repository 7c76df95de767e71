//! ASCII tree rendering for the documentation tree.

use crate::models::{DocDir, DocNode};

/// Render a documentation tree as ASCII art.
///
/// Example output:
/// ```text
/// docs/
/// ├── architecture/
/// │   └── overview.md (2.1 KB)
/// └── README.md (512 B)
/// ```
pub fn render_tree(title: &str, tree: &DocDir) -> String {
    let mut output = String::new();
    output.push_str(title);
    output.push('\n');
    render_children(&mut output, tree, "");
    output
}

fn render_children(output: &mut String, dir: &DocDir, prefix: &str) {
    for (i, (name, node)) in dir.iter().enumerate() {
        let is_last = i == dir.len() - 1;
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);

        match node {
            DocNode::Dir(children) => {
                output.push_str(name);
                output.push_str("/\n");
                let continuation = if is_last { "    " } else { "│   " };
                let child_prefix = format!("{}{}", prefix, continuation);
                render_children(output, children, &child_prefix);
            }
            DocNode::File(file) => {
                output.push_str(&format!("{} ({})\n", name, human_size(file.size)));
            }
        }
    }
}

fn human_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocFile;
    use chrono::Utc;

    fn file(path: &str, size: u64) -> DocNode {
        DocNode::File(DocFile {
            path: path.to_string(),
            size,
            modified: Utc::now(),
        })
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(render_tree("docs/", &DocDir::new()), "docs/\n");
    }

    #[test]
    fn test_flat_files() {
        let mut tree = DocDir::new();
        tree.insert("README.md".to_string(), file("README.md", 512));
        tree.insert("guide.md".to_string(), file("guide.md", 2150));

        assert_eq!(
            render_tree("docs/", &tree),
            "docs/\n├── README.md (512 B)\n└── guide.md (2.1 KB)\n"
        );
    }

    #[test]
    fn test_nested_directories() {
        let mut api = DocDir::new();
        api.insert("auth.md".to_string(), file("api/auth.md", 10));
        api.insert("events.md".to_string(), file("api/events.md", 20));

        let mut tree = DocDir::new();
        tree.insert("api".to_string(), DocNode::Dir(api));
        tree.insert("empty".to_string(), DocNode::Dir(DocDir::new()));
        tree.insert("index.md".to_string(), file("index.md", 3 * 1024 * 1024));

        let expected = "docs/\n├── api/\n│   ├── auth.md (10 B)\n│   └── events.md (20 B)\n├── empty/\n└── index.md (3.0 MB)\n";
        assert_eq!(render_tree("docs/", &tree), expected);
    }
}
