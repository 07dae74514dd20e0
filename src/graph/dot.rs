use std::fmt::Write;

/// Ordered attribute list of a graph, node or edge
pub type Attrs = Vec<(&'static str, String)>;

/// In-memory directed graph that serializes to Graphviz DOT
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotGraph {
    graph_attrs: Attrs,
    nodes: Vec<(String, Attrs)>,
    ranks: Vec<Vec<String>>,
    edges: Vec<(String, String, Attrs)>,
}

impl DotGraph {
    pub fn new(graph_attrs: Attrs) -> Self {
        Self {
            graph_attrs,
            ..Default::default()
        }
    }

    pub fn add_node(&mut self, id: &str, attrs: Attrs) {
        self.nodes.push((id.to_string(), attrs));
    }

    /// Pin nodes to one rank
    pub fn same_rank(&mut self, ids: Vec<String>) {
        if !ids.is_empty() {
            self.ranks.push(ids);
        }
    }

    pub fn add_edge(&mut self, from: &str, to: &str, attrs: Attrs) {
        self.edges.push((from.to_string(), to.to_string(), attrs));
    }

    #[cfg(test)]
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|(id, _)| id.as_str())
    }

    #[cfg(test)]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn to_dot(&self) -> String {
        let mut out = String::from("strict digraph {\n");
        if !self.graph_attrs.is_empty() {
            let _ = writeln!(out, "  graph {};", attr_list(&self.graph_attrs));
        }
        for (id, attrs) in &self.nodes {
            let _ = writeln!(out, "  {}{};", quote(id), attr_suffix(attrs));
        }
        for rank in &self.ranks {
            let ids: Vec<String> = rank.iter().map(|id| quote(id)).collect();
            let _ = writeln!(out, "  {{ rank=same; {}; }}", ids.join("; "));
        }
        for (from, to, attrs) in &self.edges {
            let _ = writeln!(out, "  {} -> {}{};", quote(from), quote(to), attr_suffix(attrs));
        }
        out.push_str("}\n");
        out
    }
}

fn attr_suffix(attrs: &Attrs) -> String {
    if attrs.is_empty() {
        String::new()
    } else {
        format!(" {}", attr_list(attrs))
    }
}

fn attr_list(attrs: &Attrs) -> String {
    let items: Vec<String> = attrs
        .iter()
        .map(|(key, value)| format!("{}={}", key, quote(value)))
        .collect();
    format!("[{}]", items.join(", "))
}

/// Quote a DOT identifier; line breaks become `\n` escapes
fn quote(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{}\"", escaped)
}
