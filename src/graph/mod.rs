//! Diagram views of a finished fabric.
//!
//! Produces Graphviz DOT for the full topology and for each leaf with its
//! spines. Layout and SVG conversion are left to Graphviz itself.

mod dot;

pub use dot::{Attrs, DotGraph};

use crate::fabric::Fabric;
use crate::models::{Device, Link, Role};
use crate::utils::config_url;

/// Drawing attributes of one role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStyle {
    pub fill_color: &'static str,
    pub style: &'static str,
    /// Compass port where this role's end of a fabric edge attaches
    pub port: &'static str,
}

const SPINE_STYLE: NodeStyle = NodeStyle { fill_color: "grey88", style: "rounded,filled", port: "s" };
const LEAF_STYLE: NodeStyle = NodeStyle { fill_color: "honeydew2", style: "filled", port: "n" };

pub fn role_style(role: Role) -> NodeStyle {
    match role {
        Role::Spine => SPINE_STYLE,
        Role::Leaf => LEAF_STYLE,
    }
}

/// TopologyGraph renders a fabric as DOT graphs
pub struct TopologyGraph<'a> {
    fabric: &'a Fabric,
}

impl<'a> TopologyGraph<'a> {
    pub fn new(fabric: &'a Fabric) -> Self {
        Self { fabric }
    }

    /// Every device and every link, edge labels hidden
    pub fn topology(&self) -> DotGraph {
        let mut graph = DotGraph::new(self.graph_attrs());
        for device in self.fabric.devices() {
            graph.add_node(device.name(), node_attrs(device));
        }
        graph.same_rank(self.fabric.spines().iter().map(|d| d.name().to_string()).collect());
        for link in self.fabric.links() {
            graph.add_edge(&link.spine.device, &link.leaf.device, edge_attrs());
        }
        graph
    }

    /// One leaf with the spines it connects to, links fully labelled.
    ///
    /// Returns `None` if `leaf` is not a leaf of this fabric.
    pub fn leaf_view(&self, leaf: &str) -> Option<DotGraph> {
        let leaf_device = self.fabric.device(leaf).filter(|d| d.role() == Role::Leaf)?;
        let links: Vec<&Link> = self.fabric.links_for(leaf).collect();

        let mut graph = DotGraph::new(self.graph_attrs());
        let spines: Vec<&Device> = self
            .fabric
            .spines()
            .iter()
            .filter(|s| links.iter().any(|l| l.spine.device == s.name()))
            .collect();
        for spine in &spines {
            graph.add_node(spine.name(), node_attrs(spine));
        }
        let mut leaf_attrs = node_attrs(leaf_device);
        leaf_attrs.push(("URL", config_url(leaf)));
        graph.add_node(leaf, leaf_attrs);
        graph.same_rank(spines.iter().map(|d| d.name().to_string()).collect());

        for link in links {
            let mut attrs = edge_attrs();
            attrs.push(("decorate", "true".to_string()));
            attrs.push(("label", link.subnet.to_string()));
            attrs.push(("taillabel", link.spine.label()));
            attrs.push(("headlabel", link.leaf.label()));
            graph.add_edge(&link.spine.device, &link.leaf.device, attrs);
        }
        Some(graph)
    }

    /// Every leaf view, keyed by leaf name, in leaf creation order
    pub fn leaf_views(&self) -> Vec<(String, DotGraph)> {
        self.fabric
            .leaves()
            .iter()
            .filter_map(|leaf| {
                self.leaf_view(leaf.name())
                    .map(|graph| (leaf.name().to_string(), graph))
            })
            .collect()
    }

    fn graph_attrs(&self) -> Attrs {
        vec![
            ("label", self.fabric.name().to_string()),
            ("labelloc", "t".to_string()),
            ("fontsize", "20".to_string()),
            ("ordering", "out".to_string()),
        ]
    }
}

fn node_attrs(device: &Device) -> Attrs {
    let style = role_style(device.role());
    vec![
        ("label", format!("{}\nlo0: {}\nas: {}", device.name(), device.loopback(), device.asn())),
        ("shape", "box".to_string()),
        ("fontsize", "10".to_string()),
        ("fillcolor", style.fill_color.to_string()),
        ("style", style.style.to_string()),
    ]
}

fn edge_attrs() -> Attrs {
    vec![
        ("arrowhead", "none".to_string()),
        ("fontsize", "6".to_string()),
        ("tailport", role_style(Role::Spine).port.to_string()),
        ("headport", role_style(Role::Leaf).port.to_string()),
    ]
}
