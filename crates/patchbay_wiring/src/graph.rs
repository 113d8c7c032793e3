//! The signal graph built for one (patch, hardware) pair.
//!
//! Nodes are named signals on either side of the binding: hardware inputs,
//! outputs, data handlers and audio channels on one side, patch ports,
//! parameters, histories and data buffers on the other. An edge records
//! that one node feeds another. A node has at most one `source`; hardware
//! outputs may additionally sum several patch buffers through `feeds`.

use patchbay_common::Phase;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Identifies a node within one [`SignalGraph`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// What a node stands for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A readable hardware signal.
    HardwareInput,
    /// A writable hardware signal.
    HardwareOutput,
    /// A hardware data handler.
    DataHandler,
    /// A hardware audio input channel (`dsy_in1`).
    AudioIn,
    /// A hardware audio output channel (`dsy_out1`).
    AudioOut,
    /// The hardware MIDI input stream.
    MidiIn,
    /// The hardware MIDI output stream.
    MidiOut,
    /// A block buffer for a patch output beyond the hardware's channels.
    Glue,
    /// A patch audio input port.
    PatchIn,
    /// A patch audio output port.
    PatchOut,
    /// A patch parameter.
    Param,
    /// A patch history output.
    History,
    /// A patch data buffer.
    Data,
}

impl NodeKind {
    /// Returns `true` for nodes owned by the hardware side.
    pub fn is_hardware(self) -> bool {
        matches!(
            self,
            NodeKind::HardwareInput
                | NodeKind::HardwareOutput
                | NodeKind::DataHandler
                | NodeKind::AudioIn
                | NodeKind::AudioOut
                | NodeKind::MidiIn
                | NodeKind::MidiOut
        )
    }
}

/// One named signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Node identity.
    pub id: NodeId,
    /// Unique node name; also the generated variable name where one exists.
    pub name: String,
    /// What the node stands for.
    pub kind: NodeKind,
    /// The node feeding this one.
    pub source: Option<NodeId>,
    /// Buffers summed into this node (hardware outputs only).
    pub feeds: Vec<NodeId>,
    /// Nodes this one feeds.
    pub targets: Vec<NodeId>,
    /// Numeric domain, when not `[0, 1]`.
    pub range: Option<(f64, f64)>,
    /// Code template associated with the node.
    pub code: Option<String>,
    /// Phase the node's code runs in.
    pub phase: Phase,
}

impl Node {
    /// Returns `true` if anything feeds this node.
    pub fn is_driven(&self) -> bool {
        self.source.is_some() || !self.feeds.is_empty()
    }
}

/// An insertion-ordered set of nodes and their bindings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignalGraph {
    nodes: Vec<Node>,
    #[serde(skip)]
    by_name: HashMap<String, NodeId>,
}

impl SignalGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, or returns the existing node of the same name.
    pub fn add_node(&mut self, name: impl Into<String>, kind: NodeKind) -> NodeId {
        let name = name.into();
        if let Some(&id) = self.by_name.get(&name) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.nodes.push(Node {
            id,
            name,
            kind,
            source: None,
            feeds: Vec::new(),
            targets: Vec::new(),
            range: None,
            code: None,
            phase: Phase::default(),
        });
        id
    }

    /// Looks a node up by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Returns the node with the given id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    /// Returns the node with the given id, mutably.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// Returns the name of the node with the given id.
    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// Makes `src` the single source of `dst`, replacing any previous source.
    pub fn bind(&mut self, src: NodeId, dst: NodeId) {
        if let Some(old) = self.node(dst).source {
            self.node_mut(old).targets.retain(|&t| t != dst);
        }
        self.node_mut(dst).source = Some(src);
        let targets = &mut self.node_mut(src).targets;
        if !targets.contains(&dst) {
            targets.push(dst);
        }
    }

    /// Adds `src` to the buffers summed into `dst`.
    pub fn feed(&mut self, src: NodeId, dst: NodeId) {
        let feeds = &mut self.node_mut(dst).feeds;
        if !feeds.contains(&src) {
            feeds.push(src);
        }
        let targets = &mut self.node_mut(src).targets;
        if !targets.contains(&dst) {
            targets.push(dst);
        }
    }

    /// Iterates nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterates nodes of one kind in insertion order.
    pub fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Returns `(source, target)` name pairs for every binding, in target order.
    pub fn bindings(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        for node in &self.nodes {
            if let Some(src) = node.source {
                out.push((self.name(src), node.name.as_str()));
            }
            for &src in &node.feeds {
                out.push((self.name(src), node.name.as_str()));
            }
        }
        out
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_by_name() {
        let mut g = SignalGraph::new();
        let a = g.add_node("knob1", NodeKind::HardwareInput);
        let b = g.add_node("knob1", NodeKind::HardwareInput);
        assert_eq!(a, b);
        assert_eq!(g.len(), 1);
        assert_eq!(g.find("knob1"), Some(a));
        assert_eq!(g.find("knob2"), None);
    }

    #[test]
    fn bind_replaces_source() {
        let mut g = SignalGraph::new();
        let k1 = g.add_node("knob1", NodeKind::HardwareInput);
        let k2 = g.add_node("knob2", NodeKind::HardwareInput);
        let p = g.add_node("gen_param_freq", NodeKind::Param);
        g.bind(k1, p);
        g.bind(k2, p);
        assert_eq!(g.node(p).source, Some(k2));
        assert!(g.node(k1).targets.is_empty());
        assert_eq!(g.node(k2).targets, [p]);
    }

    #[test]
    fn feeds_accumulate() {
        let mut g = SignalGraph::new();
        let a = g.add_node("dsy_out1", NodeKind::AudioOut);
        let b = g.add_node("glue_out3", NodeKind::Glue);
        let led = g.add_node("led1", NodeKind::HardwareOutput);
        g.feed(a, led);
        g.feed(b, led);
        g.feed(b, led);
        assert_eq!(g.node(led).feeds, [a, b]);
        assert!(g.node(led).is_driven());
        assert_eq!(g.bindings(), [("dsy_out1", "led1"), ("glue_out3", "led1")]);
    }

    #[test]
    fn kinds() {
        assert!(NodeKind::MidiOut.is_hardware());
        assert!(!NodeKind::Glue.is_hardware());
        assert_eq!(NodeId(3).to_string(), "n3");
    }
}
