//! Ontology tree.
//!
//! The ontology is stored as an arena: nodes live in a `Vec` owned by the
//! [`Ontology`] and refer to each other through [`NodeId`] indices. Every node
//! keeps its ordered children and an optional back-reference to its parent;
//! a node without a parent is a root.
//!
//! ```text
//! Ontology
//! ├ Age
//! ├ Diagnosis
//! └ Diagnosis date
//! ```
//!
//! ```
//! use std::sync::Arc;
//! use transmart_types::{Concept, Ontology, ValueType};
//!
//! let age = Arc::new(Concept::new("test:age", "Age", "\\Test\\age", ValueType::Numeric));
//!
//! let mut ontology = Ontology::new();
//! let top = ontology.add_folder("Ontology");
//! let age_node = ontology.add_concept_node(age);
//! ontology.add_child(top, age_node);
//! ontology.add_root(top);
//!
//! assert!(ontology.node(top).is_root());
//! assert_eq!(ontology.node(age_node).parent, Some(top));
//! ```

use std::sync::Arc;

use crate::{Concept, Study};

/// Index of a node in an [`Ontology`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// What an ontology node represents.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Plain node used to group other nodes.
    Folder,
    /// Node representing a study.
    Study(Arc<Study>),
    /// Node representing a concept.
    Concept(Arc<Concept>),
}

/// A node in the ontology.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Name shown in the ontology.
    pub name: String,
    /// What the node represents.
    pub kind: NodeKind,
    /// Metadata tags as key-value pairs, in insertion order.
    pub metadata: Option<Vec<(String, String)>>,
    /// Ordered child nodes.
    pub children: Vec<NodeId>,
    /// The first node this node was added to as a child.
    pub parent: Option<NodeId>,
}

impl TreeNode {
    /// Returns true if the node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns true if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the value of a metadata tag.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Arena of ontology nodes plus the ordered list of declared roots.
#[derive(Debug, Clone, Default)]
pub struct Ontology {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl Ontology {
    /// Creates an empty ontology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached node and returns its id.
    pub fn add_node(&mut self, name: impl Into<String>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            name: name.into(),
            kind,
            metadata: None,
            children: Vec::new(),
            parent: None,
        });
        id
    }

    /// Adds a folder node.
    pub fn add_folder(&mut self, name: impl Into<String>) -> NodeId {
        self.add_node(name, NodeKind::Folder)
    }

    /// Adds a node for a study, named after the study.
    pub fn add_study_node(&mut self, study: Arc<Study>) -> NodeId {
        let name = study.name.clone();
        self.add_node(name, NodeKind::Study(study))
    }

    /// Adds a node for a concept, named after the concept.
    pub fn add_concept_node(&mut self, concept: Arc<Concept>) -> NodeId {
        let name = concept.name.clone();
        self.add_node(name, NodeKind::Concept(concept))
    }

    /// Appends `child` to the children of `parent`.
    ///
    /// The parent back-reference is only set the first time a node is
    /// linked, so a node shared by several parents keeps its first parent.
    ///
    /// # Panics
    ///
    /// Panics if either id does not belong to this ontology.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        assert!(child.0 < self.nodes.len(), "unknown child node {:?}", child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent.get_or_insert(parent);
    }

    /// Sets a metadata tag on a node.
    ///
    /// Tags keep the order in which they were first added. Setting a tag
    /// that already exists replaces its value in place.
    pub fn add_tag(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let tags = self.nodes[id.0].metadata.get_or_insert_with(Vec::new);
        match tags.iter().position(|(k, _)| *k == key) {
            Some(index) => tags[index].1 = value,
            None => tags.push((key, value)),
        }
    }

    /// Declares a node as a root of the ontology.
    ///
    /// Declaring a node that has a parent is accepted here and rejected when
    /// the collection is validated.
    pub fn add_root(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    /// The declared roots, in declaration order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this ontology.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Returns the node with the given id, if it exists.
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueType;

    #[test]
    fn test_build_tree() {
        let study = Arc::new(Study::new("test", "Test study"));
        let concept = Arc::new(Concept::new("c", "Dummy", "\\dummy", ValueType::Categorical));

        let mut ontology = Ontology::new();
        let top = ontology.add_study_node(study);
        let leaf = ontology.add_concept_node(concept);
        ontology.add_child(top, leaf);
        ontology.add_root(top);

        assert_eq!(ontology.len(), 2);
        assert_eq!(ontology.roots(), &[top]);
        assert_eq!(ontology.node(top).name, "Test study");
        assert_eq!(ontology.node(top).children, vec![leaf]);
        assert!(ontology.node(leaf).is_leaf());
        assert!(!ontology.node(leaf).is_root());
        assert!(matches!(ontology.node(leaf).kind, NodeKind::Concept(_)));
    }

    #[test]
    fn test_shared_node_keeps_first_parent() {
        let mut ontology = Ontology::new();
        let a = ontology.add_folder("A");
        let b = ontology.add_folder("B");
        let shared = ontology.add_folder("Shared");
        ontology.add_child(a, shared);
        ontology.add_child(b, shared);

        assert_eq!(ontology.node(shared).parent, Some(a));
        assert_eq!(ontology.node(b).children, vec![shared]);
    }

    #[test]
    fn test_tags() {
        let mut ontology = Ontology::new();
        let node = ontology.add_folder("Ontology");
        assert!(ontology.node(node).metadata.is_none());

        ontology.add_tag(node, "Upload date", "2019-06-28");
        ontology.add_tag(node, "Source", "test");

        let tags = ontology.node(node).metadata.as_ref().unwrap();
        let keys: Vec<&str> = tags.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Upload date", "Source"]);
        assert_eq!(ontology.node(node).tag("Source"), Some("test"));
        assert_eq!(ontology.node(node).tag("Missing"), None);
    }

    #[test]
    fn test_tag_replaced_in_place() {
        let mut ontology = Ontology::new();
        let node = ontology.add_folder("Ontology");
        ontology.add_tag(node, "Upload date", "2019-06-28");
        ontology.add_tag(node, "Description", "Test ontology");
        ontology.add_tag(node, "Upload date", "2019-07-01");

        let tags = ontology.node(node).metadata.as_ref().unwrap();
        assert_eq!(
            tags,
            &vec![
                ("Upload date".to_string(), "2019-07-01".to_string()),
                ("Description".to_string(), "Test ontology".to_string()),
            ]
        );
    }

    #[test]
    fn test_get_unknown_node() {
        let ontology = Ontology::new();
        assert!(ontology.is_empty());
        assert!(ontology.get(NodeId(3)).is_none());
    }
}
