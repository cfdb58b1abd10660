//! Label taxonomy
//!
//! Labels form a forest: each label owns a link to its parent, roots have
//! none. Many events share one label through an `Arc`.
//!
//! Equality and hashing are structural (name + parent chain); declared
//! ranking axes do not take part in identity.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Deserialize;

/// A node of the label taxonomy.
#[derive(Debug, Clone)]
pub struct Label {
    name: String,
    parent: Option<Arc<Label>>,
    /// Ranking axes in declaration order, paired with their direction
    /// (true = descending, higher values are more extreme).
    axes: Vec<(String, bool)>,
}

impl Label {
    /// Create a detached label with no parent and no axes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            axes: Vec::new(),
        }
    }

    /// Shared root label.
    pub fn root(name: impl Into<String>) -> Arc<Label> {
        Arc::new(Self::new(name))
    }

    /// Shared child label of `parent`.
    pub fn child(name: impl Into<String>, parent: &Arc<Label>) -> Arc<Label> {
        Arc::new(Self::new(name).under(parent))
    }

    /// Attach this label below `parent`.
    pub fn under(mut self, parent: &Arc<Label>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Declare a ranking axis.
    pub fn with_axis(mut self, axis: impl Into<String>, descending: bool) -> Self {
        let axis = axis.into();
        self.axes.retain(|(name, _)| *name != axis);
        self.axes.push((axis, descending));
        self
    }

    /// Wrap into a shared handle.
    pub fn shared(self) -> Arc<Label> {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<Label>> {
        self.parent.as_ref()
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Declared ranking axes, in declaration order.
    pub fn axes(&self) -> &[(String, bool)] {
        &self.axes
    }

    /// This label followed by all of its forebears up to the root.
    pub fn ancestors(&self) -> Vec<&Label> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = current.parent.as_deref() {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Number of edges between this label and its root.
    pub fn depth(&self) -> usize {
        self.ancestors().len() - 1
    }

    /// `root/child/...` rendering of the ancestor chain.
    pub fn path(&self) -> String {
        let mut names: Vec<&str> = self.ancestors().iter().map(|l| l.name.as_str()).collect();
        names.reverse();
        names.join("/")
    }

    /// Whether `other` is this label or one of its forebears.
    pub fn descends_from(&self, other: &Label) -> bool {
        self.ancestors().into_iter().any(|l| l == other)
    }

    /// Shortest-path length between two labels in the taxonomy.
    ///
    /// Within one tree this is `depth(a) + depth(b) - 2 * depth(lca)`.
    /// Labels from different trees are joined through a virtual super-root,
    /// giving `depth(a) + depth(b) + 2`.
    pub fn distance_to(&self, other: &Label) -> usize {
        let mine = self.ancestors();
        let theirs = other.ancestors();

        // Ancestor chains read root-first share a common prefix up to the lca.
        let shared = mine
            .iter()
            .rev()
            .zip(theirs.iter().rev())
            .take_while(|(a, b)| a.name == b.name)
            .count();

        let (a, b) = (mine.len(), theirs.len());
        if shared == 0 {
            return a + b;
        }
        a + b - 2 * shared
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.parent == other.parent
    }
}

impl Eq for Label {}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for label in self.ancestors() {
            label.name.hash(state);
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Serialized form of a label: `{"name": .., "parent": {..}, "axes": {..}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelSpec {
    pub name: String,
    #[serde(default)]
    pub parent: Option<Box<LabelSpec>>,
    #[serde(default)]
    pub axes: BTreeMap<String, bool>,
}

impl LabelSpec {
    /// Build the label chain this record describes.
    pub fn to_label(&self) -> Arc<Label> {
        let mut label = Label::new(self.name.clone());
        if let Some(parent) = &self.parent {
            label = label.under(&parent.to_label());
        }
        for (axis, descending) in &self.axes {
            label = label.with_axis(axis.clone(), *descending);
        }
        label.shared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Arc<Label>, Arc<Label>, Arc<Label>, Arc<Label>) {
        let root = Label::root("root");
        let a = Label::child("a", &root);
        let b = Label::child("b", &a);
        let c = Label::child("c", &b);
        (root, a, b, c)
    }

    #[test]
    fn test_ancestors_and_depth() {
        let (root, _, _, c) = chain();
        let names: Vec<&str> = c.ancestors().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["c", "b", "a", "root"]);
        assert_eq!(c.depth(), 3);
        assert_eq!(root.depth(), 0);
        assert_eq!(c.path(), "root/a/b/c");
    }

    #[test]
    fn test_structural_equality() {
        let room = Label::root("room");
        let kitchen = Label::child("kitchen", &room);
        let other_kitchen = Label::new("kitchen").under(&Label::root("room")).with_axis("temp", true);
        assert_eq!(*kitchen, other_kitchen);

        let elsewhere = Label::child("kitchen", &Label::root("house"));
        assert_ne!(kitchen, elsewhere);
    }

    #[test]
    fn test_distance_along_chain() {
        let (root, a, _, c) = chain();
        assert_eq!(root.distance_to(&c), 3);
        assert_eq!(c.distance_to(&root), 3);
        assert_eq!(a.distance_to(&a), 0);
    }

    #[test]
    fn test_distance_between_siblings() {
        let l0 = Label::root("l0");
        let l1 = Label::child("l1", &l0);
        let lab2 = Label::child("lab2", &l0);
        let lab3 = Label::child("lab3", &lab2);
        assert_eq!(l0.distance_to(&l0), 0);
        assert_eq!(l0.distance_to(&lab3), 2);
        assert_eq!(l1.distance_to(&lab2), 2);
        assert_eq!(lab3.distance_to(&l1), 3);
    }

    #[test]
    fn test_distance_across_trees() {
        let a = Label::child("a", &Label::root("x"));
        let b = Label::root("y");
        assert_eq!(a.distance_to(&b), 3);
        assert_eq!(b.distance_to(&a), 3);
    }

    #[test]
    fn test_descends_from() {
        let (root, a, b, _) = chain();
        assert!(b.descends_from(&root));
        assert!(b.descends_from(&a));
        assert!(!a.descends_from(&b));
    }

    #[test]
    fn test_with_axis_replaces_direction() {
        let label = Label::new("day").with_axis("max_temp", true).with_axis("max_temp", false);
        assert_eq!(label.axes(), &[("max_temp".to_string(), false)]);
    }

    #[test]
    fn test_label_spec_roundtrip() {
        let spec: LabelSpec = serde_json::from_str(
            r#"{"name": "hot", "parent": {"name": "temperature", "parent": {"name": "event"}}, "axes": {"max_temp": true}}"#,
        )
        .unwrap();
        let label = spec.to_label();
        assert_eq!(label.path(), "event/temperature/hot");
        assert_eq!(label.axes(), &[("max_temp".to_string(), true)]);
    }
}
