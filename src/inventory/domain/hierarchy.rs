use serde::Serialize;

use super::asset::Asset;
use super::bom::Bom;
use crate::shared::{BomError, Result};

/// Aggregate statistics for an assembly subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssemblySummary {
    pub name: String,
    pub components_at_level: usize,
    pub total_components: usize,
    pub child_count: usize,
    pub total_cost: f64,
}

/// One level of a tree of sub-assemblies.
///
/// Children are owned exclusively: `add_child` takes the node by value, so a
/// node can provably belong to only one parent and the structure is a tree
/// by construction - ownership makes cycles and aliasing unrepresentable.
///
/// Rollups are recomputed on every call with no caching; trees are expected
/// to be shallow and small.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    name: String,
    description: String,
    components: Vec<Asset>,
    children: Vec<Assembly>,
}

impl Assembly {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            components: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Components at this level only.
    pub fn components(&self) -> &[Asset] {
        &self.components
    }

    pub fn children(&self) -> &[Assembly] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Assembly> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Attaches a node as an owned child.
    ///
    /// # Errors
    /// Returns `BomError::DuplicateChild` if a sibling with the same name is
    /// already attached. Unique sibling names keep path resolution
    /// unambiguous.
    pub fn add_child(&mut self, child: Assembly) -> Result<()> {
        if self.child(&child.name).is_some() {
            return Err(BomError::DuplicateChild { name: child.name }.into());
        }
        self.children.push(child);
        Ok(())
    }

    /// Adds a component at this level only.
    ///
    /// # Errors
    /// Returns `BomError::DuplicateId` if a component with the same ID
    /// already exists at this level. The same ID may still appear at other
    /// levels; flattening resolves such collisions (see `all_components`).
    pub fn add_component(&mut self, asset: Asset) -> Result<()> {
        if self
            .components
            .iter()
            .any(|a| a.id.as_str() == asset.id.as_str())
        {
            return Err(BomError::DuplicateId {
                id: asset.id.to_string(),
            }
            .into());
        }
        self.components.push(asset);
        Ok(())
    }

    /// Removes a component from this level only.
    ///
    /// # Errors
    /// Returns `BomError::NotFound` if no component with the ID exists at
    /// this level (components in children are not considered).
    pub fn remove_component(&mut self, id: &str) -> Result<Asset> {
        let index = self
            .components
            .iter()
            .position(|a| a.id.as_str() == id)
            .ok_or_else(|| BomError::NotFound { id: id.to_string() })?;
        Ok(self.components.remove(index))
    }

    /// Recursive cost rollup: this level's components plus all children,
    /// depth-first.
    pub fn total_cost(&self) -> f64 {
        let own: f64 = self.components.iter().map(Asset::total_cost).sum();
        let children: f64 = self.children.iter().map(Assembly::total_cost).sum();
        own + children
    }

    /// Recursive component count across the whole subtree.
    pub fn component_count(&self) -> usize {
        self.components.len()
            + self
                .children
                .iter()
                .map(Assembly::component_count)
                .sum::<usize>()
    }

    /// Flattens every level into a single ordered component list.
    ///
    /// Visit order is depth-first: this level's own components first, then
    /// each child subtree. On an ID collision across levels the
    /// last-visited asset wins, replacing the earlier one in place - a
    /// silent overwrite, not an error. This policy is deliberate and covered
    /// by tests.
    pub fn all_components(&self) -> Vec<Asset> {
        let mut merged: Vec<Asset> = Vec::with_capacity(self.component_count());
        self.collect_into(&mut merged);
        merged
    }

    fn collect_into(&self, merged: &mut Vec<Asset>) {
        for asset in &self.components {
            match merged
                .iter()
                .position(|a| a.id.as_str() == asset.id.as_str())
            {
                Some(index) => merged[index] = asset.clone(),
                None => merged.push(asset.clone()),
            }
        }
        for child in &self.children {
            child.collect_into(merged);
        }
    }

    /// Resolves a slash-separated chain of child names starting at self,
    /// e.g. `"TLS/Certificates/Intermediate"`. A leading segment equal to
    /// this node's own name is accepted and skipped.
    ///
    /// # Errors
    /// Returns `BomError::PathNotFound` if any segment fails to match a
    /// child by exact name.
    pub fn node_at_path(&self, path: &str) -> Result<&Assembly> {
        let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();

        if segments.peek() == Some(&self.name.as_str()) {
            segments.next();
        }

        let mut current = self;
        for segment in segments {
            current = current.child(segment).ok_or_else(|| BomError::PathNotFound {
                path: path.to_string(),
            })?;
        }
        Ok(current)
    }

    /// Read-only projection of the whole subtree into a flat BOM with a
    /// synthesized metadata header and a fresh audit log. The tree itself is
    /// not mutated. Collisions follow the `all_components` policy.
    pub fn flatten_to_bom(&self) -> Bom {
        Bom::from_flattened(
            self.name.clone(),
            self.description.clone(),
            self.all_components(),
        )
    }

    /// Statistics for this subtree.
    pub fn summary(&self) -> AssemblySummary {
        AssemblySummary {
            name: self.name.clone(),
            components_at_level: self.components.len(),
            total_components: self.component_count(),
            child_count: self.children.len(),
            total_cost: self.total_cost(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::domain::asset::ComponentDetail;

    fn part(id: &str, unit_cost: f64) -> Asset {
        Asset::component(
            id,
            "Part",
            ComponentDetail {
                category: "Misc".to_string(),
                quantity: 1,
                unit_cost,
                supplier: String::new(),
                part_number: String::new(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_depth_first_cost_rollup() {
        // root has a $10 component, child A has a $5 component, child B has
        // no components and a grandchild with a $2 component
        let mut root = Assembly::new("Root", "");
        root.add_component(part("ROOT-1", 10.0)).unwrap();

        let mut child_a = Assembly::new("A", "");
        child_a.add_component(part("A-1", 5.0)).unwrap();

        let mut grandchild = Assembly::new("B1", "");
        grandchild.add_component(part("B1-1", 2.0)).unwrap();
        let mut child_b = Assembly::new("B", "");
        child_b.add_child(grandchild).unwrap();

        root.add_child(child_a).unwrap();
        root.add_child(child_b).unwrap();

        assert!((root.total_cost() - 17.0).abs() < 1e-9);
        assert_eq!(root.component_count(), 3);
    }

    #[test]
    fn test_duplicate_component_at_level_rejected() {
        let mut node = Assembly::new("Root", "");
        node.add_component(part("X", 1.0)).unwrap();
        assert!(node.add_component(part("X", 2.0)).is_err());
        assert_eq!(node.components().len(), 1);
    }

    #[test]
    fn test_remove_component_level_only() {
        let mut root = Assembly::new("Root", "");
        let mut child = Assembly::new("Child", "");
        child.add_component(part("C-1", 1.0)).unwrap();
        root.add_child(child).unwrap();

        // C-1 lives in the child, not at the root level
        assert!(root.remove_component("C-1").is_err());
        assert_eq!(root.component_count(), 1);
    }

    #[test]
    fn test_duplicate_sibling_name_rejected() {
        let mut root = Assembly::new("Root", "");
        root.add_child(Assembly::new("Power", "")).unwrap();
        let result = root.add_child(Assembly::new("Power", ""));
        assert!(result.is_err());
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn test_flatten_last_visited_wins_on_collision() {
        let mut root = Assembly::new("Root", "");
        root.add_component(part("SHARED", 1.0)).unwrap();
        root.add_component(part("ROOT-ONLY", 3.0)).unwrap();

        let mut child = Assembly::new("Child", "");
        child.add_component(part("SHARED", 9.0)).unwrap();
        root.add_child(child).unwrap();

        let flat = root.all_components();
        assert_eq!(flat.len(), 2);
        // The deeper (last-visited) asset replaced the earlier one in place
        assert_eq!(flat[0].id.as_str(), "SHARED");
        assert!((flat[0].total_cost() - 9.0).abs() < 1e-9);
        assert_eq!(flat[1].id.as_str(), "ROOT-ONLY");
    }

    #[test]
    fn test_node_at_path() {
        let mut root = Assembly::new("Root", "");
        let mut tls = Assembly::new("TLS", "");
        tls.add_child(Assembly::new("Certificates", "")).unwrap();
        root.add_child(tls).unwrap();

        assert_eq!(root.node_at_path("TLS/Certificates").unwrap().name(), "Certificates");
        // Leading self-name segment is accepted
        assert_eq!(
            root.node_at_path("Root/TLS/Certificates").unwrap().name(),
            "Certificates"
        );
        assert!(root.node_at_path("TLS/Keys").is_err());
    }

    #[test]
    fn test_flatten_to_bom() {
        let mut root = Assembly::new("Gateway", "Edge appliance");
        root.add_component(part("ROOT-1", 10.0)).unwrap();
        let mut child = Assembly::new("PSU", "");
        child.add_component(part("PSU-1", 5.0)).unwrap();
        root.add_child(child).unwrap();

        let bom = root.flatten_to_bom();
        assert_eq!(bom.project_name(), "Gateway");
        assert_eq!(bom.len(), 2);
        assert!(bom.audit_log().is_empty());
        assert!((bom.total_cost() - 15.0).abs() < 1e-9);
        // Projection did not mutate the tree
        assert_eq!(root.component_count(), 2);
    }

    #[test]
    fn test_summary() {
        let mut root = Assembly::new("Root", "");
        root.add_component(part("ROOT-1", 10.0)).unwrap();
        let mut child = Assembly::new("Child", "");
        child.add_component(part("C-1", 2.0)).unwrap();
        root.add_child(child).unwrap();

        let summary = root.summary();
        assert_eq!(summary.components_at_level, 1);
        assert_eq!(summary.total_components, 2);
        assert_eq!(summary.child_count, 1);
        assert!((summary.total_cost - 12.0).abs() < 1e-9);
    }
}
