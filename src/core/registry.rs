//! Sourcing registry - the BOM part list and each part's sourcing options
//!
//! Parts live in a single arena keyed by [`MaterialId`]. Sub-assemblies are
//! recorded as id references (parent and children lists) instead of owned
//! nested values, so any part can be found or mutated in O(1) by id.
//!
//! Writes addressed to an unknown id are silent no-ops: callers only pass ids
//! they obtained from a previous read.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::core::identity::MaterialId;
use crate::entities::material::{BomNode, MakeBuy, Material, NewMaterial, ProcessSourcing};

#[derive(Debug, Clone)]
struct Node {
    name: String,
    qty: f64,
    make_buy: Option<MakeBuy>,
    sourcing: Vec<ProcessSourcing>,
    parent: Option<MaterialId>,
    children: Vec<MaterialId>,
}

/// Borrowed view of one part, yielded by [`SourcingRegistry::iter`]
#[derive(Debug, Clone, Copy)]
pub struct MaterialRef<'a> {
    pub id: &'a MaterialId,
    pub name: &'a str,
    pub qty: f64,
    pub make_buy: Option<MakeBuy>,
    pub sourcing: &'a [ProcessSourcing],
    pub parent: Option<&'a MaterialId>,
    /// Nesting depth, 0 for top-level parts
    pub depth: usize,
}

impl<'a> MaterialRef<'a> {
    /// All (process, supplier) pairs this part can be sourced through
    pub fn sourcing_pairs(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.sourcing.iter().flat_map(|p| {
            p.suppliers
                .iter()
                .map(move |s| (p.process_type.as_str(), s.as_str()))
        })
    }
}

/// Owner of all BOM parts
#[derive(Debug, Clone, Default)]
pub struct SourcingRegistry {
    nodes: HashMap<MaterialId, Node>,
    /// Top-level parts in insertion order
    roots: Vec<MaterialId>,
}

impl SourcingRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the given parts
    pub fn with_materials(materials: impl IntoIterator<Item = NewMaterial>) -> Self {
        let mut registry = Self::new();
        for material in materials {
            registry.add_material(material);
        }
        registry
    }

    /// Append a top-level part and return its id
    pub fn add_material(&mut self, material: NewMaterial) -> MaterialId {
        let id = self.insert_node(material, None);
        self.roots.push(id.clone());
        id
    }

    /// Append a part under an existing part. Returns `None` if the parent is unknown.
    pub fn add_child(&mut self, parent: &MaterialId, material: NewMaterial) -> Option<MaterialId> {
        if !self.nodes.contains_key(parent) {
            debug!(parent = %parent, "add_child: unknown parent, ignoring");
            return None;
        }
        let id = self.insert_node(material, Some(parent.clone()));
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(id.clone());
        }
        Some(id)
    }

    fn insert_node(&mut self, material: NewMaterial, parent: Option<MaterialId>) -> MaterialId {
        let id = match material.id {
            Some(id) if !self.nodes.contains_key(&id) => id,
            Some(id) => {
                warn!(id = %id, "material id already in use, generating a new one");
                self.fresh_id()
            }
            None => self.fresh_id(),
        };

        debug!(id = %id, name = %material.name, "adding material");
        self.nodes.insert(
            id.clone(),
            Node {
                name: material.name,
                qty: material.qty,
                make_buy: material.make_buy,
                sourcing: Vec::new(),
                parent,
                children: Vec::new(),
            },
        );

        for process in material.sourcing {
            for supplier in &process.suppliers {
                self.add_supplier_to_process(&id, &process.process_type, supplier);
            }
        }
        for child in material.children {
            let child_id = self.insert_node(child, Some(id.clone()));
            if let Some(node) = self.nodes.get_mut(&id) {
                node.children.push(child_id);
            }
        }

        id
    }

    fn fresh_id(&self) -> MaterialId {
        loop {
            let id = MaterialId::generate();
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    /// Remove a part and its whole sub-assembly. Unknown ids are ignored.
    pub fn delete_material(&mut self, id: &MaterialId) {
        let Some(node) = self.nodes.get(id) else {
            debug!(id = %id, "delete_material: unknown id, ignoring");
            return;
        };

        match node.parent.clone() {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.children.retain(|c| c != id);
                }
            }
            None => self.roots.retain(|r| r != id),
        }

        let mut stack = vec![id.clone()];
        while let Some(current) = stack.pop() {
            if let Some(removed) = self.nodes.remove(&current) {
                trace!(id = %current, name = %removed.name, "removed material");
                stack.extend(removed.children);
            }
        }
    }

    /// Record that `supplier` can run `process_type` for a part
    ///
    /// Creates the process entry on first use. Adding a supplier that is
    /// already listed changes nothing.
    pub fn add_supplier_to_process(&mut self, id: &MaterialId, process_type: &str, supplier: &str) {
        let Some(node) = self.nodes.get_mut(id) else {
            debug!(id = %id, "add_supplier_to_process: unknown id, ignoring");
            return;
        };

        let index = match node
            .sourcing
            .iter()
            .position(|p| p.process_type == process_type)
        {
            Some(index) => index,
            None => {
                node.sourcing.push(ProcessSourcing::new(process_type));
                node.sourcing.len() - 1
            }
        };

        if node.sourcing[index].add_supplier(supplier) {
            debug!(id = %id, process = process_type, supplier, "added supplier");
        }
    }

    /// Drop a supplier from a process; the process goes away with its last supplier
    pub fn remove_supplier_from_process(
        &mut self,
        id: &MaterialId,
        process_type: &str,
        supplier: &str,
    ) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let Some(index) = node
            .sourcing
            .iter()
            .position(|p| p.process_type == process_type)
        else {
            return;
        };

        node.sourcing[index].suppliers.retain(|s| s != supplier);
        if node.sourcing[index].suppliers.is_empty() {
            node.sourcing.remove(index);
        }
    }

    /// Update a part's quantity in place
    pub fn set_qty(&mut self, id: &MaterialId, qty: f64) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.qty = qty;
        }
    }

    /// Update a part's make/buy decision in place
    pub fn set_make_buy(&mut self, id: &MaterialId, make_buy: Option<MakeBuy>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.make_buy = make_buy;
        }
    }

    /// Snapshot of one part including its sub-assembly
    pub fn get(&self, id: &MaterialId) -> Option<Material> {
        let node = self.nodes.get(id)?;
        Some(Material {
            id: id.clone(),
            name: node.name.clone(),
            qty: node.qty,
            make_buy: node.make_buy,
            sourcing: node.sourcing.clone(),
            children: node
                .children
                .iter()
                .filter_map(|child| self.get(child))
                .collect(),
        })
    }

    /// Snapshot of the whole BOM, top-level parts in insertion order
    pub fn materials(&self) -> Vec<Material> {
        self.roots.iter().filter_map(|id| self.get(id)).collect()
    }

    /// All parts, depth-first in BOM order
    pub fn iter(&self) -> impl Iterator<Item = MaterialRef<'_>> + '_ {
        let mut stack: Vec<(&MaterialId, usize)> =
            self.roots.iter().rev().map(|id| (id, 0)).collect();
        std::iter::from_fn(move || {
            let (id, depth) = stack.pop()?;
            let node = &self.nodes[id];
            stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
            Some(MaterialRef {
                id,
                name: &node.name,
                qty: node.qty,
                make_buy: node.make_buy,
                sourcing: &node.sourcing,
                parent: node.parent.as_ref(),
                depth,
            })
        })
    }

    /// Parts with the given name, anywhere in the tree
    pub fn find_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = MaterialRef<'a>> + 'a {
        self.iter().filter(move |m| m.name == name)
    }

    /// BOM tree for display
    pub fn bom_tree(&self) -> Vec<BomNode> {
        fn build(registry: &SourcingRegistry, id: &MaterialId) -> Option<BomNode> {
            let node = registry.nodes.get(id)?;
            Some(BomNode {
                label: node.name.clone(),
                key: id.to_string(),
                qty: node.qty,
                children: node
                    .children
                    .iter()
                    .filter_map(|c| build(registry, c))
                    .collect(),
            })
        }
        self.roots.iter().filter_map(|id| build(self, id)).collect()
    }

    pub fn contains(&self, id: &MaterialId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of parts, including sub-assembly parts
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> NewMaterial {
        NewMaterial::new("BODY", 1.0, Some(MakeBuy::Make))
    }

    #[test]
    fn test_add_material_generates_id() {
        let mut reg = SourcingRegistry::new();
        let id = reg.add_material(body());

        assert!(id.is_generated());
        let mat = reg.get(&id).unwrap();
        assert_eq!(mat.name, "BODY");
        assert!(mat.sourcing.is_empty());
    }

    #[test]
    fn test_add_material_keeps_supplied_id() {
        let mut reg = SourcingRegistry::new();
        let id = reg.add_material(body().with_id("body-1"));
        assert_eq!(id.as_str(), "body-1");
    }

    #[test]
    fn test_duplicate_supplied_id_gets_fresh_id() {
        let mut reg = SourcingRegistry::new();
        let first = reg.add_material(body().with_id("body-1"));
        let second = reg.add_material(body().with_id("body-1"));
        assert_ne!(first, second);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_materials_keep_insertion_order() {
        let reg = SourcingRegistry::with_materials(vec![
            body(),
            NewMaterial::new("DISC", 1.0, Some(MakeBuy::Make)),
            NewMaterial::new("SEAT", 1.0, Some(MakeBuy::Buy)),
        ]);
        let names: Vec<_> = reg.materials().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["BODY", "DISC", "SEAT"]);
    }

    #[test]
    fn test_delete_material() {
        let mut reg = SourcingRegistry::new();
        let body_id = reg.add_material(body());
        let seat_id = reg.add_material(NewMaterial::new("SEAT", 1.0, Some(MakeBuy::Buy)));

        reg.delete_material(&body_id);

        assert!(!reg.contains(&body_id));
        assert!(reg.contains(&seat_id));
        assert_eq!(reg.materials().len(), 1);
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut reg = SourcingRegistry::with_materials(vec![body()]);
        reg.delete_material(&MaterialId::from("MAT-missing"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_delete_removes_subassembly() {
        let mut reg = SourcingRegistry::new();
        let op = reg.add_material(NewMaterial::new("OPERATOR", 1.0, Some(MakeBuy::Buy)));
        let gear = reg
            .add_child(&op, NewMaterial::new("GEARBOX", 1.0, Some(MakeBuy::Buy)))
            .unwrap();
        reg.add_child(&gear, NewMaterial::new("HANDWHEEL", 1.0, None))
            .unwrap();
        assert_eq!(reg.len(), 3);

        reg.delete_material(&op);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_delete_child_detaches_from_parent() {
        let mut reg = SourcingRegistry::new();
        let op = reg.add_material(NewMaterial::new("OPERATOR", 1.0, None));
        let lever = reg.add_child(&op, NewMaterial::new("LEVER", 1.0, None)).unwrap();

        reg.delete_material(&lever);
        assert!(reg.get(&op).unwrap().children.is_empty());
    }

    #[test]
    fn test_add_child_unknown_parent() {
        let mut reg = SourcingRegistry::new();
        assert!(reg.add_child(&MaterialId::from("nope"), body()).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_add_supplier_creates_process() {
        let mut reg = SourcingRegistry::new();
        let id = reg.add_material(body());
        reg.add_supplier_to_process(&id, "SAND CAST", "IRONCORE CASTINGS PVT. LTD.");

        let mat = reg.get(&id).unwrap();
        assert_eq!(mat.sourcing.len(), 1);
        assert_eq!(mat.sourcing[0].process_type, "SAND CAST");
        assert_eq!(mat.sourcing[0].suppliers, vec!["IRONCORE CASTINGS PVT. LTD."]);
    }

    #[test]
    fn test_add_supplier_is_idempotent() {
        let mut reg = SourcingRegistry::new();
        let id = reg.add_material(body());
        reg.add_supplier_to_process(&id, "SAND CAST", "IRONCORE");
        let once = reg.get(&id).unwrap().sourcing;

        reg.add_supplier_to_process(&id, "SAND CAST", "IRONCORE");
        let twice = reg.get(&id).unwrap().sourcing;

        assert_eq!(once, twice);
    }

    #[test]
    fn test_process_types_stay_unique() {
        let mut reg = SourcingRegistry::new();
        let id = reg.add_material(body());
        reg.add_supplier_to_process(&id, "SAND CAST", "A");
        reg.add_supplier_to_process(&id, "INVESTMENT CASTING", "B");
        reg.add_supplier_to_process(&id, "SAND CAST", "C");

        let mat = reg.get(&id).unwrap();
        assert_eq!(mat.sourcing.len(), 2);
        assert_eq!(mat.process("SAND CAST").unwrap().suppliers, vec!["A", "C"]);
    }

    #[test]
    fn test_add_supplier_unknown_id_is_noop() {
        let mut reg = SourcingRegistry::with_materials(vec![body()]);
        let before = reg.materials();
        reg.add_supplier_to_process(&MaterialId::from("MAT-missing"), "SAND CAST", "A");
        assert_eq!(reg.materials(), before);
    }

    #[test]
    fn test_initial_sourcing_is_normalized() {
        let mut mat = body();
        mat.sourcing = vec![
            ProcessSourcing {
                process_type: "SAND CAST".to_string(),
                suppliers: vec!["A".to_string(), "A".to_string()],
            },
            ProcessSourcing {
                process_type: "SAND CAST".to_string(),
                suppliers: vec!["B".to_string()],
            },
        ];
        let mut reg = SourcingRegistry::new();
        let id = reg.add_material(mat);

        let sourcing = reg.get(&id).unwrap().sourcing;
        assert_eq!(sourcing.len(), 1);
        assert_eq!(sourcing[0].suppliers, vec!["A", "B"]);
    }

    #[test]
    fn test_remove_supplier_drops_empty_process() {
        let mut reg = SourcingRegistry::new();
        let id = reg.add_material(body());
        reg.add_supplier_to_process(&id, "SAND CAST", "A");
        reg.add_supplier_to_process(&id, "SAND CAST", "B");

        reg.remove_supplier_from_process(&id, "SAND CAST", "A");
        assert_eq!(reg.get(&id).unwrap().sourcing[0].suppliers, vec!["B"]);

        reg.remove_supplier_from_process(&id, "SAND CAST", "B");
        assert!(reg.get(&id).unwrap().sourcing.is_empty());
    }

    #[test]
    fn test_set_qty_and_make_buy() {
        let mut reg = SourcingRegistry::new();
        let id = reg.add_material(NewMaterial::new("STEM", 1.0, None));

        reg.set_qty(&id, 2.0);
        reg.set_make_buy(&id, Some(MakeBuy::Buy));

        let mat = reg.get(&id).unwrap();
        assert_eq!(mat.qty, 2.0);
        assert_eq!(mat.make_buy, Some(MakeBuy::Buy));
    }

    #[test]
    fn test_iter_is_depth_first() {
        let mut reg = SourcingRegistry::new();
        let body = reg.add_material(body());
        let op = reg.add_material(NewMaterial::new("OPERATOR", 1.0, None));
        reg.add_child(&op, NewMaterial::new("GEARBOX", 1.0, None));
        reg.add_material(NewMaterial::new("PACKING", 1.0, None));

        let order: Vec<_> = reg.iter().map(|m| (m.name.to_string(), m.depth)).collect();
        assert_eq!(
            order,
            vec![
                ("BODY".to_string(), 0),
                ("OPERATOR".to_string(), 0),
                ("GEARBOX".to_string(), 1),
                ("PACKING".to_string(), 0),
            ]
        );
        assert_eq!(reg.find_by_name("BODY").next().unwrap().id, &body);
    }

    #[test]
    fn test_nested_new_material() {
        let mut op = NewMaterial::new("OPERATOR", 1.0, Some(MakeBuy::Buy));
        op.children = vec![NewMaterial::new("GEARBOX", 2.0, None)];
        let reg = SourcingRegistry::with_materials(vec![op]);

        let tree = reg.bom_tree();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].label, "OPERATOR");
        assert_eq!(tree[0].children[0].label, "GEARBOX");
        assert_eq!(tree[0].children[0].qty, 2.0);
    }
}
