//! Live component set: the single owner of every running component.
//!
//! Components are stored densely and addressed by [`ComponentId`]; names map
//! to ids. Cross-component reads go through this table so no component ever
//! holds a reference to another one.

use pvs_components::{ProcessModel, SimComponent};
use pvs_core::ComponentId;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
pub struct ComponentSet {
    names: Vec<String>,
    components: Vec<SimComponent>,
    index: HashMap<String, ComponentId>,
}

impl ComponentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under `name`. An existing component with that name is replaced
    /// in place and keeps its id. Returns `None` if the set is full.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        component: SimComponent,
    ) -> Option<ComponentId> {
        let name = name.into();
        if let Some(&id) = self.index.get(&name) {
            self.components[id.index()] = component;
            return Some(id);
        }
        let id = ComponentId::from_index(self.components.len())?;
        self.index.insert(name.clone(), id);
        self.names.push(name);
        self.components.push(component);
        Some(id)
    }

    pub fn clear(&mut self) {
        self.names.clear();
        self.components.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn id_of(&self, name: &str) -> Option<ComponentId> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&SimComponent> {
        self.id_of(name).and_then(|id| self.by_id(id))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SimComponent> {
        let id = self.id_of(name)?;
        self.by_id_mut(id)
    }

    pub fn by_id(&self, id: ComponentId) -> Option<&SimComponent> {
        self.components.get(id.index())
    }

    pub fn by_id_mut(&mut self, id: ComponentId) -> Option<&mut SimComponent> {
        self.components.get_mut(id.index())
    }

    pub fn name_of(&self, id: ComponentId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Current value of the component called `name`.
    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).map(|c| c.current_value())
    }

    pub fn value_at(&self, id: ComponentId) -> Option<f64> {
        self.by_id(id).map(|c| c.current_value())
    }

    /// `(name, component)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SimComponent)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.components.iter())
    }

    /// Name to current value, for display.
    pub fn values(&self) -> BTreeMap<String, f64> {
        self.iter()
            .map(|(name, c)| (name.to_string(), c.current_value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pvs_components::{FlowComponent, LevelComponent};

    #[test]
    fn insert_and_lookup() {
        let mut set = ComponentSet::new();
        let f = set.insert("F1", FlowComponent::new("F1", 1.0, 1.0, 3.0).into()).unwrap();
        let l = set.insert("L1", LevelComponent::new("L1", 1.0, 0.5).into()).unwrap();
        assert_ne!(f, l);
        assert_eq!(set.len(), 2);
        assert_eq!(set.value_of("F1"), Some(3.0));
        assert_eq!(set.value_at(l), Some(0.5));
        assert_eq!(set.name_of(f), Some("F1"));
        assert_eq!(set.value_of("missing"), None);
    }

    #[test]
    fn duplicate_name_replaces_in_place() {
        let mut set = ComponentSet::new();
        let first = set.insert("X", FlowComponent::new("X", 1.0, 1.0, 1.0).into()).unwrap();
        let second = set.insert("X", LevelComponent::new("X", 1.0, 9.0).into()).unwrap();
        assert_eq!(first, second);
        assert_eq!(set.len(), 1);
        assert_eq!(set.value_of("X"), Some(9.0));
    }

    #[test]
    fn values_snapshot() {
        let mut set = ComponentSet::new();
        set.insert("B", FlowComponent::new("B", 1.0, 1.0, 2.0).into());
        set.insert("A", FlowComponent::new("A", 1.0, 1.0, 1.0).into());
        let values = set.values();
        assert_eq!(values.get("A"), Some(&1.0));
        assert_eq!(values.get("B"), Some(&2.0));
        let order: Vec<&str> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["B", "A"]);
    }
}
