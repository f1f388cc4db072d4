//! The process-wide program registry.

use crate::{Object, ObjectId, Primitives, TypeDesc, Unit};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// Index of the standard library unit in every workspace.
pub const STDLIB_UNIT: usize = 0;

/// Owner of all compiled units and all top-level objects.
///
/// Units are shared through `Arc`, so cloning a workspace to hand it to a
/// running program copies the object table and bumps reference counts, but
/// never duplicates command trees.
#[derive(Clone, Debug, Default)]
pub struct Workspace {
    units: Vec<Arc<Unit>>,
    objects: Vec<Object>,
    unit_names: FxHashMap<String, usize>,
    linked: FxHashSet<String>,
    primitives: Option<Primitives>,
}

/// Registry sizes captured before a compile, for all-or-nothing commits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    objects: usize,
    units: usize,
    linked: FxHashSet<String>,
}

impl Workspace {
    /// An empty workspace without a standard library.
    pub fn new() -> Self {
        Workspace::default()
    }

    pub fn units(&self) -> &[Arc<Unit>] {
        &self.units
    }

    pub fn unit(&self, index: usize) -> Option<&Arc<Unit>> {
        self.units.get(index)
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }

    #[inline]
    pub fn object_mut(&mut self, id: ObjectId) -> &mut Object {
        &mut self.objects[id.index()]
    }

    /// Type descriptor behind `id`, if it is a type.
    pub fn type_desc(&self, id: ObjectId) -> Option<&TypeDesc> {
        self.objects.get(id.index()).and_then(Object::as_type)
    }

    pub fn push_object(&mut self, object: Object) -> ObjectId {
        let id = ObjectId::new(u32::try_from(self.objects.len()).unwrap_or(u32::MAX));
        self.objects.push(object);
        id
    }

    /// Id the next committed unit will get.
    pub fn next_unit_index(&self) -> usize {
        self.units.len()
    }

    pub fn unit_index(&self, name: &str) -> Option<usize> {
        self.unit_names.get(name).copied()
    }

    /// Append a unit and register it under its name.
    ///
    /// A name already in use is rebound to the new unit; the unit it pointed
    /// to stays in storage.
    pub fn register_unit(&mut self, unit: Unit) -> usize {
        let index = self.units.len();
        self.unit_names.insert(unit.name.clone(), index);
        self.units.push(Arc::new(unit));
        index
    }

    pub fn is_linked(&self, name: &str) -> bool {
        self.linked.contains(name)
    }

    pub fn mark_linked(&mut self, name: &str) {
        self.linked.insert(name.to_string());
    }

    pub fn primitives(&self) -> Option<&Primitives> {
        self.primitives.as_ref()
    }

    pub fn set_primitives(&mut self, primitives: Primitives) {
        self.primitives = Some(primitives);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            objects: self.objects.len(),
            units: self.units.len(),
            linked: self.linked.clone(),
        }
    }

    /// Drop everything appended since `snapshot`.
    ///
    /// Name registrations pointing at truncated units are removed. A name
    /// rebound by the failed attempt cannot be restored, but a compile only
    /// registers its unit after everything else succeeded.
    pub fn rollback(&mut self, snapshot: Snapshot) {
        self.objects.truncate(snapshot.objects);
        self.units.truncate(snapshot.units);
        self.unit_names.retain(|_, index| *index < snapshot.units);
        self.linked = snapshot.linked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Primitive, TypeKind};
    use pretty_assertions::assert_eq;

    fn int_type() -> Object {
        Object::Type(TypeDesc {
            name: "int".into(),
            kind: TypeKind::Primitive(Primitive::Int),
        })
    }

    #[test]
    fn rollback_truncates_objects_units_and_names() {
        let mut ws = Workspace::new();
        ws.push_object(int_type());
        ws.register_unit(Unit {
            name: "stdlib".into(),
            ..Unit::default()
        });
        let snapshot = ws.snapshot();

        ws.push_object(int_type());
        ws.mark_linked("lib");
        ws.register_unit(Unit {
            name: "app".into(),
            ..Unit::default()
        });
        assert_eq!(ws.unit_index("app"), Some(1));

        ws.rollback(snapshot);
        assert_eq!(ws.object_count(), 1);
        assert_eq!(ws.unit_count(), 1);
        assert_eq!(ws.unit_index("app"), None);
        assert_eq!(ws.unit_index("stdlib"), Some(0));
        assert!(!ws.is_linked("lib"));
    }

    #[test]
    fn reregistering_a_name_points_at_the_newest_unit() {
        let mut ws = Workspace::new();
        let first = ws.register_unit(Unit {
            name: "app".into(),
            ..Unit::default()
        });
        let second = ws.register_unit(Unit {
            name: "app".into(),
            ..Unit::default()
        });
        assert_ne!(first, second);
        assert_eq!(ws.unit_index("app"), Some(second));
        assert_eq!(ws.unit_count(), 2);
    }

    #[test]
    fn clone_shares_units() {
        let mut ws = Workspace::new();
        ws.register_unit(Unit::default());
        let copy = ws.clone();
        assert!(Arc::ptr_eq(&ws.units()[0], &copy.units()[0]));
    }
}
