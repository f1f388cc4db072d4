//! Scope and symbol management.
//!
//! Variables live in the slot table of the block that declares them. A name
//! may not shadow a variable of any enclosing block, nor a type; lookups
//! walk outward from the innermost block.

use crate::parser::Parser;
use gt_diagnostic::{CompileErrorKind, Error};
use gt_ir::{NodeId, ObjectId};
use gt_types::resolve_type;

impl Parser<'_> {
    /// Reject names reserved for qualified access, built-ins and constants.
    pub(crate) fn check_ident(&self, name: &str) -> Result<(), Error> {
        if name.contains('.') {
            return Err(self.error(CompileErrorKind::QualifiedIdent {
                name: name.to_string(),
            }));
        }
        if name.starts_with(|c: char| c.is_ascii_uppercase()) {
            return Err(self.error(CompileErrorKind::CapitalIdent {
                name: name.to_string(),
            }));
        }
        Ok(())
    }

    /// Declare `name` in `block` and return its slot.
    pub(crate) fn declare(&mut self, block: NodeId, name: &str, ty: ObjectId) -> Result<u32, Error> {
        self.check_ident(name)?;
        let collides = self.unit.namespace.types.contains_key(name)
            || self.find_var(Some(block), name).is_some();
        if collides {
            return Err(self.error(CompileErrorKind::NameCollision {
                name: name.to_string(),
            }));
        }
        let slot = self
            .block_mut(block)
            .map(|b| b.add_var(name, ty))
            .ok_or_else(|| self.unexpected())?;
        tracing::trace!(name, slot, "variable declared");
        Ok(slot)
    }

    /// Declare `name` in the current block.
    pub(crate) fn declare_here(&mut self, name: &str, ty: ObjectId) -> Result<(NodeId, u32), Error> {
        let block = self.scope()?;
        let slot = self.declare(block, name, ty)?;
        Ok((block, slot))
    }

    /// Innermost visible variable: owning block, slot and type.
    pub(crate) fn lookup_var(&self, name: &str) -> Option<(NodeId, u32, ObjectId)> {
        self.find_var(self.current, name)
    }

    fn find_var(&self, from: Option<NodeId>, name: &str) -> Option<(NodeId, u32, ObjectId)> {
        let mut cursor = from;
        while let Some(id) = cursor {
            let block = self.block(id)?;
            if let Some(&slot) = block.var_names.get(name) {
                return Some((id, slot, block.vars[slot as usize]));
            }
            cursor = block.parent;
        }
        None
    }

    pub(crate) fn resolve(&mut self, name: &str) -> Option<ObjectId> {
        resolve_type(self.ws, &mut self.unit.namespace, name)
    }

    pub(crate) fn require_type(&mut self, name: &str) -> Result<ObjectId, Error> {
        self.resolve(name).ok_or_else(|| {
            self.error(CompileErrorKind::UnknownType {
                name: name.to_string(),
            })
        })
    }
}
