//! Which picker panel currently owns outside clicks.
//!
//! Only one panel is open per [`egui::Context`]. Opening a picker claims the slot and
//! the previous owner closes on its next frame.

use egui::{Context, Id};

/// The context-wide active popover slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PopoverRegistry {
    active: Option<Id>,
}

impl PopoverRegistry {
    fn storage_id() -> Id {
        Id::new("egui_datepicker::active_popover")
    }

    pub fn load(ctx: &Context) -> Self {
        ctx.data(|data| data.get_temp(Self::storage_id()))
            .unwrap_or_default()
    }

    pub fn store(self, ctx: &Context) {
        ctx.data_mut(|data| data.insert_temp(Self::storage_id(), self));
    }

    /// Load, modify and store the registry of `ctx`.
    pub fn update<R>(ctx: &Context, f: impl FnOnce(&mut Self) -> R) -> R {
        let mut registry = Self::load(ctx);
        let result = f(&mut registry);
        registry.store(ctx);
        result
    }

    pub fn active(&self) -> Option<Id> {
        self.active
    }

    pub fn is_active(&self, id: Id) -> bool {
        self.active == Some(id)
    }

    /// Make `id` the active popover. Returns the popover it replaced, if any.
    pub fn claim(&mut self, id: Id) -> Option<Id> {
        self.active.replace(id).filter(|previous| *previous != id)
    }

    /// Give up the slot if `id` holds it. Returns `true` if it did.
    pub fn release(&mut self, id: Id) -> bool {
        if self.is_active(id) {
            self.active = None;
            true
        } else {
            false
        }
    }
}
