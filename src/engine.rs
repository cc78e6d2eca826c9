//! Key and pointer handling for a checklist block.
//!
//! Every gesture is a [`Command`] applied against the model together with the
//! caret the host reports. The result tells the host whether the gesture was
//! consumed and where the caret goes next.

use tracing::debug;

use crate::caret::{self, CaretPlacement, CaretPosition};
use crate::config::ToolConfig;
use crate::host::BlockHost;
use crate::model::{ChecklistModel, ItemId};
use crate::serial::{self, BlockData};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    Checkbox,
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Enter,
    Backspace,
    Indent,
    Outdent,
    ToggleCheckbox { item: ItemId, target: ClickTarget },
    PointerLeave { item: ItemId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// The engine consumed the gesture; the host must skip its default handling.
    pub handled: bool,
    pub changed: bool,
    pub caret: CaretPlacement,
}

impl Outcome {
    /// Not ours: the host applies its native behaviour.
    pub fn unhandled() -> Self {
        Self {
            handled: false,
            changed: false,
            caret: CaretPlacement::Keep,
        }
    }

    fn consumed() -> Self {
        Self {
            handled: true,
            changed: false,
            caret: CaretPlacement::Keep,
        }
    }

    fn changed(caret: CaretPlacement) -> Self {
        Self {
            handled: true,
            changed: true,
            caret,
        }
    }
}

pub struct EditingEngine<H> {
    model: ChecklistModel,
    host: H,
    config: ToolConfig,
    hover_suppressed: Option<ItemId>,
}

impl<H: BlockHost> EditingEngine<H> {
    pub fn new(model: ChecklistModel, host: H, config: ToolConfig) -> Self {
        Self {
            model,
            host,
            config,
            hover_suppressed: None,
        }
    }

    pub fn model(&self) -> &ChecklistModel {
        &self.model
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    pub fn save(&self) -> BlockData {
        serial::save(&self.model)
    }

    /// The checkbox of `item` was just toggled and the pointer has not left it yet.
    pub fn hover_suppressed(&self, item: ItemId) -> bool {
        self.hover_suppressed == Some(item)
    }

    pub fn dispatch(&mut self, command: Command, caret: Option<CaretPosition>) -> Outcome {
        if self.config.read_only {
            return Outcome::unhandled();
        }
        match command {
            Command::Enter => self.enter(caret),
            Command::Backspace => self.backspace(caret),
            Command::Indent => self.indent(caret),
            Command::Outdent => self.outdent(caret),
            Command::ToggleCheckbox { item, target } => self.toggle_checkbox(item, target),
            Command::PointerLeave { item } => self.pointer_leave(item),
        }
    }

    /// Text typed into an item's region.
    pub fn insert_text(&mut self, caret: CaretPosition, text: &str) -> Option<CaretPosition> {
        if self.config.read_only {
            return None;
        }
        let caret = caret::clamp(&self.model, caret)?;
        let item = self.model.get_mut(caret.item)?;
        let offset = item.content.insert_text(caret.offset, text);
        Some(CaretPosition::new(caret.item, offset))
    }

    /// Native single-character delete inside a region.
    pub fn delete_backward(&mut self, caret: CaretPosition) -> Option<CaretPosition> {
        if self.config.read_only {
            return None;
        }
        let caret = caret::clamp(&self.model, caret)?;
        let item = self.model.get_mut(caret.item)?;
        if !item.content.remove_char_before(caret.offset) {
            return None;
        }
        Some(CaretPosition::new(caret.item, caret.offset - 1))
    }

    fn enter(&mut self, caret: Option<CaretPosition>) -> Outcome {
        let Some(caret) = caret.and_then(|caret| caret::clamp(&self.model, caret)) else {
            return Outcome::unhandled();
        };
        let is_last = self.model.is_last(caret.item);
        let Some(item) = self.model.get_mut(caret.item) else {
            return Outcome::unhandled();
        };

        if item.content.is_blank() && item.level > 0 {
            item.level -= 1;
            debug!(item = ?caret.item, level = item.level, "enter on empty nested item dedents");
            return Outcome::changed(CaretPlacement::Keep);
        }

        if item.content.is_blank() && is_last {
            self.model.remove(caret.item);
            let index = self.host.current_block_index();
            self.host.insert_block_after(index);
            self.host.set_focus_to_block(index + 1);
            debug!(item = ?caret.item, block = index, "enter on trailing empty item leaves checklist");
            return Outcome::changed(CaretPlacement::LeaveBlock(index + 1));
        }

        let level = item.level;
        let trailing = item.content.split_off(caret.offset);
        let Some(new_item) = self
            .model
            .insert_after(caret.item, trailing, false, level)
        else {
            return Outcome::unhandled();
        };
        debug!(item = ?caret.item, new_item = ?new_item, offset = caret.offset, "split item");
        Outcome::changed(caret::move_caret_to_start(new_item))
    }

    fn backspace(&mut self, caret: Option<CaretPosition>) -> Outcome {
        let Some(caret) = caret.and_then(|caret| caret::clamp(&self.model, caret)) else {
            return Outcome::unhandled();
        };
        if !caret::is_at_start(&self.model, caret) {
            return Outcome::unhandled();
        }
        let Some(previous) = self.model.previous(caret.item) else {
            return Outcome::unhandled();
        };
        let Some(mut current) = self.model.remove(caret.item) else {
            return Outcome::unhandled();
        };
        let fragment = current.content.split_off(caret.offset);
        let Some(target) = self.model.get_mut(previous) else {
            return Outcome::unhandled();
        };
        let boundary = target.content.append(fragment);
        debug!(item = ?caret.item, into = ?previous, boundary, "merged item into previous");
        Outcome::changed(caret::move_caret_to_child_offset(previous, boundary))
    }

    fn indent(&mut self, caret: Option<CaretPosition>) -> Outcome {
        let Some(item) = caret.and_then(|caret| self.model.get_mut(caret.item)) else {
            return Outcome::unhandled();
        };
        item.level += 1;
        debug!(item = ?item.id(), level = item.level, "indent");
        Outcome::changed(CaretPlacement::Keep)
    }

    fn outdent(&mut self, caret: Option<CaretPosition>) -> Outcome {
        let Some(item) = caret.and_then(|caret| self.model.get_mut(caret.item)) else {
            return Outcome::unhandled();
        };
        if item.level == 0 {
            return Outcome::consumed();
        }
        item.level -= 1;
        debug!(item = ?item.id(), level = item.level, "outdent");
        Outcome::changed(CaretPlacement::Keep)
    }

    fn toggle_checkbox(&mut self, item: ItemId, target: ClickTarget) -> Outcome {
        if target != ClickTarget::Checkbox {
            return Outcome::unhandled();
        }
        let Some(found) = self.model.get_mut(item) else {
            return Outcome::unhandled();
        };
        found.checked = !found.checked;
        self.hover_suppressed = Some(item);
        debug!(item = ?item, checked = found.checked, "toggled checkbox");
        Outcome::changed(CaretPlacement::Keep)
    }

    fn pointer_leave(&mut self, item: ItemId) -> Outcome {
        if self.hover_suppressed != Some(item) {
            return Outcome::unhandled();
        }
        self.hover_suppressed = None;
        Outcome::consumed()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
