//! Caret positions within item regions.
//!
//! The engine never reads focus from the environment. Hosts pass the caret
//! in as a [`CaretPosition`] and get a [`CaretPlacement`] back describing
//! where it should go after the edit.

use crate::model::{ChecklistModel, ItemId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaretPosition {
    pub item: ItemId,
    pub offset: usize,
}

impl CaretPosition {
    pub fn new(item: ItemId, offset: usize) -> Self {
        Self { item, offset }
    }
}

/// Where the host should put the caret after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaretPlacement {
    Keep,
    Start(ItemId),
    End(ItemId),
    At(CaretPosition),
    /// Focus moved to the host block at this index.
    LeaveBlock(usize),
}

impl CaretPlacement {
    /// Turns the instruction into a concrete position inside `model`.
    pub fn resolve(
        self,
        model: &ChecklistModel,
        current: Option<CaretPosition>,
    ) -> Option<CaretPosition> {
        match self {
            CaretPlacement::Keep => current.and_then(|caret| clamp(model, caret)),
            CaretPlacement::Start(item) => clamp(model, CaretPosition::new(item, 0)),
            CaretPlacement::End(item) => clamp(model, CaretPosition::new(item, usize::MAX)),
            CaretPlacement::At(caret) => clamp(model, caret),
            CaretPlacement::LeaveBlock(_) => None,
        }
    }
}

pub fn move_caret_to_start(item: ItemId) -> CaretPlacement {
    CaretPlacement::Start(item)
}

pub fn move_caret_to_end(item: ItemId) -> CaretPlacement {
    CaretPlacement::End(item)
}

/// Places the caret at the seam of a merge, `boundary` characters into
/// `item`, where the appended children begin.
pub fn move_caret_to_child_offset(item: ItemId, boundary: usize) -> CaretPlacement {
    CaretPlacement::At(CaretPosition::new(item, boundary))
}

/// Validates the caret against the model, clamping its offset into range.
pub fn clamp(model: &ChecklistModel, caret: CaretPosition) -> Option<CaretPosition> {
    let item = model.get(caret.item)?;
    Some(CaretPosition::new(
        caret.item,
        item.content.clamp_offset(caret.offset),
    ))
}

pub fn focus_offset(model: &ChecklistModel, caret: CaretPosition) -> Option<usize> {
    clamp(model, caret).map(|caret| caret.offset)
}

pub fn is_at_start(model: &ChecklistModel, caret: CaretPosition) -> bool {
    focus_offset(model, caret) == Some(0)
}
