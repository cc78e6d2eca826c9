use crate::markup::RichText;

/// Stable identity of an item's editable region within one model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecklistItem {
    id: ItemId,
    pub content: RichText,
    pub checked: bool,
    pub level: usize,
}

impl ChecklistItem {
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Current markup of the item's region.
    pub fn text(&self) -> String {
        self.content.to_markup()
    }

    pub fn inset_em(&self) -> usize {
        inset_em(self.level)
    }
}

/// Left inset of an item, in em, for the given indentation level.
pub fn inset_em(level: usize) -> usize {
    level * 2
}

/// Ordered checklist items owned by a single block.
#[derive(Clone, Debug)]
pub struct ChecklistModel {
    items: Vec<ChecklistItem>,
    next_id: u64,
}

impl ChecklistModel {
    /// A fresh checklist holding one empty, unchecked item at level 0.
    pub fn new() -> Self {
        let mut model = Self::empty();
        model.push(RichText::new(), false, 0);
        model
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_id: 0,
        }
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, content: RichText, checked: bool, level: usize) -> ItemId {
        let item = self.make_item(content, checked, level);
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Inserts a new item directly after `anchor`.
    pub fn insert_after(
        &mut self,
        anchor: ItemId,
        content: RichText,
        checked: bool,
        level: usize,
    ) -> Option<ItemId> {
        let index = self.position(anchor)?;
        let item = self.make_item(content, checked, level);
        let id = item.id;
        self.items.insert(index + 1, item);
        Some(id)
    }

    pub fn remove(&mut self, id: ItemId) -> Option<ChecklistItem> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn get(&self, id: ItemId) -> Option<&ChecklistItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut ChecklistItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn previous(&self, id: ItemId) -> Option<ItemId> {
        let index = self.position(id)?;
        let previous = index.checked_sub(1)?;
        Some(self.items[previous].id)
    }

    pub fn next(&self, id: ItemId) -> Option<ItemId> {
        let index = self.position(id)?;
        self.items.get(index + 1).map(|item| item.id)
    }

    pub fn is_last(&self, id: ItemId) -> bool {
        self.items.last().is_some_and(|item| item.id == id)
    }

    pub fn first_id(&self) -> Option<ItemId> {
        self.items.first().map(|item| item.id)
    }

    pub fn last_id(&self) -> Option<ItemId> {
        self.items.last().map(|item| item.id)
    }

    fn make_item(&mut self, content: RichText, checked: bool, level: usize) -> ChecklistItem {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        ChecklistItem {
            id,
            content,
            checked,
            level,
        }
    }
}

impl Default for ChecklistModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with(texts: &[&str]) -> ChecklistModel {
        let mut model = ChecklistModel::empty();
        for text in texts {
            model.push(RichText::from_markup(text), false, 0);
        }
        model
    }

    #[test]
    fn new_model_has_single_empty_item() {
        let model = ChecklistModel::new();
        assert_eq!(model.len(), 1);
        let item = &model.items()[0];
        assert_eq!(item.text(), "");
        assert!(!item.checked);
        assert_eq!(item.level, 0);
    }

    #[test]
    fn insert_after_keeps_order_and_fresh_ids() {
        let mut model = model_with(&["a", "c"]);
        let first = model.items()[0].id();
        let inserted = model
            .insert_after(first, RichText::from_markup("b"), false, 1)
            .expect("anchor exists");
        let texts: Vec<String> = model.items().iter().map(ChecklistItem::text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(model.position(inserted), Some(1));
        assert!(model.items().iter().filter(|item| item.id() == inserted).count() == 1);
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut model = model_with(&["a"]);
        let first = model.items()[0].id();
        model.remove(first);
        let second = model.push(RichText::new(), false, 0);
        assert_ne!(first, second);
        assert_eq!(model.get(first), None);
    }

    #[test]
    fn neighbours() {
        let model = model_with(&["a", "b"]);
        let a = model.items()[0].id();
        let b = model.items()[1].id();
        assert_eq!(model.previous(a), None);
        assert_eq!(model.previous(b), Some(a));
        assert_eq!(model.next(a), Some(b));
        assert!(model.is_last(b));
        assert!(!model.is_last(a));
    }

    #[test]
    fn inset_is_two_em_per_level() {
        assert_eq!(inset_em(0), 0);
        assert_eq!(inset_em(3), 6);
    }
}
