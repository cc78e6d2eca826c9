use std::fmt;

use crate::model::ChecklistModel;
use crate::serial::{export_plain_text, import_plain_text};

const CHECKLIST_ICON: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><path d="M9 7h10M9 12h10M9 17h10" stroke="currentColor" stroke-width="2" stroke-linecap="round"/><path d="M4 6.5l1 1 2-2M4 11.5l1 1 2-2M4 16.5l1 1 2-2" stroke="currentColor" stroke-width="1.5" fill="none" stroke-linecap="round" stroke-linejoin="round"/></svg>"#;

/// Services the surrounding document editor provides to a checklist block.
pub trait BlockHost {
    /// Position of this checklist block in the document.
    fn current_block_index(&self) -> usize;

    /// Creates a new default block after `index`.
    fn insert_block_after(&mut self, index: usize);

    fn set_focus_to_block(&mut self, index: usize);

    /// Base styling token applied to the checklist container.
    fn block_style_class_name(&self) -> &str {
        "cdx-block"
    }
}

/// How the tool presents itself to the host's toolbox.
#[derive(Clone, Copy, Debug)]
pub struct ToolMetadata {
    pub title: &'static str,
    pub icon: &'static str,
    pub read_only_supported: bool,
    pub line_breaks_enabled: bool,
    pub conversion: Conversion,
}

/// Plain-text conversion to and from other block types.
#[derive(Clone, Copy)]
pub struct Conversion {
    pub export: fn(&ChecklistModel) -> String,
    pub import: fn(&str) -> ChecklistModel,
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversion").finish_non_exhaustive()
    }
}

impl Default for ToolMetadata {
    fn default() -> Self {
        Self {
            title: "Checklist",
            icon: CHECKLIST_ICON,
            read_only_supported: true,
            line_breaks_enabled: true,
            conversion: Conversion {
                export: export_plain_text,
                import: import_plain_text,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_round_trip_through_plain_text() {
        let metadata = ToolMetadata::default();
        let model = (metadata.conversion.import)("hello");
        assert_eq!((metadata.conversion.export)(&model), "hello");
        assert_eq!(metadata.title, "Checklist");
        assert!(metadata.read_only_supported);
        assert!(metadata.line_breaks_enabled);
    }
}
