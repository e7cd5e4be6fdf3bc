//! Plugin type descriptors (§3 "Plugin").

use std::collections::HashMap;

use crate::record::WidgetRecord;
use crate::widget::Widget;

/// Builds a fresh widget instance for a registered plugin name.
pub type WidgetFactory = Box<dyn Fn() -> Box<dyn Widget> + Send + Sync>;

/// A type descriptor `{name, factory}` plus all live widgets of that type.
///
/// Created lazily on first widget creation for a given plugin name, and torn
/// down (along with every live widget) when the `WidgetManager` itself is
/// dropped.
pub struct Plugin {
    pub name: String,
    factory: WidgetFactory,
    pub(crate) widgets: HashMap<u16, (WidgetRecord, Box<dyn Widget>)>,
}

impl Plugin {
    pub fn new(name: impl Into<String>, factory: WidgetFactory) -> Self {
        Self {
            name: name.into(),
            factory,
            widgets: HashMap::new(),
        }
    }

    pub fn create_instance(&self) -> Box<dyn Widget> {
        (self.factory)()
    }
}

/// A plugin that claims a contiguous codepoint range and is consulted on every
/// cell sync for a replacement glyph (§4.3 "Custom-glyph plugins").
pub struct CustomGlyphPlugin {
    pub name: String,
    pub range: (u32, u32),
    factory: WidgetFactory,
}

impl CustomGlyphPlugin {
    pub fn new(name: impl Into<String>, range: (u32, u32), factory: WidgetFactory) -> Self {
        Self {
            name: name.into(),
            range,
            factory,
        }
    }

    pub fn claims(&self, codepoint: u32) -> bool {
        codepoint >= self.range.0 && codepoint <= self.range.1
    }

    pub fn create_instance(&self) -> Box<dyn Widget> {
        (self.factory)()
    }
}
