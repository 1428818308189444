//! Navigation effects requested of the presentation layer.

use crate::model::item::ItemId;

/// A route change the core asks the caller to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationRequest {
    /// Show the editor for one item.
    OpenEditor(ItemId),
    /// Return from the editor to the list view.
    Back,
}
