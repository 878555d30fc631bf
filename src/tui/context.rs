//! Page-scoped selection
//!
//! Rows clicked on the current page become the subject of contextual
//! dialogs (record a deposit for *this* customer, assign *this* committee to
//! *that* policy). The App owns one `PageContext` and clears it whenever the
//! route changes, so a selection never leaks into another page.

use crate::util::truncate_to_width;

/// Selected entity: id for requests, label for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub id: String,
    pub label: String,
}

impl Selection {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub customer: Option<Selection>,
    pub facility: Option<Selection>,
    pub policy: Option<Selection>,
    pub committee: Option<Selection>,
}

impl PageContext {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Compact status bar summary, e.g. `customer:alice@x.io committee:risk`
    pub fn summary(&self) -> Option<String> {
        let parts: Vec<String> = [
            ("customer", &self.customer),
            ("facility", &self.facility),
            ("policy", &self.policy),
            ("committee", &self.committee),
        ]
        .into_iter()
        .filter_map(|(name, selection)| {
            selection
                .as_ref()
                .map(|s| format!("{}:{}", name, truncate_to_width(&s.label, 24)))
        })
        .collect();

        (!parts.is_empty()).then(|| parts.join(" "))
    }
}
