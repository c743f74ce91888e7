//! Checkbox groups with exclusivity tags and visibility/state decoupling.
//!
//! The host's raw toggle widget cannot distinguish "hidden" from
//! "unchecked": its visual check state is all it has. The group
//! therefore keeps the authoritative `active` flags itself and drives
//! the visuals to match: hiding the panel turns every visual check off
//! without touching the stored state, and showing it drives them back.
//! Items sharing a nonzero `xor_tag` are mutually exclusive.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, OverlayResult};
use crate::host::ToggleWidget;

/// Description of one checkbox, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckboxItem {
    /// Unique key within the group.
    pub name: String,
    /// Display text.
    pub label: String,
    /// Absent items are excluded from the live widget entirely.
    pub present: bool,
    /// Authoritative logical state.
    pub active: bool,
    /// Exclusivity tag; `0` means no exclusivity.
    pub xor_tag: u32,
}

impl CheckboxItem {
    /// A present, inactive, untagged item.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            present: true,
            active: false,
            xor_tag: 0,
        }
    }

    /// Set the exclusivity tag.
    pub fn with_xor_tag(mut self, tag: u32) -> Self {
        self.xor_tag = tag;
        self
    }

    /// Set the initial logical state.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Exclude the item from the live widget.
    pub fn absent(mut self) -> Self {
        self.present = false;
        self
    }
}

type ChangeListener = Box<dyn FnMut(&str, bool)>;

/// Ordered collection of named toggles with exclusivity resolution.
pub struct CheckboxGroup {
    items: Vec<CheckboxItem>,
    index: HashMap<String, usize>,
    visible: bool,
    enabled: bool,
    on_change: Option<ChangeListener>,
}

impl CheckboxGroup {
    /// Build a group from an item list; absent items are dropped here
    /// and never materialize. Duplicate names among present items or an
    /// all-absent list are configuration errors.
    pub fn new(items: Vec<CheckboxItem>) -> OverlayResult<Self> {
        let items: Vec<CheckboxItem> = items.into_iter().filter(|item| item.present).collect();
        if items.is_empty() {
            return Err(OverlayError::Configuration(
                "checkbox group has no present items".to_string(),
            ));
        }
        let mut index = HashMap::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            if index.insert(item.name.clone(), i).is_some() {
                return Err(OverlayError::Configuration(format!(
                    "duplicate checkbox name {:?}",
                    item.name
                )));
            }
        }
        Ok(Self {
            items,
            index,
            visible: true,
            enabled: true,
            on_change: None,
        })
    }

    /// Start the group disabled (which also forces it hidden).
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        if !enabled {
            self.visible = false;
        }
        self
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// `(label, initial visual state)` pairs for constructing the
    /// host's toggle widget, in item order. A hidden group reports
    /// every box unchecked regardless of the stored state, so the
    /// widget starts out matching what `set_visible(true)` would later
    /// drive it from.
    pub fn widget_spec(&self) -> Vec<(&str, bool)> {
        self.items
            .iter()
            .map(|item| (item.label.as_str(), item.active && self.visible))
            .collect()
    }

    /// Register the single-slot change listener; a new registration
    /// replaces the previous one. Fires once per user-driven toggle or
    /// set while the group is visible, never during the bulk visual
    /// resynchronization done by `set_visible`.
    pub fn on_change(&mut self, listener: impl FnMut(&str, bool) + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    /// Drop the change listener.
    pub fn clear_listener(&mut self) {
        self.on_change = None;
    }

    /// Flip the named item. Disabled groups and unknown names are
    /// neutral no-ops.
    pub fn toggle(&mut self, name: &str, widget: &mut dyn ToggleWidget) {
        if !self.enabled {
            return;
        }
        let Some(&i) = self.index.get(name) else {
            return;
        };
        let value = !self.items[i].active;
        self.apply(i, value, widget);
        self.notify(i, value);
    }

    /// Assign the named item directly. Setting `true` on a tagged item
    /// clears every other item sharing that tag. Disabled groups and
    /// unknown names are neutral no-ops.
    pub fn set(&mut self, name: &str, value: bool, widget: &mut dyn ToggleWidget) {
        if !self.enabled {
            return;
        }
        let Some(&i) = self.index.get(name) else {
            return;
        };
        self.apply(i, value, widget);
        self.notify(i, value);
    }

    /// Adopt a user click made directly on the host widget: find the
    /// first visual box that disagrees with the stored state, take its
    /// new value as the user's intent, resolve exclusivity, and fire
    /// the listener. Hidden groups ignore visual changes (they are the
    /// group's own resynchronization, not clicks).
    pub fn sync_from_widget(&mut self, widget: &mut dyn ToggleWidget) {
        if !self.visible {
            return;
        }
        let status = widget.status();
        let Some(i) = (0..self.items.len())
            .find(|&i| status.get(i).copied().unwrap_or(false) != self.items[i].active)
        else {
            return;
        };
        let value = status[i];
        self.apply(i, value, widget);
        self.notify(i, value);
    }

    /// Drive the panel's visuals. Hiding clears every visual check
    /// without touching stored `active`; showing drives visuals back to
    /// the stored state. Fires no change notification either way.
    pub fn set_visible(&mut self, visible: bool, widget: &mut dyn ToggleWidget) {
        if !self.enabled {
            return;
        }
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if visible {
            for i in 0..self.items.len() {
                drive(widget, i, self.items[i].active);
            }
        } else {
            for i in 0..self.items.len() {
                drive(widget, i, false);
            }
        }
    }

    /// Disabling also hides the panel; re-enabling does not restore
    /// visibility.
    pub fn set_enabled(&mut self, enabled: bool, widget: &mut dyn ToggleWidget) {
        if !enabled {
            self.set_visible(false, widget);
        }
        self.enabled = enabled;
    }

    /// Deactivate every item, store and visuals. Bulk operation; fires
    /// no change notification.
    pub fn clear_all(&mut self, widget: &mut dyn ToggleWidget) {
        for i in 0..self.items.len() {
            self.items[i].active = false;
            if self.visible {
                drive(widget, i, false);
            }
        }
    }

    /// Stored state of the named item; `false` for unknown names.
    pub fn get_active(&self, name: &str) -> bool {
        self.index
            .get(name)
            .map(|&i| self.items[i].active)
            .unwrap_or(false)
    }

    /// Whether the named item materialized in the group.
    pub fn get_present(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Display label of the named item, if present.
    pub fn get_label(&self, name: &str) -> Option<&str> {
        self.index.get(name).map(|&i| self.items[i].label.as_str())
    }

    /// Stored state of every item, in item order.
    pub fn statuses(&self) -> Vec<bool> {
        self.items.iter().map(|item| item.active).collect()
    }

    /// Names of the active items, in item order.
    pub fn all_active(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.active)
            .map(|item| item.name.as_str())
            .collect()
    }

    /// Assign item `i`, resolving exclusivity: the set of same-tag
    /// items is computed first, then cleared in one pass in item order.
    fn apply(&mut self, i: usize, value: bool, widget: &mut dyn ToggleWidget) {
        let tag = self.items[i].xor_tag;
        if value && tag != 0 {
            let cleared: Vec<usize> = self
                .items
                .iter()
                .enumerate()
                .filter(|&(j, item)| j != i && item.xor_tag == tag && item.active)
                .map(|(j, _)| j)
                .collect();
            for j in cleared {
                self.items[j].active = false;
                if self.visible {
                    drive(widget, j, false);
                }
            }
        }
        if self.items[i].active != value {
            self.items[i].active = value;
            if self.visible {
                drive(widget, i, value);
            }
        }
    }

    fn notify(&mut self, i: usize, value: bool) {
        if !self.visible {
            return;
        }
        let name = self.items[i].name.clone();
        if let Some(listener) = self.on_change.as_mut() {
            listener(&name, value);
        }
    }
}

/// Drive one visual box to a desired state through the widget's flip
/// operation.
fn drive(widget: &mut dyn ToggleWidget, index: usize, desired: bool) {
    let current = widget.status().get(index).copied().unwrap_or(false);
    if current != desired {
        widget.set_active(index);
    }
}
