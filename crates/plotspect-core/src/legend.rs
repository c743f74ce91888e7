//! Legend-driven series emphasis.
//!
//! Maps legend entries to plotted series and toggles emphasis styles:
//! picking an entry renders its series active and every sibling passive;
//! a reset restores the normal view. The presets carry
//! alpha/line-width/z-order only, and all styling goes through the
//! host.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, OverlayResult};
use crate::host::{PlotHost, PrimitiveId, StyleProps};

/// Emphasis preset applied to a series and its legend entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmphasisStyle {
    /// Alpha of the plotted series line.
    pub series_alpha: f64,
    /// Alpha of the legend swatch line.
    pub swatch_alpha: f64,
    /// Alpha of the legend label text.
    pub label_alpha: f64,
    /// Stroke width of the plotted series line.
    pub line_width: f64,
    /// Draw order of the plotted series line, if overridden.
    pub z_order: Option<f64>,
}

/// Default presets for the three emphasis levels.
pub fn normal_style() -> EmphasisStyle {
    EmphasisStyle {
        series_alpha: 0.8,
        swatch_alpha: 1.0,
        label_alpha: 1.0,
        line_width: 1.5,
        z_order: None,
    }
}

pub fn active_style() -> EmphasisStyle {
    EmphasisStyle {
        series_alpha: 1.0,
        swatch_alpha: 1.0,
        label_alpha: 1.0,
        line_width: 1.7,
        z_order: Some(2.5),
    }
}

pub fn passive_style() -> EmphasisStyle {
    EmphasisStyle {
        series_alpha: 0.2,
        swatch_alpha: 0.5,
        label_alpha: 0.6,
        line_width: 1.7,
        z_order: Some(2.0),
    }
}

/// One legend row: the plotted series plus its swatch and label
/// primitives in the legend box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub series: PrimitiveId,
    pub swatch: PrimitiveId,
    pub text: PrimitiveId,
}

type PickListener = Box<dyn FnMut(&str)>;

/// Emphasis state machine over a set of legend entries.
pub struct LegendHighlighter {
    entries: Vec<LegendEntry>,
    index: HashMap<String, usize>,
    normal: EmphasisStyle,
    active: EmphasisStyle,
    passive: EmphasisStyle,
    on_pick: Option<PickListener>,
}

impl LegendHighlighter {
    /// Build a highlighter over the legend entries. Duplicate labels
    /// are a configuration error.
    pub fn new(entries: Vec<LegendEntry>) -> OverlayResult<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.label.clone(), i).is_some() {
                return Err(OverlayError::Configuration(format!(
                    "duplicate legend label {:?}",
                    entry.label
                )));
            }
        }
        Ok(Self {
            entries,
            index,
            normal: normal_style(),
            active: active_style(),
            passive: passive_style(),
            on_pick: None,
        })
    }

    /// Override the emphasis presets.
    pub fn with_styles(
        mut self,
        normal: EmphasisStyle,
        active: EmphasisStyle,
        passive: EmphasisStyle,
    ) -> Self {
        self.normal = normal;
        self.active = active;
        self.passive = passive;
        self
    }

    /// Labels in entry order.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Register the single-slot pick listener; a new registration
    /// replaces the previous one.
    pub fn on_pick(&mut self, listener: impl FnMut(&str) + 'static) {
        self.on_pick = Some(Box::new(listener));
    }

    /// Drop the pick listener.
    pub fn clear_listener(&mut self) {
        self.on_pick = None;
    }

    /// Emphasize the picked series and de-emphasize its siblings.
    /// Unknown labels are a silent no-op; returns whether a pick
    /// happened.
    pub fn highlight(&mut self, label: &str, host: &mut dyn PlotHost) -> bool {
        let Some(&picked) = self.index.get(label) else {
            return false;
        };
        for (i, entry) in self.entries.iter().enumerate() {
            let style = if i == picked {
                self.active
            } else {
                self.passive
            };
            apply(entry, style, host);
        }
        let name = self.entries[picked].label.clone();
        if let Some(listener) = self.on_pick.as_mut() {
            listener(&name);
        }
        true
    }

    /// Restore the normal emphasis on every entry.
    pub fn reset(&mut self, host: &mut dyn PlotHost) {
        for entry in &self.entries {
            apply(entry, self.normal, host);
        }
    }
}

fn apply(entry: &LegendEntry, style: EmphasisStyle, host: &mut dyn PlotHost) {
    host.set_primitive_style(
        entry.series,
        StyleProps {
            alpha: style.series_alpha,
            line_width: Some(style.line_width),
            z_order: style.z_order,
        },
    );
    host.set_primitive_style(entry.swatch, StyleProps::alpha(style.swatch_alpha));
    host.set_primitive_style(entry.text, StyleProps::alpha(style.label_alpha));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Axis;
    use kurbo::Point;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default)]
    struct MockHost {
        styles: HashMap<PrimitiveId, StyleProps>,
    }

    impl PlotHost for MockHost {
        fn move_primitive(&mut self, _id: PrimitiveId, _position: Point) {}
        fn set_primitive_visible(&mut self, _id: PrimitiveId, _visible: bool) {}
        fn set_primitive_text(&mut self, _id: PrimitiveId, _text: &str) {}
        fn set_primitive_style(&mut self, id: PrimitiveId, style: StyleProps) {
            self.styles.insert(id, style);
        }
        fn view_bounds(&self, _axis: Axis) -> (f64, f64) {
            (0.0, 1.0)
        }
        fn request_redraw(&mut self) {}
    }

    fn entry(label: &str) -> LegendEntry {
        LegendEntry {
            label: label.to_string(),
            series: PrimitiveId::new(),
            swatch: PrimitiveId::new(),
            text: PrimitiveId::new(),
        }
    }

    #[test]
    fn test_highlight_styles_pick_and_siblings() {
        let entries = vec![entry("s1"), entry("s2")];
        let (picked, other) = (entries[0].series, entries[1].series);
        let mut legend = LegendHighlighter::new(entries).expect("unique labels");
        let mut host = MockHost::default();

        assert!(legend.highlight("s1", &mut host));

        assert!((host.styles[&picked].alpha - 1.0).abs() < f64::EPSILON);
        assert_eq!(host.styles[&picked].z_order, Some(2.5));
        assert!((host.styles[&other].alpha - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset_restores_normal() {
        let entries = vec![entry("s1"), entry("s2")];
        let series = entries[0].series;
        let mut legend = LegendHighlighter::new(entries).expect("unique labels");
        let mut host = MockHost::default();

        legend.highlight("s2", &mut host);
        legend.reset(&mut host);

        assert!((host.styles[&series].alpha - 0.8).abs() < f64::EPSILON);
        assert_eq!(host.styles[&series].line_width, Some(1.5));
        assert_eq!(host.styles[&series].z_order, None);
    }

    #[test]
    fn test_unknown_label_is_silent() {
        let mut legend = LegendHighlighter::new(vec![entry("s1")]).expect("unique labels");
        let mut host = MockHost::default();
        assert!(!legend.highlight("missing", &mut host));
        assert!(host.styles.is_empty());
    }

    #[test]
    fn test_pick_listener() {
        let mut legend =
            LegendHighlighter::new(vec![entry("s1"), entry("s2")]).expect("unique labels");
        let mut host = MockHost::default();
        let picked: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&picked);
        legend.on_pick(move |label| sink.borrow_mut().push(label.to_string()));

        legend.highlight("s2", &mut host);
        legend.highlight("missing", &mut host);

        assert_eq!(*picked.borrow(), vec!["s2".to_string()]);
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        assert!(LegendHighlighter::new(vec![entry("s1"), entry("s1")]).is_err());
    }
}
