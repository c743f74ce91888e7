//! Headless walkthrough of the interaction layer.
//!
//! Stands up a mock plotting host, wires the overlay the way a signal
//! viewer would (cursor pairs, analysis checkbox panels, legend
//! emphasis), then replays a scripted pointer/keyboard session and logs
//! what the overlay does with it.

use std::collections::HashMap;

use kurbo::{Point, Rect, Size};
use log::info;

use plotspect_core::{
    Axis, BoxRole, CheckboxGroup, CheckboxItem, Cursor, CursorPair, Frame, InspectOverlay,
    KeyEvent, LabelSide, LegendEntry, LegendHighlighter, MouseButton, OverlayAction, PlotHost,
    PointerEvent, PrimitiveId, SpaceKind, StyleProps, ToggleWidget,
};

/// In-memory stand-in for a real plotting surface.
#[derive(Default)]
struct MockPlot {
    positions: HashMap<PrimitiveId, Point>,
    visible: HashMap<PrimitiveId, bool>,
    texts: HashMap<PrimitiveId, String>,
    styles: HashMap<PrimitiveId, StyleProps>,
    x_bounds: (f64, f64),
    y_bounds: (f64, f64),
    redraws: usize,
}

impl PlotHost for MockPlot {
    fn move_primitive(&mut self, id: PrimitiveId, position: Point) {
        self.positions.insert(id, position);
    }
    fn set_primitive_visible(&mut self, id: PrimitiveId, visible: bool) {
        self.visible.insert(id, visible);
    }
    fn set_primitive_text(&mut self, id: PrimitiveId, text: &str) {
        self.texts.insert(id, text.to_string());
    }
    fn set_primitive_style(&mut self, id: PrimitiveId, style: StyleProps) {
        self.styles.insert(id, style);
    }
    fn view_bounds(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => self.x_bounds,
            Axis::Y => self.y_bounds,
        }
    }
    fn request_redraw(&mut self) {
        self.redraws += 1;
    }
}

/// Host checkbox rows: nothing but visual flags, as in a real toolkit.
struct Toggles(Vec<bool>);

impl Toggles {
    fn for_group(group: &CheckboxGroup) -> Self {
        Self(group.widget_spec().iter().map(|&(_, active)| active).collect())
    }
}

impl ToggleWidget for Toggles {
    fn status(&self) -> Vec<bool> {
        self.0.clone()
    }
    fn set_active(&mut self, index: usize) {
        self.0[index] = !self.0[index];
    }
}

fn axis_pair(axis: Axis, primary: f64, secondary: f64) -> (CursorPair, PrimitiveId) {
    let readout = PrimitiveId::new();
    let near = Cursor::new(
        axis,
        primary,
        PrimitiveId::new(),
        PrimitiveId::new(),
        LabelSide::Near,
    );
    let far = Cursor::new(
        axis,
        secondary,
        PrimitiveId::new(),
        PrimitiveId::new(),
        LabelSide::Far,
    );
    let pair = CursorPair::new(near, far, readout).expect("cursors share an axis");
    (pair, readout)
}

fn main() {
    env_logger::init();

    // A 1000x750 px figure, panel inset, viewing x in [0, 10] s and
    // y in [-2, 2] V.
    let frame = Frame::new(
        Rect::new(0.0, 0.0, 1000.0, 750.0),
        Rect::new(100.0, 50.0, 900.0, 650.0),
        (0.0, 10.0),
        (-2.0, 2.0),
    )
    .expect("valid frame");
    let mut host = MockPlot {
        x_bounds: (0.0, 10.0),
        y_bounds: (-2.0, 2.0),
        ..Default::default()
    };
    let mut overlay = InspectOverlay::new(frame);

    // Cursor pairs with live readouts.
    let (mut x_pair, x_readout) = axis_pair(Axis::X, 4.5, 5.5);
    x_pair.on_readout(|readout| info!("x readout: \u{2206}x = {:.4}", readout.delta));
    let x_index = overlay.add_pair(x_pair);
    overlay
        .add_box(
            x_readout,
            SpaceKind::PanelNormalized,
            Point::new(0.02, 0.88),
            Size::new(0.28, 0.10),
            BoxRole::Readout(x_index),
        )
        .expect("x pair registered");

    let (y_pair, y_readout) = axis_pair(Axis::Y, -0.4, 0.4);
    let y_index = overlay.add_pair(y_pair);
    overlay
        .add_box(
            y_readout,
            SpaceKind::PanelNormalized,
            Point::new(0.70, 0.88),
            Size::new(0.28, 0.10),
            BoxRole::Readout(y_index),
        )
        .expect("y pair registered");

    // Analysis panel: statistics are mutually exclusive, the histogram
    // variant for raw samples is not built in this configuration.
    let mut analysis = CheckboxGroup::new(vec![
        CheckboxItem::new("rms", "rms").with_xor_tag(1),
        CheckboxItem::new("std", "std").with_xor_tag(1),
        CheckboxItem::new("mean", "mean").with_xor_tag(1),
        CheckboxItem::new("integr", "integr"),
        CheckboxItem::new("lin-fit", "lin-fit"),
        CheckboxItem::new("pik-pik", "pik-pik").with_xor_tag(2),
        CheckboxItem::new("tik-tik", "tik-tik").with_xor_tag(2),
        CheckboxItem::new("fft-db", "fft-dB"),
        CheckboxItem::new("hist-n", "histN"),
        CheckboxItem::new("hist-r", "histR").absent(),
    ])
    .expect("valid analysis panel");
    let mut analysis_widget = Toggles::for_group(&analysis);
    analysis.on_change(|name, value| info!("analysis {name} -> {value}"));

    // Secondary panel, disabled until a measurement is armed.
    let mut transforms = CheckboxGroup::new(vec![
        CheckboxItem::new("y2x", "y2x").with_xor_tag(1),
        CheckboxItem::new("x2y", "x2y").with_xor_tag(1),
    ])
    .expect("valid transform panel")
    .with_enabled(false);
    let mut transforms_widget = Toggles::for_group(&transforms);

    // Legend over four plotted series; picking one drives emphasis and
    // snaps the y cursor pair to the picked series' amplitude extents.
    let extents: HashMap<&str, (f64, f64)> = HashMap::from([
        ("sin 3 Hz", (-1.0, 1.0)),
        ("sin 5 Hz", (-0.6, 0.6)),
        ("noise", (-0.15, 0.15)),
        ("sum", (-1.7, 1.7)),
    ]);
    let series: Vec<LegendEntry> = extents
        .keys()
        .map(|label| LegendEntry {
            label: label.to_string(),
            series: PrimitiveId::new(),
            swatch: PrimitiveId::new(),
            text: PrimitiveId::new(),
        })
        .collect();
    let mut legend = LegendHighlighter::new(series).expect("unique labels");
    legend.on_pick(|label| info!("legend picked {label}"));

    // --- scripted session ------------------------------------------------

    // Grab the primary x cursor (data x = 4.5 is device x = 460) and
    // drag it one second to the right.
    info!("drag primary x cursor from 4.5 s to 5.5 s");
    overlay.handle_pointer_event(
        &PointerEvent::Down {
            position: Point::new(460.0, 300.0),
            button: MouseButton::Left,
        },
        &mut host,
    );
    for step in 1..=4 {
        overlay.handle_pointer_event(
            &PointerEvent::Move {
                position: Point::new(460.0 + 20.0 * f64::from(step), 300.0),
            },
            &mut host,
        );
    }
    overlay.handle_pointer_event(
        &PointerEvent::Up {
            position: Point::new(540.0, 300.0),
            button: MouseButton::Left,
        },
        &mut host,
    );
    if let Some(text) = host.texts.get(&x_readout) {
        info!("x readout box:\n{text}");
    }

    // Toggle the statistics: mean replaces rms within the xor tag.
    analysis.set("rms", true, &mut analysis_widget);
    analysis.set("mean", true, &mut analysis_widget);
    info!("active analyses: {:?}", analysis.all_active());

    // Arming a transform enables the secondary panel.
    transforms.set_enabled(true, &mut transforms_widget);
    transforms.set_visible(true, &mut transforms_widget);
    transforms.set("y2x", true, &mut transforms_widget);
    info!("active transforms: {:?}", transforms.all_active());

    // Right-click on empty canvas hands panel toggling back to us.
    let action = overlay.handle_pointer_event(
        &PointerEvent::Down {
            position: Point::new(950.0, 700.0),
            button: MouseButton::Right,
        },
        &mut host,
    );
    if action == OverlayAction::TogglePanels {
        let visible = !analysis.visible();
        analysis.set_visible(visible, &mut analysis_widget);
        info!("analysis panel visible: {visible}");
    }

    // Legend pick: emphasize the series and measure its amplitude with
    // the y cursor pair, then back to normal emphasis.
    if legend.highlight("sin 5 Hz", &mut host) {
        let (low, high) = extents["sin 5 Hz"];
        if let Some(pair) = overlay.pair_mut(y_index) {
            pair.set_positions(low, high, &mut host);
        }
        info!(
            "y readout after legend pick:\n{}",
            host.texts.get(&y_readout).map(String::as_str).unwrap_or("")
        );
    }
    legend.reset(&mut host);

    // Key `a` hides every cursor pair at once.
    overlay.handle_key_event(&KeyEvent::Pressed("a".to_string()), &mut host);
    info!(
        "pairs visible after toggle: x = {}, y = {}",
        overlay.pair(x_index).map(|p| p.visible()).unwrap_or(false),
        overlay.pair(y_index).map(|p| p.visible()).unwrap_or(false),
    );
    info!("host redraws requested: {}", host.redraws);
}
