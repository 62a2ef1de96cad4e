#![forbid(unsafe_code)]

//! Console stand-ins for toolkit controls.
//!
//! Each control behaves like a real widget: setting its value from code
//! fires the same change notification a user edit would, unless the control
//! is suppressed. Their ports carry [`Value`]s so they bind directly to
//! [`RxMap`](reaqt::state::RxMap) fields.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::RangeInclusive;
use std::rc::Rc;

use reaqt::core::ops;
use reaqt::prelude::*;
use reaqt::runtime::SuppressFlag;

// ============================================================================
// Slider
// ============================================================================

struct SliderCore {
    name: &'static str,
    range: RangeInclusive<i64>,
    position: Cell<i64>,
    moved: Signal<i64>,
}

impl SliderCore {
    fn clamp(&self, position: i64) -> i64 {
        position.clamp(*self.range.start(), *self.range.end())
    }

    fn set_position(&self, position: i64) {
        let position = self.clamp(position);
        tracing::trace!(slider = self.name, position, "slider set");
        self.position.set(position);
        self.moved.emit(&position);
    }
}

impl Suppressible for SliderCore {
    fn set_suppressed(&self, suppressed: bool) -> bool {
        self.moved.set_suppressed(suppressed)
    }
}

/// A horizontal slider over an integer range.
///
/// A slider may use several positions per unit (`ticks_per_unit`): a BMI
/// slider with two ticks per unit moves in steps of 0.5.
pub struct ConsoleSlider {
    core: Rc<SliderCore>,
    ticks_per_unit: i64,
    /// Bound value, in units.
    pub value: Port<Value>,
}

impl fmt::Debug for ConsoleSlider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSlider")
            .field("name", &self.core.name)
            .field("range", &self.core.range)
            .field("position", &self.core.position.get())
            .finish()
    }
}

impl ConsoleSlider {
    /// A slider with one position per unit.
    #[must_use]
    pub fn new(name: &'static str, range: RangeInclusive<i64>) -> Self {
        Self::with_ticks(name, range, 1)
    }

    /// A slider whose `range` is given in units and subdivided into
    /// `ticks_per_unit` positions each.
    #[must_use]
    pub fn with_ticks(name: &'static str, range: RangeInclusive<i64>, ticks_per_unit: i64) -> Self {
        let ticks_per_unit = ticks_per_unit.max(1);
        let positions = range.start() * ticks_per_unit..=range.end() * ticks_per_unit;
        let core = Rc::new(SliderCore {
            name,
            position: Cell::new(*positions.start()),
            range: positions,
            moved: Signal::new(),
        });

        let controller = Controller::new(Rc::clone(&core), |slider: &SliderCore, ticks: &Option<i64>| {
            if let Some(ticks) = ticks {
                slider.set_position(*ticks);
            }
        })
        .map_input(move |value: &Value| {
            value
                .as_f64()
                .map(|units| (units * ticks_per_unit as f64).round() as i64)
        });
        let reported = ops::map(&core.moved, move |ticks: &i64| {
            if ticks_per_unit == 1 {
                Value::Int(*ticks)
            } else {
                Value::Float(*ticks as f64 / ticks_per_unit as f64)
            }
        });

        Self {
            core,
            ticks_per_unit,
            value: Port::new(controller, reported),
        }
    }

    /// Simulate the user dragging the handle to `units`.
    pub fn drag_to(&self, units: f64) {
        let ticks = (units * self.ticks_per_unit as f64).round() as i64;
        tracing::debug!(slider = self.core.name, units, "slider dragged");
        self.core.set_position(ticks);
    }

    /// Current position in units.
    #[must_use]
    pub fn units(&self) -> f64 {
        self.core.position.get() as f64 / self.ticks_per_unit as f64
    }

    /// One text line: name, bar, position.
    #[must_use]
    pub fn render(&self) -> String {
        const WIDTH: i64 = 24;
        let (start, end) = (*self.core.range.start(), *self.core.range.end());
        let span = (end - start).max(1);
        let filled = ((self.core.position.get() - start) * WIDTH / span) as usize;
        format!(
            "{:<8}[{}{}] {}",
            self.core.name,
            "#".repeat(filled),
            "-".repeat(WIDTH as usize - filled),
            self.units()
        )
    }
}

// ============================================================================
// Label
// ============================================================================

struct LabelCore {
    text: RefCell<String>,
    flag: SuppressFlag,
}

impl Suppressible for LabelCore {
    fn set_suppressed(&self, suppressed: bool) -> bool {
        self.flag.set_suppressed(suppressed)
    }
}

/// Read-only text, formatted from the bound value.
pub struct ConsoleLabel {
    core: Rc<LabelCore>,
    pub text: Port<Value>,
}

impl fmt::Debug for ConsoleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleLabel")
            .field("text", &self.core.text.borrow())
            .finish()
    }
}

impl ConsoleLabel {
    pub fn new(format: impl Fn(&Value) -> String + 'static) -> Self {
        let core = Rc::new(LabelCore {
            text: RefCell::new(String::new()),
            flag: SuppressFlag::new(),
        });
        let controller = Controller::new(Rc::clone(&core), |label: &LabelCore, text: &String| {
            label.text.borrow_mut().clone_from(text);
        })
        .map_input(move |value: &Value| format(value));
        Self {
            core,
            text: Port::controller_only(controller),
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.core.text.borrow().clone()
    }
}

// ============================================================================
// Button
// ============================================================================

/// A push button. Only reports clicks.
#[derive(Debug, Default)]
pub struct ConsoleButton {
    label: String,
    clicked: Signal<()>,
}

impl ConsoleButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            clicked: Signal::new(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Stream of clicks.
    #[must_use]
    pub fn clicked(&self) -> &Signal<()> {
        &self.clicked
    }

    /// Simulate a click.
    pub fn click(&self) {
        tracing::debug!(button = %self.label, "button clicked");
        self.clicked.emit(&());
    }
}
