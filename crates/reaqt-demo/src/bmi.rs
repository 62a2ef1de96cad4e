#![forbid(unsafe_code)]

//! The BMI form.
//!
//! Three sliders (height, weight, BMI) and three labels bound to one
//! [`RxMap`]. Height is a plain two-way field. Weight and BMI depend on
//! each other, so their user edits are combined before reaching state:
//!
//! ```text
//! weight <- merge(with_latest_from(bmi input, height, weight_from_bmi), weight input)
//! bmi    <- merge(combine_latest(height, weight, calc_bmi), bmi input)
//! ```
//!
//! Every value a slider receives from state is applied under suppression,
//! so dragging one slider settles after a single pass.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use reaqt::prelude::*;
use reaqt::state::StateResult;

use crate::controls::{ConsoleButton, ConsoleLabel, ConsoleSlider};

/// Body-mass index for a height in cm and a weight in kg.
///
/// `None` for non-positive heights.
#[must_use]
pub fn calc_bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    (height_cm > 0.0).then(|| {
        let metres = height_cm / 100.0;
        weight_kg / (metres * metres)
    })
}

/// Weight in kg giving `bmi` at a height in cm.
#[must_use]
pub fn weight_from_bmi(bmi: f64, height_cm: f64) -> f64 {
    let metres = height_cm / 100.0;
    bmi * metres * metres
}

/// Label formatter: `"{prefix}: {value} {units}"` with `precision` decimals.
///
/// Non-numeric values show as `?`.
pub fn with_units(
    prefix: &'static str,
    units: &'static str,
    precision: usize,
) -> impl Fn(&Value) -> String + 'static {
    move |value: &Value| match value.as_f64() {
        Some(x) => format!("{prefix}: {:.*} {units}", precision, x),
        None => format!("{prefix}: ? {units}"),
    }
}

fn numeric(f: impl Fn(f64, f64) -> Option<f64> + 'static) -> impl Fn(&Value, &Value) -> Value {
    move |a: &Value, b: &Value| match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => f(a, b).map_or(Value::Nothing, Value::Float),
        _ => Value::Nothing,
    }
}

/// Form state, controls and the bindings between them.
pub struct BmiForm {
    pub state: RxMap,
    pub height: ConsoleSlider,
    pub weight: ConsoleSlider,
    pub bmi: ConsoleSlider,
    pub height_label: ConsoleLabel,
    pub weight_label: ConsoleLabel,
    pub bmi_label: ConsoleLabel,
    pub debug_button: ConsoleButton,
    debug_snapshot: Rc<RefCell<Option<Value>>>,
    bindings: Vec<Binding>,
    derived: Vec<Derived<Value>>,
}

impl fmt::Debug for BmiForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BmiForm")
            .field("state", &self.state)
            .field("bindings", &self.bindings.len())
            .field("derived", &self.derived.len())
            .finish()
    }
}

impl BmiForm {
    /// Build the controls and wire them to a fresh state with every field
    /// empty.
    pub fn new() -> StateResult<Self> {
        let state = RxMap::new([
            ("height", Value::Nothing),
            ("weight", Value::Nothing),
            ("bmi", Value::Nothing),
        ])?;
        let height_state = state.stream("height")?;
        let weight_state = state.stream("weight")?;
        let bmi_state = state.stream("bmi")?;

        let height = ConsoleSlider::new("height", 50..=230);
        let weight = ConsoleSlider::new("weight", 0..=250);
        let bmi = ConsoleSlider::with_ticks("bmi", 0..=80, 2);
        let height_label = ConsoleLabel::new(with_units("Height", "cm", 0));
        let weight_label = ConsoleLabel::new(with_units("Weight", "kg", 0));
        let bmi_label = ConsoleLabel::new(with_units("BMI", "kg/m2", 1));

        let mut bindings = vec![bind_two_way(&height_state, &height.value, None, None)];

        let weight_edits = bind_with_input(&weight_state, &weight.value, None, None);
        let bmi_edits = bind_with_input(&bmi_state, &bmi.value, None, None);

        let weight_for_bmi = with_latest_from(
            &bmi_edits.input,
            &height_state,
            numeric(|bmi, height| Some(weight_from_bmi(bmi, height))),
        );
        let weight_source = merge(&weight_for_bmi, &weight_edits.input);
        bindings.push(bind_one_way(&weight_source, &weight_state, None));

        let computed_bmi = combine_latest(&height_state, &weight_state, numeric(calc_bmi));
        let bmi_source = merge(&computed_bmi, &bmi_edits.input);
        bindings.push(bind_one_way(&bmi_source, &bmi_state, None));
        let derived = vec![weight_for_bmi, weight_source, computed_bmi, bmi_source];

        bindings.push(weight_edits.binding);
        bindings.push(bmi_edits.binding);
        bindings.push(bind_one_way(&height_state, &height_label.text, None));
        bindings.push(bind_one_way(&weight_state, &weight_label.text, None));
        bindings.push(bind_one_way(&bmi_state, &bmi_label.text, None));

        let debug_button = ConsoleButton::new("Debug");
        let debug_snapshot = Rc::new(RefCell::new(None));
        let (snapshot, watched) = (Rc::clone(&debug_snapshot), state.clone());
        let _debug = debug_button.clicked().subscribe(move |_: &()| {
            watched.debug();
            *snapshot.borrow_mut() = Some(watched.freeze_value());
        });

        tracing::debug!(bindings = bindings.len(), "bmi form wired");
        Ok(Self {
            state,
            height,
            weight,
            bmi,
            height_label,
            weight_label,
            bmi_label,
            debug_button,
            debug_snapshot,
            bindings,
            derived,
        })
    }

    /// Set height and weight the way application code would.
    pub fn set_measurements(&self, height_cm: i64, weight_kg: i64) -> StateResult<()> {
        self.state.set("height", height_cm)?;
        self.state.set("weight", weight_kg)
    }

    /// Snapshot taken by the last click of the debug button.
    #[must_use]
    pub fn debug_snapshot(&self) -> Option<Value> {
        self.debug_snapshot.borrow().clone()
    }

    /// Detach every control from state. Controls keep their last values.
    pub fn unbind(&self) {
        for binding in &self.bindings {
            binding.dispose();
        }
        for stream in &self.derived {
            stream.dispose();
        }
        tracing::debug!("bmi form unbound");
    }

    /// The form as text: one line per slider followed by the labels.
    #[must_use]
    pub fn render(&self) -> String {
        [
            self.height.render(),
            self.weight.render(),
            self.bmi.render(),
            self.height_label.text(),
            self.weight_label.text(),
            self.bmi_label.text(),
        ]
        .join("\n")
    }
}
