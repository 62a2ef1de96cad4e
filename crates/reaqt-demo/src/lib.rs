#![forbid(unsafe_code)]

//! BMI form demo.
//!
//! A small form in the style of a desktop toolkit, with console stand-ins for
//! the widgets. Height, weight and BMI sliders plus their labels are bound to
//! one [`RxMap`](reaqt::state::RxMap); moving any slider updates the others.
//!
//! # Example
//!
//! ```
//! use reaqt_demo::bmi::BmiForm;
//!
//! let form = BmiForm::new().unwrap();
//! form.set_measurements(172, 62).unwrap();
//! assert_eq!(form.bmi_label.text(), "BMI: 21.0 kg/m2");
//!
//! form.bmi.drag_to(25.0);
//! assert_eq!(form.weight_label.text(), "Weight: 74 kg");
//! ```

pub mod bmi;
pub mod cli;
pub mod controls;

use std::fmt;

use reaqt::prelude::Container;
use reaqt::state::StateError;

use crate::bmi::BmiForm;
use crate::cli::Opts;

/// Failure while running the demo.
#[derive(Debug)]
pub enum DemoError {
    State(StateError),
    Json(serde_json::Error),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State(e) => write!(f, "state error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::State(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<StateError> for DemoError {
    fn from(e: StateError) -> Self {
        Self::State(e)
    }
}

impl From<serde_json::Error> for DemoError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Build the form, play the scripted session and return what to print.
///
/// The session sets the measurements from `opts`, drags the BMI slider if
/// asked to, then clicks the debug button.
pub fn run(opts: &Opts) -> Result<String, DemoError> {
    let form = BmiForm::new()?;
    form.set_measurements(opts.height, opts.weight)?;
    if let Some(bmi) = opts.bmi {
        form.bmi.drag_to(bmi);
    }
    form.debug_button.click();

    let output = if opts.json {
        serde_json::to_string_pretty(&form.state.freeze())?
    } else {
        form.render()
    };
    form.unbind();
    Ok(output)
}
