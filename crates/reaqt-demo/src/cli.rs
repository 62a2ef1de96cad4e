#![forbid(unsafe_code)]

//! Command-line argument parsing for the BMI demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `REAQT_DEMO_*` prefix.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
reaqt BMI demo: a form whose sliders and labels are bound to reactive state

USAGE:
    reaqt-demo [OPTIONS]

OPTIONS:
    --height=N       Height in cm, set programmatically (default: 172)
    --weight=N       Weight in kg, set programmatically (default: 62)
    --bmi=F          Drag the BMI slider to F after the initial values
    --json           Print the frozen state as JSON instead of the form
    --log=FILTER     Log filter, e.g. 'debug' or 'reaqt_runtime=trace' (default: warn)
    --help, -h       Show this help message
    --version, -V    Show version

ENVIRONMENT:
    REAQT_DEMO_HEIGHT   Same as --height
    REAQT_DEMO_WEIGHT   Same as --weight
    REAQT_DEMO_BMI      Same as --bmi
    REAQT_DEMO_JSON     '1' or 'true' enables --json
    REAQT_DEMO_LOG      Same as --log (RUST_LOG wins when set)
    REAQT_ERROR_POLICY  'report' or 'forward': what streams do with pushed errors";

/// Parsed demo options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Initial height in cm.
    pub height: i64,
    /// Initial weight in kg.
    pub weight: i64,
    /// BMI to drag the slider to, if any.
    pub bmi: Option<f64>,
    /// Print JSON instead of the rendered form.
    pub json: bool,
    /// `tracing` filter directive.
    pub log: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseError {
    Help,
    Version,
    InvalidValue { flag: &'static str, value: String },
    UnknownArg(String),
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            height: 172,
            weight: 62,
            bmi: None,
            json: false,
            log: "warn".into(),
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("reaqt-demo {VERSION}");
                process::exit(0);
            }
            Err(ParseError::InvalidValue { flag, value }) => {
                eprintln!("Invalid {flag} value: {value}");
                process::exit(1);
            }
            Err(ParseError::UnknownArg(arg)) => {
                eprintln!("Unknown argument: {arg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = get_env("REAQT_DEMO_HEIGHT")
            && let Ok(n) = val.parse()
        {
            opts.height = n;
        }
        if let Some(val) = get_env("REAQT_DEMO_WEIGHT")
            && let Ok(n) = val.parse()
        {
            opts.weight = n;
        }
        if let Some(val) = get_env("REAQT_DEMO_BMI")
            && let Ok(x) = val.parse()
        {
            opts.bmi = Some(x);
        }
        if let Some(val) = get_env("REAQT_DEMO_JSON") {
            opts.json = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Some(val) = get_env("REAQT_DEMO_LOG")
            && !val.trim().is_empty()
        {
            opts.log = val;
        }

        // Parse command-line args (override env vars)
        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => {
                    return Err(ParseError::Help);
                }
                "--version" | "-V" => {
                    return Err(ParseError::Version);
                }
                "--json" => {
                    opts.json = true;
                }
                other => {
                    if let Some(val) = other.strip_prefix("--height=") {
                        opts.height = val.parse().map_err(|_| ParseError::InvalidValue {
                            flag: "--height",
                            value: val.to_string(),
                        })?;
                    } else if let Some(val) = other.strip_prefix("--weight=") {
                        opts.weight = val.parse().map_err(|_| ParseError::InvalidValue {
                            flag: "--weight",
                            value: val.to_string(),
                        })?;
                    } else if let Some(val) = other.strip_prefix("--bmi=") {
                        match val.parse::<f64>() {
                            Ok(x) if x.is_finite() => opts.bmi = Some(x),
                            _ => {
                                return Err(ParseError::InvalidValue {
                                    flag: "--bmi",
                                    value: val.to_string(),
                                });
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        if !val.trim().is_empty() {
                            opts.log = val.to_string();
                        }
                    } else {
                        return Err(ParseError::UnknownArg(other.to_string()));
                    }
                }
            }
        }

        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with_env<I, S>(
        args: I,
        env_pairs: &[(&'static str, &'static str)],
    ) -> Result<Opts, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = std::collections::HashMap::new();
        for (key, value) in env_pairs {
            map.insert(*key, *value);
        }
        Opts::parse_from_env_and_args(args, |key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.height, 172);
        assert_eq!(opts.weight, 62);
        assert!(opts.bmi.is_none());
        assert!(!opts.json);
        assert_eq!(opts.log, "warn");
    }

    #[test]
    fn version_string_nonempty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn help_text_contains_env_vars() {
        for var in [
            "REAQT_DEMO_HEIGHT",
            "REAQT_DEMO_WEIGHT",
            "REAQT_DEMO_BMI",
            "REAQT_DEMO_JSON",
            "REAQT_DEMO_LOG",
            "REAQT_ERROR_POLICY",
        ] {
            assert!(HELP_TEXT.contains(var), "help text missing {var}");
        }
    }

    #[test]
    fn env_overrides_apply() {
        let env = [
            ("REAQT_DEMO_HEIGHT", "180"),
            ("REAQT_DEMO_BMI", "22.5"),
            ("REAQT_DEMO_JSON", "true"),
            ("REAQT_DEMO_LOG", "debug"),
        ];
        let opts = parse_with_env(Vec::<String>::new(), &env).expect("parse");
        assert_eq!(opts.height, 180, "env={env:?}");
        assert_eq!(opts.weight, 62, "env={env:?}");
        assert_eq!(opts.bmi, Some(22.5), "env={env:?}");
        assert!(opts.json, "env={env:?}");
        assert_eq!(opts.log, "debug", "env={env:?}");
    }

    #[test]
    fn unparsable_env_is_ignored() {
        let opts = parse_with_env(Vec::<String>::new(), &[("REAQT_DEMO_WEIGHT", "heavy")])
            .expect("parse");
        assert_eq!(opts.weight, 62);
    }

    #[test]
    fn args_override_env() {
        let args = ["--height=165", "--log=reaqt_runtime=trace"];
        let env = [("REAQT_DEMO_HEIGHT", "190"), ("REAQT_DEMO_LOG", "info")];
        let opts = parse_with_env(args, &env).expect("parse args");
        assert_eq!(opts.height, 165, "args={args:?} env={env:?}");
        assert_eq!(opts.log, "reaqt_runtime=trace", "args={args:?} env={env:?}");
    }

    #[test]
    fn invalid_value_reports_flag() {
        let err = parse_with_env(["--weight=lots"], &[]);
        assert!(
            matches!(
                err,
                Err(ParseError::InvalidValue {
                    flag: "--weight",
                    ..
                })
            ),
            "expected InvalidValue for --weight, got {err:?}"
        );

        let err = parse_with_env(["--bmi=NaN"], &[]);
        assert!(
            matches!(err, Err(ParseError::InvalidValue { flag: "--bmi", .. })),
            "expected InvalidValue for --bmi, got {err:?}"
        );
    }

    #[test]
    fn unknown_arg_reports_error() {
        let err = parse_with_env(["--mystery-flag"], &[]);
        assert!(
            matches!(err, Err(ParseError::UnknownArg(ref arg)) if arg == "--mystery-flag"),
            "expected UnknownArg, got {err:?}"
        );
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse_with_env(["-h", "--json"], &[]), Err(ParseError::Help));
        assert_eq!(parse_with_env(["--version"], &[]), Err(ParseError::Version));
    }
}
