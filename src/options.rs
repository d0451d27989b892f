use crate::diagnostics::DiagnosticLevel;
use crate::env::{env_flag, process_env};

/// Environment variable which enables or disables verification.
pub const VERIFY_ENV_VAR: &str = "SHAPE_INFER_VERIFY";

/// Environment variable which sets the diagnostic level.
pub const DIAGNOSTICS_ENV_VAR: &str = "SHAPE_INFER_DIAGNOSTICS";

/// Options which control how the inference driver runs.
///
/// ```
/// use shape_infer::{DiagnosticLevel, InferOptions};
///
/// let mut opts = InferOptions::default();
/// opts.enable_verify(false).diagnostics(DiagnosticLevel::Warn);
/// assert!(!opts.verify);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct InferOptions {
    /// Whether operators are verified before their output types are
    /// computed.
    pub verify: bool,

    /// Which diagnostic messages are reported.
    pub diagnostics: DiagnosticLevel,
}

impl Default for InferOptions {
    fn default() -> Self {
        InferOptions {
            verify: true,
            diagnostics: DiagnosticLevel::Off,
        }
    }
}

impl InferOptions {
    /// Create options from the defaults, overridden by the
    /// `SHAPE_INFER_VERIFY` and `SHAPE_INFER_DIAGNOSTICS` environment
    /// variables.
    pub fn from_env() -> InferOptions {
        Self::from_lookup(process_env)
    }

    /// Create options from the defaults, overridden by variables returned by
    /// `lookup`.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String> + Copy) -> InferOptions {
        let defaults = InferOptions::default();
        let mut opts = InferOptions {
            verify: env_flag(lookup, VERIFY_ENV_VAR, defaults.verify),
            ..defaults
        };

        if let Some(val) = lookup(DIAGNOSTICS_ENV_VAR) {
            match DiagnosticLevel::parse(&val) {
                Some(level) => opts.diagnostics = level,
                None => eprintln!(
                    "Unrecognized diagnostic level \"{}\" for {}",
                    val, DIAGNOSTICS_ENV_VAR
                ),
            }
        }

        opts
    }

    /// Set whether operators are verified before their output types are
    /// computed.
    ///
    /// If disabled, invalid attributes may still be reported by the shape
    /// rule when it computes the output types.
    pub fn enable_verify(&mut self, enable: bool) -> &mut Self {
        self.verify = enable;
        self
    }

    /// Set which diagnostic messages are reported.
    pub fn diagnostics(&mut self, level: DiagnosticLevel) -> &mut Self {
        self.diagnostics = level;
        self
    }
}
