/// Interpret a string value such as "1" or "no" as a boolean.
///
/// Returns `None` if the value is not recognized.
pub fn str_as_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

/// Return whether a feature flag controlled by an environment variable is
/// enabled.
///
/// `lookup` returns the variable's value, if set. Unrecognized values are
/// reported and the default is used.
pub fn env_flag(lookup: impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool {
    let Some(val) = lookup(name) else {
        return default;
    };
    str_as_bool(&val).unwrap_or_else(|| {
        eprintln!("Unrecognized boolean value \"{}\" for {}", val, name);
        default
    })
}

/// Look up an environment variable in the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
