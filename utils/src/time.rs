//! Time formatting helpers.

/// Format a block spacing in seconds, e.g. `"9m 42.5s"`.
///
/// Non-finite or negative inputs are printed verbatim.
pub fn format_spacing(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return format!("{secs}s");
    }
    let whole = secs.trunc() as u64;
    let frac = secs - whole as f64;
    if whole < 60 {
        format!("{secs:.1}s")
    } else if whole < 3600 {
        format!("{}m {:.1}s", whole / 60, (whole % 60) as f64 + frac)
    } else {
        format!("{}h {}m", whole / 3600, (whole % 3600) / 60)
    }
}
