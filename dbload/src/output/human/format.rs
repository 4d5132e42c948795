use std::time::Duration;

/// Renders seconds as a single rounded component in one of: us, ms, s.
pub(crate) fn format_secs(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "n/a".to_string();
    }

    if secs >= 1.0 {
        return format!("{secs:.3}s");
    }
    if secs >= 0.001 {
        return format!("{:.2}ms", secs * 1_000.0);
    }
    format!("{:.0}us", secs * 1_000_000.0)
}

/// Wall-clock spans, truncated to milliseconds (`1s 234ms`).
pub(crate) fn format_span(d: Duration) -> String {
    let ms = Duration::from_millis(d.as_millis().min(u128::from(u64::MAX)) as u64);
    if ms.is_zero() {
        return "0s".to_string();
    }
    humantime::format_duration(ms).to_string()
}

pub(crate) fn format_bound<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map_or_else(|| "unbounded".to_string(), |v| v.to_string())
}
