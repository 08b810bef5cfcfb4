//! SVG polyline points for the dashboard trend charts.

/// Render a chronological series as `x,y` pairs for an SVG `polyline`.
///
/// The x step is fixed by `capacity` so a partially filled history grows
/// from the left instead of stretching. Values are clamped to
/// `[0, max_value]`. A single value is drawn as a flat line across the full
/// width; an empty series yields an empty string.
pub fn chart_points(
    values: &[f64],
    width: f64,
    height: f64,
    max_value: f64,
    capacity: usize,
) -> String {
    let y_for = |value: f64| {
        let clamped = value.clamp(0.0, max_value.max(0.0));
        if max_value > 0.0 {
            height - (clamped / max_value) * height
        } else {
            height
        }
    };

    match values {
        [] => String::new(),
        [only] => {
            let y = y_for(*only);
            format!("0.00,{y:.2} {width:.2},{y:.2}")
        }
        _ => {
            let step = width / (capacity.max(2) - 1) as f64;
            values
                .iter()
                .enumerate()
                .map(|(i, v)| format!("{:.2},{:.2}", i as f64 * step, y_for(*v)))
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
