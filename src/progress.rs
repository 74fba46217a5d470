use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner that counts logical items (rows, nodes, …) while the total is
/// still unknown.
pub fn count_spinner(label: impl Into<String>, unit_label: &str) -> ProgressBar {
    let label = label.into();
    let pb = ProgressBar::new_spinner();
    let template = format!(
        "{{prefix:.bold.dim}} {{spinner:.green}} [{{elapsed_precise}}] {{pos}} {unit_label} read ({{per_sec}} {unit_label}/s) {{msg}}",
    );
    // Falls back to the default spinner style if the template is rejected.
    if let Ok(style) = ProgressStyle::with_template(&template) {
        pb.set_style(style);
    }
    pb.set_prefix(label);
    pb.enable_steady_tick(Duration::from_millis(75));
    pb
}
