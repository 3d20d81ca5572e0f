//! Progress reporting for long-running analysis.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TEMPLATE: &str = "{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} (ETA: {eta})";

/// A styled bar of `len` steps; drawn nowhere unless `visible`.
#[must_use]
pub fn create_progress_bar(len: u64, msg: &str, visible: bool) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if visible {
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
    } else {
        bar.set_draw_target(ProgressDrawTarget::hidden());
    }
    bar.set_message(msg.to_string());
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_bar_still_counts() {
        let bar = create_progress_bar(3, "Analysing", false);
        bar.inc(2);
        assert!(bar.is_hidden());
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.length(), Some(3));
    }
}
