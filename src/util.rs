use std::io::{stderr, Stderr};

type ProgressBar = pbr::ProgressBar<Stderr>;

/// Progress over the views of a voting decomposition, drawn on stderr when enabled.
pub(crate) struct ViewProgress {
    bar: Option<ProgressBar>,
}

impl ViewProgress {
    pub(crate) fn new(selector_name: &str, n_views: usize, enabled: bool) -> Self {
        let bar = if enabled && n_views > 0 {
            let mut bar = ProgressBar::on(stderr(), n_views as u64);
            bar.message(&format!("{} views ", selector_name));
            Some(bar)
        } else {
            None
        };
        Self { bar }
    }

    pub(crate) fn tick(&mut self) {
        if let Some(bar) = self.bar.as_mut() {
            bar.inc();
        }
    }

    pub(crate) fn finish(mut self) {
        if let Some(bar) = self.bar.as_mut() {
            bar.finish();
        }
    }
}
