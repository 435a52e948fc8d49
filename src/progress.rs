use tracing::{debug, info};

use crate::sampler::OutputRecord;

/// Observer for sampling progress.
///
/// The sampler narrates through this side channel instead of returning
/// progress in its contract, so embedders can route it wherever they want.
/// All methods default to no-ops.
pub trait Progress {
    /// A class quota is about to be filled.
    fn on_class_start(&self, _class: &str, _sub_target: usize) {}
    /// A draw was rejected because the item was already selected this run.
    fn on_reject(&self, _stratum: &str, _item: &str) {}
    /// A draw succeeded; `drawn` of `total` records now exist.
    fn on_draw(&self, _drawn: usize, _total: usize, _record: &OutputRecord) {}
}

/// No-op progress for callers that do not observe sampling.
impl Progress for () {}

/// Progress sink that emits structured tracing events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingProgress;

impl Progress for TracingProgress {
    fn on_class_start(&self, class: &str, sub_target: usize) {
        info!(class, sub_target, "filling class quota");
    }

    fn on_reject(&self, stratum: &str, item: &str) {
        debug!(stratum, item, "item already selected, redrawing");
    }

    fn on_draw(&self, drawn: usize, total: usize, record: &OutputRecord) {
        debug!(
            drawn,
            total,
            class = %record.class,
            stratum = %record.stratum,
            item = %record.item,
            "drew item"
        );
    }
}
