//! Progress events of a batch analysis.
//!
//! The pipeline pushes integer percentages into a [ProgressReporter] from the
//! thread running the analysis. Values within one pass are delivered in
//! order, never decrease, and always end with 100. Hosts that need the values
//! on another thread (a UI loop, an event channel) wrap a
//! [crossbeam_channel::Sender] in a [ChannelProgress].

use crossbeam_channel::Sender;

/// Sink for progress values in `0..=100`.
pub trait ProgressReporter {
    fn report(&mut self, percent: u8);
}

impl<F> ProgressReporter for F
where
    F: FnMut(u8),
{
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

/// Discards every value.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _percent: u8) {}
}

/// Forwards values to a channel, to be received on the delivery context.
/// A disconnected receiver is not an error; the analysis keeps going.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: Sender<u8>,
}

impl ChannelProgress {
    pub fn new(sender: Sender<u8>) -> Self {
        ChannelProgress { sender }
    }
}

impl ProgressReporter for ChannelProgress {
    fn report(&mut self, percent: u8) {
        if self.sender.send(percent).is_err() {
            log::trace!("Progress receiver dropped, discarding {}%", percent);
        }
    }
}

/// Turns frame positions into monotonic percentages for one pass.
pub(crate) struct ProgressTracker<'a> {
    reporter: &'a mut dyn ProgressReporter,
    last: Option<u8>,
}

impl<'a> ProgressTracker<'a> {
    pub fn start(reporter: &'a mut dyn ProgressReporter) -> Self {
        let mut tracker = ProgressTracker {
            reporter,
            last: None,
        };
        tracker.emit(0);
        tracker
    }

    /// Report that `done` of `total` frames were processed.
    pub fn advance(&mut self, done: usize, total: usize) {
        if total == 0 {
            return;
        }
        let percent = (done.min(total) * 100 / total) as u8;
        self.emit(percent);
    }

    pub fn finish(mut self) {
        self.emit(100);
    }

    fn emit(&mut self, percent: u8) {
        let percent = percent.min(100);
        if self.last.map_or(false, |last| percent <= last) {
            return;
        }
        self.last = Some(percent);
        self.reporter.report(percent);
    }
}
