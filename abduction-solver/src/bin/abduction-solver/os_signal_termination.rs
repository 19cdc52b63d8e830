use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use abduction_solver::core::termination::TerminationCondition;

/// Stops the search once SIGINT or SIGTERM is received, after which the explanations found so
/// far are reported as timed out.
#[derive(Clone, Debug)]
pub(crate) struct OsSignal {
    signal_received: Arc<AtomicBool>,
}

impl OsSignal {
    /// Creates the condition and registers the signal listeners.
    pub(crate) fn install() -> std::io::Result<OsSignal> {
        const TERMINATION_SIGNALS: &[std::ffi::c_int] =
            &[signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM];

        let signal_received = Arc::new(AtomicBool::new(false));
        for &signal in TERMINATION_SIGNALS {
            let _ = signal_hook::flag::register(signal, Arc::clone(&signal_received))?;
        }

        Ok(OsSignal { signal_received })
    }
}

impl TerminationCondition for OsSignal {
    fn should_stop(&mut self) -> bool {
        self.signal_received.load(Ordering::Relaxed)
    }
}
