//! Terminal restoration on panic

use vpngate_core::prelude::*;

/// Leave the alternate screen before any panic report is printed, and record
/// the panic in the log file since stderr is not visible while the TUI runs.
pub fn install_panic_hook() {
    let report = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        error!("Panic in UI: {}", info);
        report(info);
    }));
}
