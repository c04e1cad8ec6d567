use std::panic;

use color_eyre::{config::HookBuilder, eyre::Result};

use crate::{logging, tui};

/// Install the color-eyre error report hook and a panic hook that leaves
/// the terminal usable.
///
/// A panic mid-draw would otherwise strand the user in raw mode on the
/// alternate screen, so the terminal is restored before the report prints.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = HookBuilder::default()
        .panic_section(format!(
            "Please report this at {}/issues",
            env!("CARGO_PKG_REPOSITORY")
        ))
        .capture_span_trace_by_default(false)
        .display_location_section(true)
        .display_env_section(false)
        .into_hooks();

    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    panic::set_hook(Box::new(move |panic_info| {
        logging::log_panic(panic_info);
        if let Err(e) = tui::restore() {
            eprintln!("failed to restore terminal: {e}");
        }
        panic_hook(panic_info);
    }));

    Ok(())
}
