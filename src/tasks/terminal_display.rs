//! Terminal renderer for the display state

use std::io::{self, Write};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{config::DisplayFormat, state::DisplayState};

/// Render `display` in the requested terminal format
pub fn render(format: DisplayFormat, display: &DisplayState) -> Result<String, serde_json::Error> {
    match format {
        DisplayFormat::Line => Ok(format!("\r\x1b[2K⏱️  {}", display.render_line())),
        DisplayFormat::Json => Ok(format!("{}\n", serde_json::to_string(display)?)),
    }
}

/// Write the current display, then every update, until the sender goes away
pub async fn write_display_updates<W: Write>(
    mut display_rx: watch::Receiver<DisplayState>,
    format: DisplayFormat,
    out: &mut W,
) -> io::Result<()> {
    loop {
        let rendered = render(format, &display_rx.borrow_and_update())?;
        out.write_all(rendered.as_bytes())?;
        out.flush()?;

        if display_rx.changed().await.is_err() {
            return Ok(());
        }
    }
}

/// Redraw the countdown on stdout whenever the display changes
pub async fn terminal_display_task(display_rx: watch::Receiver<DisplayState>, format: DisplayFormat) {
    info!("Starting terminal display task ({:?})", format);

    if let Err(e) = write_display_updates(display_rx, format, &mut io::stdout()).await {
        warn!("Terminal display stopped: {}", e);
    }
}
