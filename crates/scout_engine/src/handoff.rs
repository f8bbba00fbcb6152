use std::time::Duration;

use scout_core::Handoff;
use scout_logging::{scout_info, scout_warn};

use crate::{NavigationError, Navigator, WindowTarget};

/// Opens the hand-off context, waits `grace` for it to start loading, then
/// moves the current context to the popped marketplace URL.
///
/// A blocked hand-off abandons the chain: the current context stays put and
/// the carried URLs are dropped.
pub async fn perform_handoff(
    navigator: &dyn Navigator,
    handoff: &Handoff,
    grace: Duration,
) -> Result<(), NavigationError> {
    if let Err(err) = navigator
        .open_new_context(&handoff.handoff_address, &WindowTarget::HandOff)
        .await
    {
        scout_warn!(
            "Hand-off blocked with {} urls still to visit: {}",
            handoff.remaining,
            err
        );
        return Err(err);
    }
    tokio::time::sleep(grace).await;
    navigator.navigate_current(&handoff.navigate_to).await?;
    scout_info!(
        "Handed off; {} urls continue in the new context",
        handoff.remaining
    );
    Ok(())
}
