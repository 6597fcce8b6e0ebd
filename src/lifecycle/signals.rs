//! OS signal forwarding.
//!
//! Signal handlers never touch the station. They only post a
//! [`ControlSignal`](crate::controller::ControlSignal) through a
//! [`ControlClient`], and the controller applies it like any other signal.
//!
//! ## Unix
//! - **SIGINT** (Ctrl-C) → interrupt
//! - **SIGUSR1** → force departure
//! - **SIGUSR2** → close station
//!
//! ## Other platforms
//! Only Ctrl-C is forwarded, as an interrupt.

use crate::clients::ControlClient;
use tracing::{debug, info};

/// Forwards OS signals until the controller stops accepting them.
#[cfg(unix)]
pub async fn forward_os_signals(control: ControlClient) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigusr1 = signal(SignalKind::user_defined1())?;
    let mut sigusr2 = signal(SignalKind::user_defined2())?;

    loop {
        let posted = tokio::select! {
            _ = sigint.recv() => {
                info!("SIGINT received");
                control.interrupt().await
            }
            _ = sigusr1.recv() => {
                info!("SIGUSR1 received");
                control.force_departure().await
            }
            _ = sigusr2.recv() => {
                info!("SIGUSR2 received");
                control.close_station().await
            }
        };
        if posted.is_err() {
            debug!("Controller gone, no longer forwarding signals");
            return Ok(());
        }
    }
}

#[cfg(not(unix))]
pub async fn forward_os_signals(control: ControlClient) -> std::io::Result<()> {
    loop {
        tokio::signal::ctrl_c().await?;
        info!("Ctrl-C received");
        if control.interrupt().await.is_err() {
            debug!("Controller gone, no longer forwarding signals");
            return Ok(());
        }
    }
}
