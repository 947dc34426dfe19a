//! Background widget worker.
//!
//! Runs on the tokio runtime, owns the [`SocialWidget`], and talks to the UI
//! thread over two channels: [`WidgetRequest`]s in, [`WidgetMsg`]s out.
//!
//! On start the worker connects every enabled platform and emits one
//! [`WidgetMsg::Status`] per platform.  After that it serves fetch requests
//! one at a time, so two aggregations never overlap.

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::source::{FeedItem, Platform};
use crate::widget::{ConnectionStatus, SocialWidget};

/// Messages sent from the worker to the UI thread.
#[derive(Debug)]
pub enum WidgetMsg {
    /// A platform finished its connection attempt.
    Status(Platform, ConnectionStatus),
    /// An aggregation succeeded with these (already shuffled) items.
    Items(Vec<FeedItem>),
    /// An aggregation failed with this error description.
    Error(String),
}

/// Requests sent from the UI thread to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetRequest {
    Fetch,
}

/// The UI side of the worker's channels.
pub struct WorkerHandle {
    pub requests: mpsc::UnboundedSender<WidgetRequest>,
    pub events: mpsc::UnboundedReceiver<WidgetMsg>,
}

/// Spawn the worker task on `runtime`.
///
/// The task ends when the request sender is dropped or the event receiver
/// goes away.
pub fn spawn(runtime: &Handle, widget: SocialWidget) -> WorkerHandle {
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    runtime.spawn(run(widget, req_rx, event_tx));

    WorkerHandle {
        requests: req_tx,
        events: event_rx,
    }
}

async fn run(
    widget: SocialWidget,
    mut requests: mpsc::UnboundedReceiver<WidgetRequest>,
    events: mpsc::UnboundedSender<WidgetMsg>,
) {
    for (platform, status) in widget.connect().await {
        if events.send(WidgetMsg::Status(platform, status)).is_err() {
            return;
        }
    }

    while let Some(request) = requests.recv().await {
        match request {
            WidgetRequest::Fetch => {
                let msg = match widget.fetch().await {
                    Ok(items) => WidgetMsg::Items(items),
                    Err(e) => {
                        tracing::warn!(platform = %e.platform(), error = %e, "Aggregation failed");
                        WidgetMsg::Error(e.to_string())
                    }
                };
                // If the receiver is gone the UI has exited; stop quietly.
                if events.send(msg).is_err() {
                    return;
                }
            }
        }
    }

    tracing::debug!("Request channel closed, worker exiting");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
