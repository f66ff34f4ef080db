//! Cross-thread hand-off from the simulation thread

pub mod channel;
pub mod requests;

pub use channel::{mailbox, MailboxReceiver, MailboxSender};
pub use requests::{RenderRequest, ServerNotification};

/// The simulation thread's producer ends of both mailboxes
///
/// `network` is `None` when no server is running; notifications are then
/// skipped.
#[derive(Debug)]
pub struct Outbox {
    pub render: MailboxSender<RenderRequest>,
    pub network: Option<MailboxSender<ServerNotification>>,
}

/// Consumer ends matching an [`Outbox`]
#[derive(Debug)]
pub struct Inbox {
    pub render: MailboxReceiver<RenderRequest>,
    pub network: MailboxReceiver<ServerNotification>,
}

impl Outbox {
    /// Create both mailboxes with a network server attached
    pub fn connected() -> (Outbox, Inbox) {
        let (render_tx, render_rx) = mailbox();
        let (network_tx, network_rx) = mailbox();
        (
            Outbox {
                render: render_tx,
                network: Some(network_tx),
            },
            Inbox {
                render: render_rx,
                network: network_rx,
            },
        )
    }

    /// Create a render-only outbox for single-player runs
    pub fn offline() -> (Outbox, MailboxReceiver<RenderRequest>) {
        let (render_tx, render_rx) = mailbox();
        (
            Outbox {
                render: render_tx,
                network: None,
            },
            render_rx,
        )
    }

    pub fn render(&self, request: RenderRequest) {
        self.render.push(request);
    }

    pub fn notify(&self, notification: ServerNotification) {
        if let Some(network) = &self.network {
            network.push(notification);
        }
    }
}
