use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::domain::UserId;
use crate::mailchimp_client::MailchimpClient;
use crate::option_store::OptionStore;
use crate::users::UserDirectory;

/// Events emitted by the site. There is only one so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// A user row was just inserted; the payload is its id
    UserRegistered,
}

impl Display for Event {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Event::UserRegistered => f.write_str("user_registered"),
        }
    }
}

/// Everything a hook may need. Built once at startup; hooks only ever read
/// from it.
pub struct HookContext {
    pub options: Arc<dyn OptionStore>,
    pub users: Arc<dyn UserDirectory>,
    pub mailchimp: MailchimpClient,
}

pub type HookFuture<'a> = Pin<Box<dyn Future<Output = Result<(), anyhow::Error>> + Send + 'a>>;

/// A hook is a plain function; no closures, no captured state
pub type Handler = for<'a> fn(&'a HookContext, UserId) -> HookFuture<'a>;

/// Explicit replacement for "add an action": handlers are registered per event
/// with `on`, and run in registration order by `emit`.
pub struct Notifier {
    context: HookContext,
    handlers: HashMap<Event, Vec<Handler>>,
}

impl Notifier {
    pub fn new(context: HookContext) -> Self {
        Self {
            context,
            handlers: HashMap::new(),
        }
    }

    pub fn on(
        &mut self,
        event: Event,
        handler: Handler,
    ) -> &mut Self {
        self.handlers.entry(event).or_default().push(handler);
        self
    }

    /// Run every handler for `event`, inline and one after another.
    ///
    /// A failing handler is logged and does not stop the others; the emitter
    /// never sees the failure. Returns the number of handlers run.
    #[tracing::instrument(name = "Emitting event", skip(self))]
    pub async fn emit(
        &self,
        event: Event,
        user_id: UserId,
    ) -> usize {
        let handlers = match self.handlers.get(&event) {
            Some(h) => h,
            None => return 0,
        };
        for handler in handlers {
            if let Err(e) = handler(&self.context, user_id).await {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "{event} handler failed"
                );
            }
        }
        handlers.len()
    }
}
