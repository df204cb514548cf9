use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, WebhookReceivedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub webhook_received_producer: Vec<EventProducer<WebhookReceivedEvent>>,
}

pub struct EventHandlers {
    pub on_webhook_received: Option<EventHandler<WebhookReceivedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_webhook_received = hooks.on_webhook_received.map(|f| EventHandler::new(buffer_size, f));
        Self { on_webhook_received }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_webhook_received {
            result.webhook_received_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_webhook_received {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_webhook_received: Option<Handler<WebhookReceivedEvent>>,
}

impl EventHooks {
    pub fn on_webhook_received<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(WebhookReceivedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_webhook_received = Some(Arc::new(f));
        self
    }
}
