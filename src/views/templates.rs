use handlebars::Handlebars;
use serde_json::json;
use std::sync::Arc;

use crate::{
    error::{NotifierError, Result},
    models::AlertEvent,
    services::notifier::Notification,
};

pub type Hbs = Arc<Handlebars<'static>>;

const TITLE: &str = "alert/title";
const MESSAGE: &str = "alert/message";

/// Renders alert events into notification text.
///
/// Templates see `id`, `name`, `kind`, `direction`, `threshold` and `price`
/// (two decimals). Output is plain text, nothing is HTML-escaped.
#[derive(Clone)]
pub struct MessageRenderer {
    hbs: Hbs,
}

impl MessageRenderer {
    pub fn new(title_template: &str, message_template: &str) -> Result<Self> {
        let mut hb = Handlebars::new();
        hb.set_strict_mode(true);
        hb.register_escape_fn(handlebars::no_escape);

        hb.register_template_string(TITLE, title_template)
            .map_err(|e| NotifierError::TemplateParse(Box::new(e)))?;
        hb.register_template_string(MESSAGE, message_template)
            .map_err(|e| NotifierError::TemplateParse(Box::new(e)))?;

        Ok(Self { hbs: Arc::new(hb) })
    }

    pub fn render(&self, event: &AlertEvent) -> Result<Notification> {
        let ctx = json!({
            "id": event.coin_id,
            "name": event.coin_name,
            "kind": event.kind.as_str(),
            "direction": event.direction,
            "threshold": event.threshold.to_string(),
            "price": format!("{:.2}", event.price),
        });

        Ok(Notification {
            title: self.hbs.render(TITLE, &ctx)?,
            message: self.hbs.render(MESSAGE, &ctx)?,
            kind: event.kind,
        })
    }
}
