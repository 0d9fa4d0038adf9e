//! Sink selection and delivery

use serde::{Deserialize, Serialize};
use tracing::{error, info};
use wobs_core::{Report, ReportRenderer, Sink};

/// The one sink active for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkSelection {
    File,
    Messaging,
    Interactive,
}

impl SinkSelection {
    /// File wins over messaging, messaging over the interactive default.
    pub fn select(write_file: bool, messaging: bool) -> Self {
        if write_file {
            SinkSelection::File
        } else if messaging {
            SinkSelection::Messaging
        } else {
            SinkSelection::Interactive
        }
    }
}

/// Outcome of one delivery. Only logged; nothing is retried.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryResult {
    Delivered,
    Failed(String),
}

impl DeliveryResult {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryResult::Delivered)
    }
}

/// Renders reports in the style of its sink and hands them over
pub struct SinkDispatcher {
    renderer: ReportRenderer,
    sink: Box<dyn Sink>,
}

impl SinkDispatcher {
    pub fn new(renderer: ReportRenderer, sink: Box<dyn Sink>) -> Self {
        Self { renderer, sink }
    }

    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }

    pub fn renderer(&self) -> &ReportRenderer {
        &self.renderer
    }

    pub async fn dispatch(&mut self, report: &Report) -> DeliveryResult {
        let text = self.renderer.render_report(report, self.sink.style());
        self.dispatch_text(&text).await
    }

    /// Deliver already rendered text
    pub async fn dispatch_text(&mut self, text: &str) -> DeliveryResult {
        match self.sink.deliver(text).await {
            Ok(()) => {
                info!(sink = self.sink.name(), "report delivered");
                DeliveryResult::Delivered
            }
            Err(e) => {
                error!(sink = self.sink.name(), error = %e, "report delivery failed");
                DeliveryResult::Failed(e.to_string())
            }
        }
    }
}
