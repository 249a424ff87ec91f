//! Trace correlation carried in NATS headers.

use uuid::Uuid;

use crate::kernel::MessageHeaders;

pub const TRACE_ID_HEADER: &str = "trace-id";
pub const SPAN_ID_HEADER: &str = "span-id";

/// Trace/span pair of one saga hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: String,
    pub span_id: String,
    /// Span that sent us the message, when the sender supplied one.
    pub parent_span_id: Option<String>,
}

impl TraceContext {
    /// Continue the sender's trace, or start one if the message had none.
    pub fn from_headers(headers: &MessageHeaders) -> Self {
        let trace_id = headers
            .get(TRACE_ID_HEADER)
            .filter(|id| !id.trim().is_empty())
            .cloned()
            .unwrap_or_else(new_trace_id);

        Self {
            trace_id,
            span_id: new_span_id(),
            parent_span_id: headers.get(SPAN_ID_HEADER).cloned(),
        }
    }

    /// A new span in the same trace, parented on this one.
    pub fn child(&self) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            span_id: new_span_id(),
            parent_span_id: Some(self.span_id.clone()),
        }
    }

    pub fn to_headers(&self) -> MessageHeaders {
        let mut headers = MessageHeaders::new();
        headers.insert(TRACE_ID_HEADER.to_string(), self.trace_id.clone());
        headers.insert(SPAN_ID_HEADER.to_string(), self.span_id.clone());
        headers
    }
}

fn new_trace_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn new_span_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(16);
    id
}
