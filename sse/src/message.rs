use axum::response::sse::Event as SseFrame;
use backbone::{Headers, Message};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Serialize;

/// Subject carried by events the gateway generates itself.
pub const SYSTEM_SUBJECT: &str = "natssse.system";

const PING_PAYLOAD: &[u8] = br#"{"system": "ping"}"#;
const CONTENT_LENGTH: &str = "content-length";

/// Trait for getting a short event label for logs
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// One entry on a session's output channel.
///
/// Synthetic events use [`SYSTEM_SUBJECT`] and share the wire format of real
/// messages, so a client cannot tell them apart from real traffic on that subject.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A message received from the backbone subscription.
    Message(Message),
    /// Keepalive emitted on an idle stream.
    Ping,
    /// A subscription or read failure, carrying a human-readable description.
    Error(String),
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::Message(_) => "message",
            Event::Ping => "ping",
            Event::Error(_) => "error",
        }
    }
}

/// JSON body of one SSE frame.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub subject: String,
    #[serde(skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
    /// Standard base64 of the payload bytes.
    pub data: String,
}

impl Event {
    pub fn subject(&self) -> &str {
        match self {
            Event::Message(message) => &message.subject,
            Event::Ping | Event::Error(_) => SYSTEM_SUBJECT,
        }
    }

    pub fn payload(&self) -> &[u8] {
        match self {
            Event::Message(message) => &message.data,
            Event::Ping => PING_PAYLOAD,
            Event::Error(details) => details.as_bytes(),
        }
    }

    /// Message headers are carried inside the envelope, never as HTTP headers.
    pub fn envelope(&self) -> Envelope {
        let headers = match self {
            Event::Message(message) => message.headers.without(CONTENT_LENGTH),
            Event::Ping | Event::Error(_) => Headers::new(),
        };

        Envelope {
            subject: self.subject().to_string(),
            headers,
            data: BASE64.encode(self.payload()),
        }
    }

    pub fn to_frame(&self) -> Result<SseFrame, axum::Error> {
        SseFrame::default().json_data(self.envelope())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn envelope_json(event: &Event) -> Value {
        serde_json::to_value(event.envelope()).unwrap()
    }

    #[test]
    fn message_envelope_carries_headers_without_content_length() {
        let mut headers = Headers::new();
        headers.insert("Content-Length", "5");
        headers.append("x-trace", "a");
        headers.append("x-trace", "b");
        let event = Event::Message(Message::new("users.john", "hello").with_headers(headers));

        assert_eq!(
            envelope_json(&event),
            json!({
                "subject": "users.john",
                "headers": {"x-trace": ["a", "b"]},
                "data": "aGVsbG8=",
            })
        );
    }

    #[test]
    fn headers_are_omitted_when_empty() {
        let event = Event::Message(Message::new("users.john", ""));
        assert_eq!(
            envelope_json(&event),
            json!({"subject": "users.john", "data": ""})
        );
    }

    #[test]
    fn ping_uses_the_system_subject() {
        let value = envelope_json(&Event::Ping);
        assert_eq!(value["subject"], SYSTEM_SUBJECT);

        let data = BASE64.decode(value["data"].as_str().unwrap()).unwrap();
        let payload: Value = serde_json::from_slice(&data).unwrap();
        assert_eq!(payload, json!({"system": "ping"}));
    }

    #[test]
    fn error_carries_readable_details() {
        let event = Event::Error("subscription closed".to_string());
        assert_eq!(event.subject(), SYSTEM_SUBJECT);
        assert_eq!(event.payload(), b"subscription closed");
        assert_eq!(event.event_type(), "error");
    }

    #[test]
    fn to_frame_serializes_every_variant() {
        let events = [
            Event::Message(Message::new("a.b", "x")),
            Event::Ping,
            Event::Error("boom".to_string()),
        ];
        for event in events {
            assert!(event.to_frame().is_ok(), "{} frame", event.event_type());
        }
    }
}
