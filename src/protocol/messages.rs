//! Inbound and outbound message types

use serde::{Deserialize, Serialize};

use crate::types::{RelayError, RelayResult};

/// Negotiation messages forwarded verbatim to the peer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayKind {
    IceCandidate,
    VideoOffer,
    VideoAnswer,
}

/// Messages a client may send.
///
/// Only the envelope `type` is inspected; payloads of the relay kinds are
/// never parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientMessage {
    Ready,
    NotReady,
    Connected,
    NotConnected,
    Relay(RelayKind),
    /// Well-formed envelope with a type nobody handles
    Unknown(String),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    msg_type: String,
}

impl ClientMessage {
    /// Parse a text frame by its envelope type
    pub fn parse(text: &str) -> RelayResult<Self> {
        let envelope: Envelope =
            serde_json::from_str(text).map_err(|e| RelayError::Malformed(e.to_string()))?;
        Ok(Self::from_type(&envelope.msg_type))
    }

    /// Map a type string to a variant. The bracketed spellings are accepted
    /// for older front-ends.
    pub fn from_type(msg_type: &str) -> Self {
        match msg_type {
            "client:ready" | "[client]: ready" => Self::Ready,
            "client:not_ready" | "[client]: not_ready" => Self::NotReady,
            "client:connected" | "[client]: connected" => Self::Connected,
            "client:not_connected" | "[client]: not_connected" => Self::NotConnected,
            "webrtc:new_ice_candidate" | "[webrtc]: new_ice_candidate" => {
                Self::Relay(RelayKind::IceCandidate)
            }
            "webrtc:video_offer" | "[webrtc]: video_offer" => Self::Relay(RelayKind::VideoOffer),
            "webrtc:video_answer" | "[webrtc]: video_answer" => Self::Relay(RelayKind::VideoAnswer),
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Aggregate counts carried by `server:info`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoPayload {
    pub users: usize,
    pub ready_users: usize,
    pub connected_users: usize,
}

/// Messages the server sends
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    #[serde(rename = "server:info")]
    Info(InfoPayload),

    /// You have been paired; create the offer
    #[serde(rename = "server:call")]
    Call,

    /// Your peer ended the session
    #[serde(rename = "server:hang_up")]
    HangUp,
}

impl ServerMessage {
    pub fn to_text(&self) -> String {
        // Serializing these variants cannot fail: no maps with non-string keys
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_client_types() {
        let cases = [
            (r#"{"type":"client:ready"}"#, ClientMessage::Ready),
            (r#"{"type":"client:not_ready"}"#, ClientMessage::NotReady),
            (r#"{"type":"client:connected"}"#, ClientMessage::Connected),
            (r#"{"type":"client:not_connected"}"#, ClientMessage::NotConnected),
        ];

        for (json, expected) in cases {
            assert_eq!(ClientMessage::parse(json).unwrap(), expected);
        }
    }

    #[test]
    fn test_parse_relay_ignores_payload() {
        let json = r#"{"type":"webrtc:video_offer","payload":{"sdp":"v=0","nested":[1,2,{"x":null}]}}"#;
        assert_eq!(
            ClientMessage::parse(json).unwrap(),
            ClientMessage::Relay(RelayKind::VideoOffer)
        );
    }

    #[test]
    fn test_parse_legacy_spelling() {
        let msg = ClientMessage::parse(r#"{"type":"[webrtc]: new_ice_candidate"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Relay(RelayKind::IceCandidate));
    }

    #[test]
    fn test_unknown_type_is_not_an_error() {
        let msg = ClientMessage::parse(r#"{"type":"client:dance"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Unknown("client:dance".to_string()));
    }

    #[test]
    fn test_malformed_frames() {
        assert!(matches!(ClientMessage::parse("not json"), Err(RelayError::Malformed(_))));
        assert!(matches!(ClientMessage::parse(r#"{"payload":{}}"#), Err(RelayError::Malformed(_))));
        assert!(matches!(ClientMessage::parse(r#"{"type":7}"#), Err(RelayError::Malformed(_))));
    }

    #[test]
    fn test_server_message_serialization() {
        let info = ServerMessage::Info(InfoPayload {
            users: 3,
            ready_users: 1,
            connected_users: 2,
        });
        let value: serde_json::Value = serde_json::from_str(&info.to_text()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "server:info",
                "payload": { "users": 3, "readyUsers": 1, "connectedUsers": 2 }
            })
        );

        assert_eq!(ServerMessage::Call.to_text(), r#"{"type":"server:call"}"#);
        assert_eq!(ServerMessage::HangUp.to_text(), r#"{"type":"server:hang_up"}"#);
    }
}
