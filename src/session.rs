//! Simulated connection session
//!
//! One process-wide session: which server is "connected" and the fake
//! traffic counters advanced each time stats are observed.

use serde::Serialize;

/// Bytes added to `data_sent` per observed stats poll
pub const SENT_PER_POLL: u64 = 1024;
/// Bytes added to `data_received` per observed stats poll
pub const RECEIVED_PER_POLL: u64 = 2048;

#[derive(Debug, Default)]
pub struct Session {
    connected_server_id: Option<String>,
    data_sent: u64,
    data_received: u64,
}

/// `{"status": "connected", "server_id": ...}` or `{"status": "disconnected"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionStatus {
    Connected { server_id: String },
    Disconnected,
}

/// Traffic counters as reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrafficStats {
    pub data_sent: u64,
    pub data_received: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect to `server_id`, replacing any current connection and zeroing
    /// the counters.
    pub fn connect(&mut self, server_id: String) -> SessionStatus {
        self.connected_server_id = Some(server_id);
        self.data_sent = 0;
        self.data_received = 0;
        self.status()
    }

    /// Drop the connection. Counters keep their last values.
    pub fn disconnect(&mut self) -> SessionStatus {
        self.connected_server_id = None;
        self.status()
    }

    pub fn status(&self) -> SessionStatus {
        match &self.connected_server_id {
            Some(id) => SessionStatus::Connected {
                server_id: id.clone(),
            },
            None => SessionStatus::Disconnected,
        }
    }

    pub const fn stats(&self) -> TrafficStats {
        TrafficStats {
            data_sent: self.data_sent,
            data_received: self.data_received,
        }
    }

    /// Read the counters, first advancing them by one poll's worth of
    /// traffic when connected.
    pub fn observe_traffic(&mut self) -> TrafficStats {
        if self.connected_server_id.is_some() {
            self.data_sent = self.data_sent.saturating_add(SENT_PER_POLL);
            self.data_received = self.data_received.saturating_add(RECEIVED_PER_POLL);
        }
        self.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disconnected() {
        let session = Session::new();
        assert_eq!(session.status(), SessionStatus::Disconnected);
        assert_eq!(
            session.stats(),
            TrafficStats {
                data_sent: 0,
                data_received: 0
            }
        );
    }

    #[test]
    fn test_observe_while_disconnected_is_idle() {
        let mut session = Session::new();
        session.observe_traffic();
        session.observe_traffic();
        assert_eq!(session.stats().data_sent, 0);
        assert_eq!(session.stats().data_received, 0);
    }

    #[test]
    fn test_observe_while_connected_advances() {
        let mut session = Session::new();
        session.connect("srv".to_string());
        for _ in 0..3 {
            session.observe_traffic();
        }
        assert_eq!(
            session.stats(),
            TrafficStats {
                data_sent: 3 * 1024,
                data_received: 3 * 2048
            }
        );
    }

    #[test]
    fn test_disconnect_keeps_counters() {
        let mut session = Session::new();
        session.connect("srv".to_string());
        session.observe_traffic();
        assert_eq!(session.disconnect(), SessionStatus::Disconnected);
        assert_eq!(session.observe_traffic().data_sent, 1024);
    }

    #[test]
    fn test_reconnect_switches_and_resets() {
        let mut session = Session::new();
        session.connect("a".to_string());
        session.observe_traffic();
        let status = session.connect("b".to_string());
        assert_eq!(
            status,
            SessionStatus::Connected {
                server_id: "b".to_string()
            }
        );
        assert_eq!(session.stats().data_sent, 0);
        assert_eq!(session.stats().data_received, 0);
    }

    #[test]
    fn test_status_serialization() {
        let connected = SessionStatus::Connected {
            server_id: "X".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&connected).unwrap(),
            r#"{"status":"connected","server_id":"X"}"#
        );
        assert_eq!(
            serde_json::to_string(&SessionStatus::Disconnected).unwrap(),
            r#"{"status":"disconnected"}"#
        );
    }
}
