//! # events
//!
//! Defines [`ContextEvent`] — what the watcher publishes to notification
//! consumers whenever the page context moves.
//!
//! Events travel over a `tokio::sync::broadcast::Sender<String>` as
//! pre-serialized JSON so subscribers never need the engine's types.

use serde::Serialize;

use crate::models::{ContextSnapshot, MarginType};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextEvent {
    /// The traded symbol switched (or appeared / disappeared).
    SymbolChanged {
        from: Option<String>,
        to:   Option<String>,
    },

    TimeframeChanged {
        from: String,
        to:   String,
    },

    LeverageChanged {
        from: Option<u32>,
        to:   Option<u32>,
    },

    MarginTypeChanged {
        from: MarginType,
        to:   MarginType,
    },

    /// The open-positions table changed; `count` is the new row count.
    PositionsChanged {
        count: usize,
    },

    /// Full snapshot, published after every poll.
    Snapshot {
        context: Box<ContextSnapshot>,
    },
}

impl ContextEvent {
    /// Field-level changes between two consecutive snapshots.  The first
    /// snapshot (`prev == None`) yields nothing.
    pub fn diff(prev: Option<&ContextSnapshot>, next: &ContextSnapshot) -> Vec<ContextEvent> {
        let Some(prev) = prev else {
            return Vec::new();
        };

        let mut events = Vec::new();

        if prev.symbol != next.symbol {
            events.push(ContextEvent::SymbolChanged {
                from: prev.symbol.clone(),
                to:   next.symbol.clone(),
            });
        }
        if prev.timeframe != next.timeframe {
            events.push(ContextEvent::TimeframeChanged {
                from: prev.timeframe.clone(),
                to:   next.timeframe.clone(),
            });
        }
        if prev.leverage != next.leverage {
            events.push(ContextEvent::LeverageChanged {
                from: prev.leverage,
                to:   next.leverage,
            });
        }
        if prev.margin_type != next.margin_type {
            events.push(ContextEvent::MarginTypeChanged {
                from: prev.margin_type,
                to:   next.margin_type,
            });
        }
        if prev.positions != next.positions {
            events.push(ContextEvent::PositionsChanged { count: next.positions.len() });
        }

        events
    }

    /// Serialize for the broadcast channel.
    #[inline]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"event":"SERIALIZATION_ERROR"}"#.to_string())
    }
}
