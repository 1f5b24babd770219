use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One decoded snapshot of process measurements pushed by the tank server.
///
/// A frame is constructed fresh for every inbound message and discarded after
/// rendering; no history is retained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    /// Flow into the tank, l/s.
    pub inflow: f32,
    /// Total tank height (max capacity), mm.
    pub height: f32,
    /// Target fill level the controller aims for, mm.
    pub set_level: f32,
    /// Current measured fill level, mm.  Expected in `[0, height]` but the
    /// source does not guarantee it.
    pub level: f32,
    /// Flow out of the tank, l/s.
    pub outflow: f32,
}

/// Pixel bounding box of the empty-tank outline in the process diagram.
///
/// Captured once from the static diagram before the first frame is processed
/// and immutable for the lifetime of the client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceGeometry {
    pub tank_pixel_height: f32,
    pub tank_pixel_y: f32,
}

/// Pixel bounding box of the water-fill shape, recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillGeometry {
    pub fill_pixel_height: f32,
    pub fill_pixel_y: f32,
}

/// Lifecycle state of the single server connection.
///
/// Transitions are monotonic: `Connecting → Open → Closed`, with `Closed`
/// also reachable directly from `Connecting` on handshake failure.  The
/// client never returns to `Connecting` on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Global error type spanning payload decoding, geometry mapping, diagram
/// binding, and transport failures.
#[derive(Error, Debug)]
pub enum TankError {
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("missing or non-numeric field `{0}`")]
    MissingField(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("diagram element `{0}` not found")]
    MissingElement(String),

    #[error("connection lost: {0}")]
    ConnectionLost(String),

    #[error("diagram error: {0}")]
    Diagram(String),

    #[error("transport error: {0}")]
    Transport(String),
}
