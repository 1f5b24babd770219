//! `tankview-client` – the tank visualization pipeline.
//!
//! Receives JSON telemetry over a persistent WebSocket and renders the
//! tank's fill level, flow rates, and setpoint onto a static SVG process
//! diagram.  One synchronous pass per inbound message:
//! parse → map → render.
//!
//! # Modules
//!
//! - [`parser`] – decodes one text payload into a
//!   [`TelemetryFrame`](tankview_types::TelemetryFrame).
//! - [`geometry`] – pure mapping from measured level to fill-shape pixel
//!   coordinates.
//! - [`diagram`] – SVG document handling and the validated startup binding
//!   of all required diagram elements.
//! - [`render`] – label formatting and the per-frame display update.
//! - [`client`] – the client context object and transport-event dispatch.
//! - [`connection`] – WebSocket lifecycle: handshake, greeting, message
//!   loop, close.

pub mod client;
pub mod connection;
pub mod diagram;
pub mod geometry;
pub mod parser;
pub mod render;

pub use client::{TankClient, TransportEvent};
pub use connection::TankConnection;
pub use diagram::{DiagramBinding, LabelId, SvgDiagram};
