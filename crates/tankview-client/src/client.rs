//! Client context and transport-event dispatch.
//!
//! [`TankClient`] gathers everything the pipeline touches — the diagram,
//! the validated element binding, and the cached reference geometry — into
//! one context object with a defined construction order: the reference
//! geometry is captured at [`TankClient::bind`] time, before the first
//! frame can arrive.
//!
//! The transport drives the client through a closed set of
//! [`TransportEvent`]s; each one is processed to completion synchronously,
//! so the diagram is only ever touched from a single dispatch context.

use tracing::debug;

use tankview_types::{ReferenceGeometry, TankError, TelemetryFrame};

use crate::diagram::{DiagramBinding, SvgDiagram};
use crate::geometry;
use crate::parser;
use crate::render;

/// The closed set of connection lifecycle events the pipeline reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The connection handshake completed.
    Opened,
    /// One raw text payload arrived from the server.
    MessageReceived(String),
    /// The connection ended (server- or network-initiated).
    Closed,
}

/// The visualization client: diagram, element binding, and reference
/// geometry for one tank.
pub struct TankClient {
    diagram: SvgDiagram,
    binding: DiagramBinding,
    reference: ReferenceGeometry,
}

impl TankClient {
    /// Bind all required diagram elements and capture the reference
    /// geometry.
    ///
    /// # Errors
    ///
    /// Fails with [`TankError::MissingElement`] or [`TankError::Diagram`]
    /// when the diagram does not satisfy the visual asset contract.
    pub fn bind(diagram: SvgDiagram) -> Result<Self, TankError> {
        let binding = DiagramBinding::bind(&diagram)?;
        let reference = binding.reference_geometry(&diagram)?;
        Ok(Self {
            diagram,
            binding,
            reference,
        })
    }

    /// The empty-tank outline geometry captured at bind time.
    pub fn reference(&self) -> ReferenceGeometry {
        self.reference
    }

    /// The current rendered document.
    pub fn svg(&self) -> &str {
        self.diagram.svg()
    }

    /// Run one synchronous pipeline pass for a transport event.
    ///
    /// A `MessageReceived` payload goes through parse → map → render and
    /// yields the decoded frame on success.  On failure the frame is
    /// dropped before any part of the display changes, and the error is
    /// returned for the caller to report; the previous rendered state
    /// stays intact.
    pub fn handle_event(
        &mut self,
        event: TransportEvent,
    ) -> Result<Option<TelemetryFrame>, TankError> {
        match event {
            TransportEvent::Opened => {
                debug!(reference = ?self.reference, "connection open, awaiting telemetry");
                Ok(None)
            }
            TransportEvent::MessageReceived(payload) => {
                let frame = parser::parse_frame(&payload)?;
                let fill = geometry::map_fill(&self.reference, frame.level, frame.height)?;
                render::render(&mut self.diagram, &self.binding, &frame, &fill)?;
                Ok(Some(frame))
            }
            TransportEvent::Closed => {
                debug!("connection closed, no further frames");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::TEST_DIAGRAM;

    fn client() -> TankClient {
        TankClient::bind(SvgDiagram::from_str(TEST_DIAGRAM)).unwrap()
    }

    fn payload(level: f32) -> String {
        serde_json::json!({
            "inflow": 12.34,
            "height": 100.0,
            "set_level": 80.0,
            "level": level,
            "outflow": 7.0
        })
        .to_string()
    }

    #[test]
    fn bind_captures_reference_geometry() {
        let client = client();
        assert_eq!(client.reference().tank_pixel_height, 100.0);
        assert_eq!(client.reference().tank_pixel_y, 50.0);
    }

    #[test]
    fn message_event_renders_frame() {
        let mut client = client();
        let frame = client
            .handle_event(TransportEvent::MessageReceived(payload(50.0)))
            .unwrap()
            .unwrap();
        assert!((frame.level - 50.0).abs() < f32::EPSILON);
        assert!(client.svg().contains(">Level: 50mm<"));
        assert!(client.svg().contains(r#"y="100" width="120" height="50""#));
    }

    #[test]
    fn missing_field_leaves_display_unchanged() {
        let mut client = client();
        client
            .handle_event(TransportEvent::MessageReceived(payload(50.0)))
            .unwrap();
        let before = client.svg().to_string();

        let mut broken: serde_json::Value = serde_json::from_str(&payload(60.0)).unwrap();
        broken.as_object_mut().unwrap().remove("outflow");
        let err = client
            .handle_event(TransportEvent::MessageReceived(broken.to_string()))
            .unwrap_err();

        assert!(matches!(err, TankError::MissingField(field) if field == "outflow"));
        assert_eq!(before, client.svg(), "failed frame must not touch the display");
    }

    #[test]
    fn zero_height_frame_leaves_display_unchanged() {
        let mut client = client();
        client
            .handle_event(TransportEvent::MessageReceived(payload(50.0)))
            .unwrap();
        let before = client.svg().to_string();

        let zero_height = serde_json::json!({
            "inflow": 1.0,
            "height": 0.0,
            "set_level": 0.0,
            "level": 10.0,
            "outflow": 1.0
        })
        .to_string();
        let err = client
            .handle_event(TransportEvent::MessageReceived(zero_height))
            .unwrap_err();

        assert!(matches!(err, TankError::InvalidGeometry(_)));
        assert_eq!(before, client.svg());
    }

    #[test]
    fn overfull_frame_renders_outside_outline() {
        let mut client = client();
        client
            .handle_event(TransportEvent::MessageReceived(payload(150.0)))
            .unwrap();
        // Unclamped: the fill rect pokes above the tank outline.
        assert!(client.svg().contains(r#"y="0" width="120" height="150""#));
    }

    #[test]
    fn lifecycle_events_render_nothing() {
        let mut client = client();
        let before = client.svg().to_string();
        assert!(client.handle_event(TransportEvent::Opened).unwrap().is_none());
        assert!(client.handle_event(TransportEvent::Closed).unwrap().is_none());
        assert_eq!(before, client.svg());
    }
}
