//! Display update.
//!
//! Applies one decoded [`TelemetryFrame`] and its computed [`FillGeometry`]
//! to the bound diagram: five fixed-precision labels plus the fill rect's
//! `height`/`y`.  The new document is built off to the side and committed
//! in one step, so a failed pass never leaves a partial update behind.
//! Re-rendering the same frame produces the same document.

use tankview_types::{FillGeometry, TankError, TelemetryFrame};

use crate::diagram::{DiagramBinding, LabelId, SvgDiagram};

/// Format a flow value: one decimal place, `l/s` suffix.
pub fn flow_label(name: &str, value: f32) -> String {
    format!("{name}: {value:.1}l/s")
}

/// Format a length value: whole millimetres, `mm` suffix.
pub fn depth_label(name: &str, value: f32) -> String {
    format!("{name}: {value:.0}mm")
}

/// Apply `frame` and `fill` to the diagram.
///
/// Mutates only the presentation document; the frame and the reference
/// geometry are never touched.
pub fn render(
    diagram: &mut SvgDiagram,
    binding: &DiagramBinding,
    frame: &TelemetryFrame,
    fill: &FillGeometry,
) -> Result<(), TankError> {
    let svg = binding.set_label(diagram.svg(), LabelId::Inflow, &flow_label("Inflow", frame.inflow))?;
    let svg = binding.set_label(&svg, LabelId::Height, &depth_label("Height", frame.height))?;
    let svg = binding.set_label(&svg, LabelId::SetLevel, &depth_label("Setpoint", frame.set_level))?;
    let svg = binding.set_label(&svg, LabelId::Level, &depth_label("Level", frame.level))?;
    let svg = binding.set_label(&svg, LabelId::Outflow, &flow_label("Outflow", frame.outflow))?;
    let svg = binding.set_fill(&svg, fill)?;
    diagram.replace(svg);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::TEST_DIAGRAM;

    fn frame() -> TelemetryFrame {
        TelemetryFrame {
            inflow: 12.34,
            height: 100.0,
            set_level: 80.0,
            level: 45.6,
            outflow: 7.0,
        }
    }

    fn fill() -> FillGeometry {
        FillGeometry {
            fill_pixel_height: 45.6,
            fill_pixel_y: 104.4,
        }
    }

    #[test]
    fn flow_labels_use_one_decimal() {
        assert_eq!(flow_label("Inflow", 12.34), "Inflow: 12.3l/s");
        assert_eq!(flow_label("Outflow", 7.0), "Outflow: 7.0l/s");
    }

    #[test]
    fn depth_labels_round_to_whole_millimetres() {
        assert_eq!(depth_label("Level", 45.6), "Level: 46mm");
        assert_eq!(depth_label("Height", 2000.0), "Height: 2000mm");
        assert_eq!(depth_label("Setpoint", 999.5), "Setpoint: 1000mm");
    }

    #[test]
    fn render_updates_labels_and_fill() {
        let mut diagram = SvgDiagram::from_str(TEST_DIAGRAM);
        let binding = DiagramBinding::bind(&diagram).unwrap();

        render(&mut diagram, &binding, &frame(), &fill()).unwrap();

        let svg = diagram.svg();
        assert!(svg.contains(">Inflow: 12.3l/s<"));
        assert!(svg.contains(">Height: 100mm<"));
        assert!(svg.contains(">Setpoint: 80mm<"));
        assert!(svg.contains(">Level: 46mm<"));
        assert!(svg.contains(">Outflow: 7.0l/s<"));
        assert!(svg.contains(r#"<rect id="water" x="150" y="104.4" width="120" height="45.6""#));
    }

    #[test]
    fn render_is_idempotent() {
        let mut diagram = SvgDiagram::from_str(TEST_DIAGRAM);
        let binding = DiagramBinding::bind(&diagram).unwrap();

        render(&mut diagram, &binding, &frame(), &fill()).unwrap();
        let first = diagram.svg().to_string();
        render(&mut diagram, &binding, &frame(), &fill()).unwrap();
        assert_eq!(first, diagram.svg());
    }

    #[test]
    fn render_keeps_reference_geometry_intact() {
        let mut diagram = SvgDiagram::from_str(TEST_DIAGRAM);
        let binding = DiagramBinding::bind(&diagram).unwrap();
        let before = binding.reference_geometry(&diagram).unwrap();

        render(&mut diagram, &binding, &frame(), &fill()).unwrap();

        let after = binding.reference_geometry(&diagram).unwrap();
        assert_eq!(before, after);
    }
}
