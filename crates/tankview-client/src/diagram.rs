//! SVG process-diagram binding.
//!
//! The diagram asset is an external collaborator: a static SVG that must
//! expose one empty-tank outline rect, one water-fill rect, and five text
//! labels, each carrying a well-known `id`.  [`DiagramBinding::bind`]
//! resolves every required element once at startup and fails fast with
//! [`TankError::MissingElement`] when one is absent, so rendering never has
//! to probe the document per frame.
//!
//! The document is kept as text; updates are id-targeted in-place rewrites
//! of the matched element's attributes or content.  Everything else in the
//! SVG stays byte-for-byte intact, and rewriting the same values twice is a
//! no-op.

use std::fs;
use std::path::Path;

use regex::{Captures, Regex};
use tankview_types::{FillGeometry, ReferenceGeometry, TankError};

/// Element id of the empty-tank outline rect (`height`/`y` read once).
pub const TANK_ID: &str = "tank";
/// Element id of the water-fill rect (`height`/`y` rewritten per frame).
pub const WATER_ID: &str = "water";
/// Element id of the inflow label.
pub const INFLOW_TEXT_ID: &str = "inflow_text";
/// Element id of the tank-height label.
pub const HEIGHT_TEXT_ID: &str = "height_text";
/// Element id of the setpoint label.
pub const SET_LEVEL_TEXT_ID: &str = "set_level_text";
/// Element id of the level label.
pub const LEVEL_TEXT_ID: &str = "level_text";
/// Element id of the outflow label.
pub const OUTFLOW_TEXT_ID: &str = "outflow_text";

/// The five telemetry labels the diagram must expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelId {
    Inflow,
    Height,
    SetLevel,
    Level,
    Outflow,
}

/// An SVG process diagram, owned as text.
#[derive(Debug, Clone)]
pub struct SvgDiagram {
    text: String,
}

impl SvgDiagram {
    /// Wrap an in-memory SVG document.
    pub fn from_str(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read the diagram asset from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TankError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            TankError::Diagram(format!("failed to read diagram at {}: {e}", path.display()))
        })?;
        Ok(Self { text })
    }

    /// The current document, including all rendered updates.
    pub fn svg(&self) -> &str {
        &self.text
    }

    pub(crate) fn replace(&mut self, text: String) {
        self.text = text;
    }
}

fn compile(pattern: &str, id: &str) -> Result<Regex, TankError> {
    Regex::new(pattern)
        .map_err(|e| TankError::Diagram(format!("bad matcher for element `{id}`: {e}")))
}

/// Handle to a rect-like element; reads and rewrites its `height` and `y`
/// attributes.
#[derive(Debug)]
struct RectHandle {
    id: String,
    tag: Regex,
    height_attr: Regex,
    y_attr: Regex,
}

impl RectHandle {
    fn new(id: &str) -> Result<Self, TankError> {
        let tag_pattern = format!(r#"<[A-Za-z][\w:.-]*\b[^>]*\bid="{}"[^>]*>"#, regex::escape(id));
        Ok(Self {
            id: id.to_string(),
            tag: compile(&tag_pattern, id)?,
            // Leading whitespace keeps `height` from matching inside other
            // attribute names, and `y` from matching `ry`/`cy`.
            height_attr: compile(r#"(\s)height="([^"]*)""#, id)?,
            y_attr: compile(r#"(\s)y="([^"]*)""#, id)?,
        })
    }

    fn find_tag<'a>(&self, svg: &'a str) -> Result<regex::Match<'a>, TankError> {
        self.tag
            .find(svg)
            .ok_or_else(|| TankError::MissingElement(self.id.clone()))
    }

    fn attr_value(&self, attr: &Regex, tag: &str, name: &str) -> Result<f32, TankError> {
        attr.captures(tag)
            .and_then(|caps| caps.get(2))
            .and_then(|m| m.as_str().parse::<f32>().ok())
            .ok_or_else(|| {
                TankError::Diagram(format!(
                    "element `{}` has no numeric `{name}` attribute",
                    self.id
                ))
            })
    }

    /// Read `(height, y)` from the element's opening tag.
    fn read(&self, svg: &str) -> Result<(f32, f32), TankError> {
        let tag = self.find_tag(svg)?;
        let height = self.attr_value(&self.height_attr, tag.as_str(), "height")?;
        let y = self.attr_value(&self.y_attr, tag.as_str(), "y")?;
        Ok((height, y))
    }

    /// Rewrite `height` and `y` on the element, returning the new document.
    fn write(&self, svg: &str, height: f32, y: f32) -> Result<String, TankError> {
        let m = self.find_tag(svg)?;
        let tag = self
            .height_attr
            .replace(m.as_str(), |caps: &Captures| {
                format!("{}height=\"{height}\"", &caps[1])
            })
            .into_owned();
        let tag = self
            .y_attr
            .replace(&tag, |caps: &Captures| format!("{}y=\"{y}\"", &caps[1]))
            .into_owned();
        Ok(format!("{}{}{}", &svg[..m.start()], tag, &svg[m.end()..]))
    }
}

/// Handle to a `<text>` element; rewrites its content.
#[derive(Debug)]
struct TextHandle {
    id: String,
    element: Regex,
}

impl TextHandle {
    fn new(id: &str) -> Result<Self, TankError> {
        let pattern = format!(
            r#"(<text\b[^>]*\bid="{}"[^>]*>)[^<]*(</text>)"#,
            regex::escape(id)
        );
        Ok(Self {
            id: id.to_string(),
            element: compile(&pattern, id)?,
        })
    }

    fn exists(&self, svg: &str) -> bool {
        self.element.is_match(svg)
    }

    fn write(&self, svg: &str, content: &str) -> Result<String, TankError> {
        if !self.exists(svg) {
            return Err(TankError::MissingElement(self.id.clone()));
        }
        Ok(self
            .element
            .replace(svg, |caps: &Captures| {
                format!("{}{content}{}", &caps[1], &caps[2])
            })
            .into_owned())
    }
}

/// Resolved handles to every diagram element the renderer touches.
///
/// Binding happens once at startup; after a successful [`bind`] no per-frame
/// operation can fail on a missing element.
///
/// [`bind`]: DiagramBinding::bind
#[derive(Debug)]
pub struct DiagramBinding {
    tank: RectHandle,
    water: RectHandle,
    inflow: TextHandle,
    height: TextHandle,
    set_level: TextHandle,
    level: TextHandle,
    outflow: TextHandle,
}

impl DiagramBinding {
    /// Resolve all required elements against `diagram`.
    ///
    /// # Errors
    ///
    /// [`TankError::MissingElement`] when any required id is absent, and
    /// [`TankError::Diagram`] when a rect lacks numeric `height`/`y`
    /// attributes.
    pub fn bind(diagram: &SvgDiagram) -> Result<Self, TankError> {
        let binding = Self {
            tank: RectHandle::new(TANK_ID)?,
            water: RectHandle::new(WATER_ID)?,
            inflow: TextHandle::new(INFLOW_TEXT_ID)?,
            height: TextHandle::new(HEIGHT_TEXT_ID)?,
            set_level: TextHandle::new(SET_LEVEL_TEXT_ID)?,
            level: TextHandle::new(LEVEL_TEXT_ID)?,
            outflow: TextHandle::new(OUTFLOW_TEXT_ID)?,
        };

        let svg = diagram.svg();
        binding.tank.read(svg)?;
        binding.water.read(svg)?;
        for handle in [
            &binding.inflow,
            &binding.height,
            &binding.set_level,
            &binding.level,
            &binding.outflow,
        ] {
            if !handle.exists(svg) {
                return Err(TankError::MissingElement(handle.id.clone()));
            }
        }
        Ok(binding)
    }

    /// Read the empty-tank outline's pixel bounding box.
    pub fn reference_geometry(&self, diagram: &SvgDiagram) -> Result<ReferenceGeometry, TankError> {
        let (tank_pixel_height, tank_pixel_y) = self.tank.read(diagram.svg())?;
        Ok(ReferenceGeometry {
            tank_pixel_height,
            tank_pixel_y,
        })
    }

    /// Rewrite one label's text content, returning the updated document.
    pub fn set_label(&self, svg: &str, label: LabelId, content: &str) -> Result<String, TankError> {
        let handle = match label {
            LabelId::Inflow => &self.inflow,
            LabelId::Height => &self.height,
            LabelId::SetLevel => &self.set_level,
            LabelId::Level => &self.level,
            LabelId::Outflow => &self.outflow,
        };
        handle.write(svg, content)
    }

    /// Rewrite the fill rect's `height`/`y`, returning the updated document.
    pub fn set_fill(&self, svg: &str, fill: &FillGeometry) -> Result<String, TankError> {
        self.water
            .write(svg, fill.fill_pixel_height, fill.fill_pixel_y)
    }
}

/// Minimal process diagram used across the crate's tests.  The tank outline
/// is 100px tall at y=50, matching the reference scenarios.
#[cfg(test)]
pub(crate) const TEST_DIAGRAM: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300">
  <rect id="tank" x="150" y="50" width="120" height="100" fill="none" stroke="black"/>
  <rect id="water" x="150" y="150" width="120" height="0" fill="steelblue"/>
  <text id="inflow_text" x="20" y="40">Inflow:</text>
  <text id="height_text" x="20" y="60">Height:</text>
  <text id="set_level_text" x="20" y="80">Setpoint:</text>
  <text id="level_text" x="20" y="100">Level:</text>
  <text id="outflow_text" x="20" y="120">Outflow:</text>
</svg>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_resolves_complete_diagram() {
        let diagram = SvgDiagram::from_str(TEST_DIAGRAM);
        assert!(DiagramBinding::bind(&diagram).is_ok());
    }

    #[test]
    fn bind_reports_each_missing_element() {
        for id in [
            TANK_ID,
            WATER_ID,
            INFLOW_TEXT_ID,
            HEIGHT_TEXT_ID,
            SET_LEVEL_TEXT_ID,
            LEVEL_TEXT_ID,
            OUTFLOW_TEXT_ID,
        ] {
            let without: String = TEST_DIAGRAM
                .lines()
                .filter(|line| !line.contains(&format!("id=\"{id}\"")))
                .collect::<Vec<_>>()
                .join("\n");
            let diagram = SvgDiagram::from_str(without);
            let err = DiagramBinding::bind(&diagram).unwrap_err();
            match err {
                TankError::MissingElement(missing) => assert_eq!(missing, id),
                other => panic!("expected MissingElement for `{id}`, got {other:?}"),
            }
        }
    }

    #[test]
    fn bind_rejects_outline_without_numeric_attrs() {
        let broken = TEST_DIAGRAM.replace(r#"y="50" width="120" height="100""#, r#"y="50""#);
        let diagram = SvgDiagram::from_str(broken);
        let err = DiagramBinding::bind(&diagram).unwrap_err();
        assert!(matches!(err, TankError::Diagram(_)));
    }

    #[test]
    fn reference_geometry_reads_outline() {
        let diagram = SvgDiagram::from_str(TEST_DIAGRAM);
        let binding = DiagramBinding::bind(&diagram).unwrap();
        let reference = binding.reference_geometry(&diagram).unwrap();
        assert_eq!(reference.tank_pixel_height, 100.0);
        assert_eq!(reference.tank_pixel_y, 50.0);
    }

    #[test]
    fn set_fill_rewrites_only_the_water_rect() {
        let diagram = SvgDiagram::from_str(TEST_DIAGRAM);
        let binding = DiagramBinding::bind(&diagram).unwrap();
        let fill = FillGeometry {
            fill_pixel_height: 50.0,
            fill_pixel_y: 100.0,
        };
        let updated = binding.set_fill(diagram.svg(), &fill).unwrap();
        assert!(updated.contains(r#"<rect id="water" x="150" y="100" width="120" height="50""#));
        // The outline keeps its original box.
        assert!(updated.contains(r#"<rect id="tank" x="150" y="50" width="120" height="100""#));
    }

    #[test]
    fn set_fill_is_idempotent() {
        let diagram = SvgDiagram::from_str(TEST_DIAGRAM);
        let binding = DiagramBinding::bind(&diagram).unwrap();
        let fill = FillGeometry {
            fill_pixel_height: 75.0,
            fill_pixel_y: 75.0,
        };
        let once = binding.set_fill(diagram.svg(), &fill).unwrap();
        let twice = binding.set_fill(&once, &fill).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn set_label_rewrites_content() {
        let diagram = SvgDiagram::from_str(TEST_DIAGRAM);
        let binding = DiagramBinding::bind(&diagram).unwrap();
        let updated = binding
            .set_label(diagram.svg(), LabelId::Level, "Level: 46mm")
            .unwrap();
        assert!(updated.contains(r#"<text id="level_text" x="20" y="100">Level: 46mm</text>"#));
        let again = binding
            .set_label(&updated, LabelId::Level, "Level: 46mm")
            .unwrap();
        assert_eq!(updated, again);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SvgDiagram::load("/nonexistent/diagram.svg").unwrap_err();
        assert!(matches!(err, TankError::Diagram(_)));
    }
}
