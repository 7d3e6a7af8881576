//! Style requests, validated style values, and the layered style resolver
//!
//! A [`StyleSpec`] is what the caller asks for: every field is an optional,
//! unvalidated string. [`StyleResolver`] folds the layers of a request
//! (global, groups from outermost to innermost, then the element itself)
//! over a dialect default into a fully populated [`ResolvedStyle`],
//! rejecting values Graphviz would not understand and overrides the
//! dialect does not allow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

use super::error::{DiagramError, Result};

/// Requested styling for a diagram, group, entity or relation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    /// Outline color for nodes and clusters, line color for edges
    #[serde(default, alias = "color", skip_serializing_if = "Option::is_none")]
    pub line_color: Option<String>,
    /// Line color applied to nodes only; wins over `line_color` on the same layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_color: Option<String>,
    /// Line color applied to edges only; wins over `line_color` on the same layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_style: Option<String>,
    #[serde(default, alias = "font", skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_head: Option<String>,
}

impl StyleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    pub fn with_fill_color(mut self, color: impl Into<String>) -> Self {
        self.fill_color = Some(color.into());
        self
    }

    pub fn with_line_color(mut self, color: impl Into<String>) -> Self {
        self.line_color = Some(color.into());
        self
    }

    pub fn with_node_color(mut self, color: impl Into<String>) -> Self {
        self.node_color = Some(color.into());
        self
    }

    pub fn with_edge_color(mut self, color: impl Into<String>) -> Self {
        self.edge_color = Some(color.into());
        self
    }

    pub fn with_line_style(mut self, style: impl Into<String>) -> Self {
        self.line_style = Some(style.into());
        self
    }

    pub fn with_font_name(mut self, font: impl Into<String>) -> Self {
        self.font_name = Some(font.into());
        self
    }

    pub fn with_font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = Some(color.into());
        self
    }

    pub fn with_arrow_head(mut self, arrow: impl Into<String>) -> Self {
        self.arrow_head = Some(arrow.into());
        self
    }

    /// Returns true if no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check the syntax of every supplied value, whatever it applies to
    pub fn validate(&self) -> Result<()> {
        if let Some(shape) = &self.shape {
            shape.parse::<NodeShape>()?;
        }
        for (field, value) in [
            (StyleField::FillColor, &self.fill_color),
            (StyleField::LineColor, &self.line_color),
            (StyleField::NodeColor, &self.node_color),
            (StyleField::EdgeColor, &self.edge_color),
            (StyleField::FontColor, &self.font_color),
        ] {
            if let Some(value) = value {
                Color::parse_field(field, value)?;
            }
        }
        if let Some(style) = &self.line_style {
            style.parse::<LineStyle>()?;
        }
        if let Some(font) = &self.font_name {
            parse_font_name(font)?;
        }
        if let Some(arrow) = &self.arrow_head {
            arrow.parse::<ArrowShape>()?;
        }
        Ok(())
    }
}

/// The individual fields of a style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleField {
    Shape,
    FillColor,
    LineColor,
    NodeColor,
    EdgeColor,
    LineStyle,
    FontName,
    FontColor,
    ArrowHead,
}

impl fmt::Display for StyleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleField::Shape => write!(f, "shape"),
            StyleField::FillColor => write!(f, "fillColor"),
            StyleField::LineColor => write!(f, "lineColor"),
            StyleField::NodeColor => write!(f, "nodeColor"),
            StyleField::EdgeColor => write!(f, "edgeColor"),
            StyleField::LineStyle => write!(f, "lineStyle"),
            StyleField::FontName => write!(f, "fontName"),
            StyleField::FontColor => write!(f, "fontColor"),
            StyleField::ArrowHead => write!(f, "arrowHead"),
        }
    }
}

/// The kind of element a style is being resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTarget {
    Node,
    Edge,
    Cluster,
}

impl fmt::Display for StyleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleTarget::Node => write!(f, "node"),
            StyleTarget::Edge => write!(f, "edge"),
            StyleTarget::Cluster => write!(f, "cluster"),
        }
    }
}

/// Graphviz node shapes accepted in style requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum NodeShape {
    #[default]
    Box,
    /// Box with rounded corners (`shape=box` plus `style=rounded`)
    Rounded,
    Ellipse,
    Circle,
    DoubleCircle,
    Diamond,
    Hexagon,
    Octagon,
    Parallelogram,
    Trapezium,
    House,
    InvHouse,
    Triangle,
    Cylinder,
    Note,
    Tab,
    Folder,
    Box3d,
    Component,
    Square,
    Star,
    Egg,
    Underline,
    Plaintext,
    /// Shape-less node; used for HTML-table labels
    Plain,
    Point,
}

impl NodeShape {
    const ALL: [NodeShape; 26] = [
        NodeShape::Box,
        NodeShape::Rounded,
        NodeShape::Ellipse,
        NodeShape::Circle,
        NodeShape::DoubleCircle,
        NodeShape::Diamond,
        NodeShape::Hexagon,
        NodeShape::Octagon,
        NodeShape::Parallelogram,
        NodeShape::Trapezium,
        NodeShape::House,
        NodeShape::InvHouse,
        NodeShape::Triangle,
        NodeShape::Cylinder,
        NodeShape::Note,
        NodeShape::Tab,
        NodeShape::Folder,
        NodeShape::Box3d,
        NodeShape::Component,
        NodeShape::Square,
        NodeShape::Star,
        NodeShape::Egg,
        NodeShape::Underline,
        NodeShape::Plaintext,
        NodeShape::Plain,
        NodeShape::Point,
    ];

    /// Name accepted in style requests
    pub fn name(&self) -> &'static str {
        match self {
            NodeShape::Rounded => "rounded",
            other => other.dot_name(),
        }
    }

    /// Value of the Graphviz `shape` attribute
    pub fn dot_name(&self) -> &'static str {
        match self {
            NodeShape::Box | NodeShape::Rounded => "box",
            NodeShape::Ellipse => "ellipse",
            NodeShape::Circle => "circle",
            NodeShape::DoubleCircle => "doublecircle",
            NodeShape::Diamond => "diamond",
            NodeShape::Hexagon => "hexagon",
            NodeShape::Octagon => "octagon",
            NodeShape::Parallelogram => "parallelogram",
            NodeShape::Trapezium => "trapezium",
            NodeShape::House => "house",
            NodeShape::InvHouse => "invhouse",
            NodeShape::Triangle => "triangle",
            NodeShape::Cylinder => "cylinder",
            NodeShape::Note => "note",
            NodeShape::Tab => "tab",
            NodeShape::Folder => "folder",
            NodeShape::Box3d => "box3d",
            NodeShape::Component => "component",
            NodeShape::Square => "square",
            NodeShape::Star => "star",
            NodeShape::Egg => "egg",
            NodeShape::Underline => "underline",
            NodeShape::Plaintext => "plaintext",
            NodeShape::Plain => "plain",
            NodeShape::Point => "point",
        }
    }

    /// Returns true if the shape is drawn with rounded corners
    pub fn is_rounded(&self) -> bool {
        matches!(self, NodeShape::Rounded)
    }
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeShape {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        let alias = match wanted.as_str() {
            "rect" | "rectangle" => Some(NodeShape::Box),
            "oval" => Some(NodeShape::Ellipse),
            "none" => Some(NodeShape::Plaintext),
            "database" => Some(NodeShape::Cylinder),
            _ => None,
        };
        alias
            .or_else(|| {
                NodeShape::ALL
                    .iter()
                    .copied()
                    .find(|shape| shape.name() == wanted)
            })
            .ok_or_else(|| DiagramError::invalid_style("shape", s, "unknown shape"))
    }
}

/// Line styles for outlines and edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Bold,
    Invisible,
}

impl LineStyle {
    /// Value contributed to the Graphviz `style` attribute
    pub fn dot_name(&self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Dotted => "dotted",
            LineStyle::Bold => "bold",
            LineStyle::Invisible => "invis",
        }
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dot_name())
    }
}

impl FromStr for LineStyle {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "solid" => Ok(LineStyle::Solid),
            "dashed" => Ok(LineStyle::Dashed),
            "dotted" => Ok(LineStyle::Dotted),
            "bold" => Ok(LineStyle::Bold),
            "invis" | "invisible" => Ok(LineStyle::Invisible),
            _ => Err(DiagramError::invalid_style(
                "lineStyle",
                s,
                "expected solid, dashed, dotted, bold or invisible",
            )),
        }
    }
}

/// Arrow head shapes accepted in style requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ArrowShape {
    #[default]
    Normal,
    Inv,
    Dot,
    Odot,
    None,
    Empty,
    Diamond,
    Odiamond,
    Box,
    Obox,
    Open,
    Vee,
    Tee,
    Crow,
    Curve,
}

impl ArrowShape {
    const ALL: [ArrowShape; 15] = [
        ArrowShape::Normal,
        ArrowShape::Inv,
        ArrowShape::Dot,
        ArrowShape::Odot,
        ArrowShape::None,
        ArrowShape::Empty,
        ArrowShape::Diamond,
        ArrowShape::Odiamond,
        ArrowShape::Box,
        ArrowShape::Obox,
        ArrowShape::Open,
        ArrowShape::Vee,
        ArrowShape::Tee,
        ArrowShape::Crow,
        ArrowShape::Curve,
    ];

    /// Value of the Graphviz `arrowhead` attribute
    pub fn dot_name(&self) -> &'static str {
        match self {
            ArrowShape::Normal => "normal",
            ArrowShape::Inv => "inv",
            ArrowShape::Dot => "dot",
            ArrowShape::Odot => "odot",
            ArrowShape::None => "none",
            ArrowShape::Empty => "empty",
            ArrowShape::Diamond => "diamond",
            ArrowShape::Odiamond => "odiamond",
            ArrowShape::Box => "box",
            ArrowShape::Obox => "obox",
            ArrowShape::Open => "open",
            ArrowShape::Vee => "vee",
            ArrowShape::Tee => "tee",
            ArrowShape::Crow => "crow",
            ArrowShape::Curve => "curve",
        }
    }
}

impl fmt::Display for ArrowShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dot_name())
    }
}

impl FromStr for ArrowShape {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        let wanted = match wanted.as_str() {
            "onormal" | "triangle" | "hollow" => "empty",
            other => other,
        };
        ArrowShape::ALL
            .iter()
            .copied()
            .find(|arrow| arrow.dot_name() == wanted)
            .ok_or_else(|| DiagramError::invalid_style("arrowHead", s, "unknown arrow shape"))
    }
}

// Color names from the Graphviz X11 scheme (plus the SVG names Graphviz
// also resolves). Kept sorted for `binary_search`.
const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque",
    "black", "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue",
    "chartreuse", "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan",
    "darkblue", "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey",
    "darkkhaki", "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred",
    "darksalmon", "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey",
    "darkturquoise", "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey",
    "dodgerblue", "firebrick", "floralwhite", "forestgreen", "fuchsia", "gainsboro",
    "ghostwhite", "gold", "goldenrod", "gray", "green", "greenyellow", "grey", "honeydew",
    "hotpink", "indianred", "indigo", "ivory", "khaki", "lavender", "lavenderblush",
    "lawngreen", "lemonchiffon", "lightblue", "lightcoral", "lightcyan", "lightgoldenrod",
    "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey", "lightpink",
    "lightsalmon", "lightseagreen", "lightskyblue", "lightslateblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen",
    "magenta", "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin",
    "navajowhite", "navy", "navyblue", "oldlace", "olive", "olivedrab", "orange",
    "orangered", "orchid", "palegoldenrod", "palegreen", "paleturquoise", "palevioletred",
    "papayawhip", "peachpuff", "peru", "pink", "plum", "powderblue", "purple",
    "rebeccapurple", "red", "rosybrown", "royalblue", "saddlebrown", "salmon",
    "sandybrown", "seagreen", "seashell", "sienna", "silver", "skyblue", "slateblue",
    "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan", "teal",
    "thistle", "tomato", "transparent", "turquoise", "violet", "violetred", "webgray",
    "webgreen", "webgrey", "webmaroon", "webpurple", "wheat", "white", "whitesmoke",
    "x11gray", "x11green", "x11grey", "x11maroon", "x11purple", "yellow", "yellowgreen"
];

/// A color Graphviz accepts: an X11 name, `grayN`/`greyN`, or `#rgb`,
/// `#rrggbb`, `#rrggbbaa` hex
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    /// Parse a color, reporting failures against the given field
    pub fn parse_field(field: StyleField, value: &str) -> Result<Self> {
        let normalized = value.trim().to_lowercase();
        if let Some(hex) = normalized.strip_prefix('#') {
            let valid_len = matches!(hex.len(), 3 | 6 | 8);
            if valid_len && hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Ok(Self(normalized));
            }
            return Err(DiagramError::invalid_style(
                field.to_string(),
                value,
                "hex colors must be #rgb, #rrggbb or #rrggbbaa",
            ));
        }
        if NAMED_COLORS.binary_search(&normalized.as_str()).is_ok() || is_gray_level(&normalized)
        {
            return Ok(Self(normalized));
        }
        Err(DiagramError::invalid_style(
            field.to_string(),
            value,
            "unknown color name",
        ))
    }

    /// Create a color from a known-valid literal
    pub(crate) fn known(value: &'static str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_gray_level(name: &str) -> bool {
    let level = name
        .strip_prefix("gray")
        .or_else(|| name.strip_prefix("grey"));
    match level {
        Some(digits) if !digits.is_empty() && digits.len() <= 3 => digits
            .parse::<u8>()
            .map(|n| n <= 100)
            .unwrap_or(false),
        _ => false,
    }
}

fn parse_font_name(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DiagramError::invalid_style(
            "fontName",
            value,
            "font name is empty",
        ));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(DiagramError::invalid_style(
            "fontName",
            value,
            "font name contains control characters",
        ));
    }
    Ok(trimmed.to_string())
}

/// A fully populated style for one node, edge or cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub shape: NodeShape,
    pub fill_color: Color,
    pub line_color: Color,
    pub line_style: LineStyle,
    pub font_name: String,
    pub font_color: Color,
    pub arrow_head: ArrowShape,
    /// Whether the fill color is painted; set once any layer asks for a fill
    pub filled: bool,
}

impl ResolvedStyle {
    /// Black-on-white box with Helvetica text
    pub fn base() -> Self {
        Self {
            shape: NodeShape::Box,
            fill_color: Color::known("white"),
            line_color: Color::known("black"),
            line_style: LineStyle::Solid,
            font_name: "Helvetica".to_string(),
            font_color: Color::known("black"),
            arrow_head: ArrowShape::Normal,
            filled: false,
        }
    }

    pub fn with_shape(mut self, shape: NodeShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_line_color(mut self, color: &'static str) -> Self {
        self.line_color = Color::known(color);
        self
    }

    /// Paint the given fill color
    pub fn with_fill_color(mut self, color: &'static str) -> Self {
        self.fill_color = Color::known(color);
        self.filled = true;
        self
    }

    pub fn with_line_style(mut self, style: LineStyle) -> Self {
        self.line_style = style;
        self
    }

    pub fn with_arrow_head(mut self, arrow: ArrowShape) -> Self {
        self.arrow_head = arrow;
        self
    }
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self::base()
    }
}

#[derive(Debug, Clone)]
struct LockedField {
    target: StyleTarget,
    field: StyleField,
    reason: &'static str,
}

/// Which style overrides a dialect refuses
///
/// Dialects whose nodes or edges carry fixed structure (tables, UML
/// arrowheads) lock the corresponding fields.
#[derive(Debug, Clone, Default)]
pub struct StylePolicy {
    locked: Vec<LockedField>,
}

impl StylePolicy {
    /// A policy accepting every valid value
    pub fn open() -> Self {
        Self::default()
    }

    /// Refuse `field` on `target`, reporting `reason`
    pub fn lock(mut self, target: StyleTarget, field: StyleField, reason: &'static str) -> Self {
        self.locked.push(LockedField {
            target,
            field,
            reason,
        });
        self
    }

    /// Returns true if the field may be overridden on the target
    pub fn allows(&self, target: StyleTarget, field: StyleField) -> bool {
        !self
            .locked
            .iter()
            .any(|lock| lock.target == target && lock.field == field)
    }

    fn check(&self, target: StyleTarget, field: StyleField, value: &str) -> Result<()> {
        match self
            .locked
            .iter()
            .find(|lock| lock.target == target && lock.field == field)
        {
            Some(lock) => Err(DiagramError::invalid_style(
                field.to_string(),
                value,
                lock.reason,
            )),
            None => Ok(()),
        }
    }
}

/// Merges style layers by precedence into a [`ResolvedStyle`]
///
/// Precedence, lowest first: dialect default, global style, group styles
/// from outermost to innermost, local style.
#[derive(Debug, Clone, Default)]
pub struct StyleResolver {
    policy: StylePolicy,
}

impl StyleResolver {
    pub fn new(policy: StylePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &StylePolicy {
        &self.policy
    }

    /// Resolve one element's style
    ///
    /// Every supplied value in every layer is validated, including values a
    /// higher layer overrides.
    pub fn resolve(
        &self,
        default: &ResolvedStyle,
        global: &StyleSpec,
        groups: &[&StyleSpec],
        local: &StyleSpec,
        target: StyleTarget,
    ) -> Result<ResolvedStyle> {
        let mut layers = Vec::with_capacity(groups.len() + 2);
        layers.push(global);
        layers.extend_from_slice(groups);
        layers.push(local);
        self.resolve_layers(default, &layers, target)
    }

    /// Fold an ordered list of layers (lowest precedence first)
    pub fn resolve_layers(
        &self,
        default: &ResolvedStyle,
        layers: &[&StyleSpec],
        target: StyleTarget,
    ) -> Result<ResolvedStyle> {
        let mut resolved = default.clone();

        for layer in layers {
            layer.validate()?;

            if target == StyleTarget::Node {
                if let Some(shape) = &layer.shape {
                    self.policy.check(target, StyleField::Shape, shape)?;
                    resolved.shape = shape.parse()?;
                }
            }

            if target != StyleTarget::Edge {
                if let Some(fill) = &layer.fill_color {
                    self.policy.check(target, StyleField::FillColor, fill)?;
                    resolved.fill_color = Color::parse_field(StyleField::FillColor, fill)?;
                    resolved.filled = true;
                }
            }

            if let Some((field, color)) = layer_line_color(layer, target) {
                self.policy.check(target, field, color)?;
                resolved.line_color = Color::parse_field(field, color)?;
            }

            if let Some(style) = &layer.line_style {
                self.policy.check(target, StyleField::LineStyle, style)?;
                resolved.line_style = style.parse()?;
            }

            if let Some(font) = &layer.font_name {
                self.policy.check(target, StyleField::FontName, font)?;
                resolved.font_name = parse_font_name(font)?;
            }

            if let Some(color) = &layer.font_color {
                self.policy.check(target, StyleField::FontColor, color)?;
                resolved.font_color = Color::parse_field(StyleField::FontColor, color)?;
            }

            if target == StyleTarget::Edge {
                if let Some(arrow) = &layer.arrow_head {
                    self.policy.check(target, StyleField::ArrowHead, arrow)?;
                    resolved.arrow_head = arrow.parse()?;
                }
            }
        }

        trace!(%target, shape = %resolved.shape, line_color = %resolved.line_color, "Resolved style");
        Ok(resolved)
    }
}

// The element-specific color wins over the generic line color on one layer.
fn layer_line_color(layer: &StyleSpec, target: StyleTarget) -> Option<(StyleField, &str)> {
    let specific = match target {
        StyleTarget::Node => layer
            .node_color
            .as_deref()
            .map(|c| (StyleField::NodeColor, c)),
        StyleTarget::Edge => layer
            .edge_color
            .as_deref()
            .map(|c| (StyleField::EdgeColor, c)),
        StyleTarget::Cluster => None,
    };
    specific.or_else(|| {
        layer
            .line_color
            .as_deref()
            .map(|c| (StyleField::LineColor, c))
    })
}
