//! Borders and shading shared by runs, tables and cells

use serde::{Deserialize, Serialize};

literal_enum! {
    /// Line style of a border (`w:val` on any border element)
    pub enum BorderType fallback Single {
        Nil => "nil",
        None => "none",
        Single => "single",
        Thick => "thick",
        Double => "double",
        Dotted => "dotted",
        Dashed => "dashed",
        DotDash => "dotDash",
        DotDotDash => "dotDotDash",
        Triple => "triple",
        ThinThickSmallGap => "thinThickSmallGap",
        ThickThinSmallGap => "thickThinSmallGap",
        ThinThickMediumGap => "thinThickMediumGap",
        ThickThinMediumGap => "thickThinMediumGap",
        ThinThickLargeGap => "thinThickLargeGap",
        ThickThinLargeGap => "thickThinLargeGap",
        Wave => "wave",
        DoubleWave => "doubleWave",
        DashSmallGap => "dashSmallGap",
        DashDotStroked => "dashDotStroked",
        ThreeDEmboss => "threeDEmboss",
        ThreeDEngrave => "threeDEngrave",
        Outset => "outset",
        Inset => "inset",
    }
}

literal_enum! {
    /// Shading pattern (`w:shd/@w:val`)
    pub enum ShdType fallback Clear {
        Nil => "nil",
        Clear => "clear",
        Solid => "solid",
        HorzStripe => "horzStripe",
        VertStripe => "vertStripe",
        ReverseDiagStripe => "reverseDiagStripe",
        DiagStripe => "diagStripe",
        HorzCross => "horzCross",
        DiagCross => "diagCross",
        Pct10 => "pct10",
        Pct25 => "pct25",
        Pct50 => "pct50",
    }
}

/// A single border edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    pub border_type: BorderType,
    /// Width in eighths of a point
    pub size: u32,
    /// Hex color or `auto`
    pub color: String,
    /// Spacing offset in points
    pub space: u32,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            border_type: BorderType::Single,
            size: 4,
            color: "auto".to_string(),
            space: 0,
        }
    }
}

impl Border {
    pub fn new(border_type: BorderType) -> Self {
        Self {
            border_type,
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_space(mut self, space: u32) -> Self {
        self.space = space;
        self
    }
}

/// Cell or paragraph shading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shading {
    pub shd_type: ShdType,
    pub color: String,
    pub fill: String,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            shd_type: ShdType::Clear,
            color: "auto".to_string(),
            fill: "FFFFFF".to_string(),
        }
    }
}

impl Shading {
    pub fn new(shd_type: ShdType, color: impl Into<String>, fill: impl Into<String>) -> Self {
        Self {
            shd_type,
            color: color.into(),
            fill: fill.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_border_literal_falls_back_to_single() {
        assert_eq!(BorderType::from_literal("zigzag"), BorderType::Single);
        assert_eq!(BorderType::from_literal(""), BorderType::Single);
        assert_eq!(BorderType::from_literal("double"), BorderType::Double);
    }

    #[test]
    fn test_border_literal_roundtrip() {
        assert_eq!(BorderType::ThreeDEmboss.as_str(), "threeDEmboss");
        assert_eq!(BorderType::from("threeDEmboss"), BorderType::ThreeDEmboss);
    }

    #[test]
    fn test_border_serializes_as_literal() {
        let border = Border::new(BorderType::Dashed).with_size(8).with_color("FF0000");
        let json = serde_json::to_value(&border).unwrap();
        assert_eq!(json["borderType"], "dashed");
        assert_eq!(json["size"], 8);
    }

    #[test]
    fn test_unknown_shading_literal() {
        assert_eq!(ShdType::from_literal("plaid"), ShdType::Clear);
    }
}
