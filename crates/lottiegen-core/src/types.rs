use serde::{Deserialize, Serialize};

/// Blend mode applied when a layer is composited onto what is behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BlendMode {
    /// Standard alpha blending. The identity blend mode.
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    Add,
    HardMix,
}

impl BlendMode {
    /// True for the mode that leaves compositing unchanged.
    pub fn is_identity(&self) -> bool {
        *self == BlendMode::Normal
    }
}

/// The language a translation unit is emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    /// C#, one source file.
    #[default]
    CSharp,
    /// C++/WinRT, header plus implementation.
    CppWinrt,
    /// C++/CX, header plus implementation.
    Cx,
}

impl TargetLanguage {
    /// True when the target splits declarations (header) from definitions.
    pub fn is_split(&self) -> bool {
        !matches!(self, TargetLanguage::CSharp)
    }
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::CSharp => write!(f, "csharp"),
            TargetLanguage::CppWinrt => write!(f, "cppwinrt"),
            TargetLanguage::Cx => write!(f, "cx"),
        }
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csharp" | "cs" => Ok(TargetLanguage::CSharp),
            "cppwinrt" | "cpp" => Ok(TargetLanguage::CppWinrt),
            "cx" => Ok(TargetLanguage::Cx),
            other => Err(format!("unknown target language '{other}'")),
        }
    }
}
