//! Routing modes.

use std::str::FromStr;

/// How connected sources are wired to the output.
///
/// `EqualPower` and `Hrtf` are recognized but route exactly like `Default`.
///
/// # Example
///
/// ```
/// use audio_routing::{RoutingMode, Wiring};
///
/// let mode: RoutingMode = "stereopanner".parse().unwrap();
/// assert_eq!(mode.wiring(), Wiring::ThroughPan);
/// assert_eq!("hrtf".parse::<RoutingMode>().unwrap().wiring(), Wiring::Direct);
/// assert!("surround".parse::<RoutingMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoutingMode {
    /// Sources connect straight to the output.
    #[default]
    Default,
    /// Sources connect through the shared stereo-pan node.
    StereoPanner,
    /// Equal-power panning. Routes like `Default`.
    EqualPower,
    /// Head-related spatialization. Routes like `Default`.
    Hrtf,
}

impl RoutingMode {
    /// Every mode, in the order a selector would list them.
    pub const ALL: [RoutingMode; 4] = [
        Self::Default,
        Self::StereoPanner,
        Self::EqualPower,
        Self::Hrtf,
    ];

    /// Returns the wire name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::StereoPanner => "stereopanner",
            Self::EqualPower => "equalpower",
            Self::Hrtf => "hrtf",
        }
    }

    /// Returns how a source must be wired in this mode.
    pub fn wiring(self) -> Wiring {
        match self {
            Self::StereoPanner => Wiring::ThroughPan,
            Self::Default | Self::EqualPower | Self::Hrtf => Wiring::Direct,
        }
    }

    /// Returns true if sources go through the pan node.
    pub fn uses_pan_node(self) -> bool {
        self.wiring() == Wiring::ThroughPan
    }
}

impl std::fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mode name that isn't one of the four known modes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized routing mode '{requested}'")]
pub struct UnrecognizedMode {
    /// The name that was requested.
    pub requested: String,
}

impl FromStr for RoutingMode {
    type Err = UnrecognizedMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnrecognizedMode {
                requested: s.to_string(),
            })
    }
}

/// Where a source's output currently goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wiring {
    /// Connected straight to the output.
    Direct,
    /// Connected to the pan node, which feeds the output.
    ThroughPan,
    /// Not reaching the output.
    Unrouted,
    /// Reaching the output both directly and through the pan node.
    Conflicting,
}

impl std::fmt::Display for Wiring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Direct => "direct",
            Self::ThroughPan => "through-pan",
            Self::Unrouted => "unrouted",
            Self::Conflicting => "conflicting",
        };
        f.write_str(name)
    }
}
