//! The packed measurement constraint a parent hands to a child, and the
//! arithmetic that turns constraints and desired sizes into measured sizes.

use std::fmt;

use crate::params::Dimension;

/// Bit position of the mode in a packed spec.
const MODE_SHIFT: u32 = 30;
/// Mask over the mode bits.
const MODE_MASK: u32 = 0x3 << MODE_SHIFT;
/// Mask over the size bits.
const SIZE_MASK: u32 = !MODE_MASK;

/// Bits of a measured size that carry the size itself. Measured sizes are
/// limited to 24 bits even though specs carry 30; larger sizes clamp.
pub const MEASURED_SIZE_MASK: u32 = 0x00ff_ffff;
/// Bits of a measured size that carry state flags.
pub const MEASURED_STATE_MASK: u32 = 0xff00_0000;
/// Shift that moves height state bits into the low byte of a combined state.
pub const MEASURED_HEIGHT_STATE_SHIFT: u32 = 16;
/// State flag: the view wanted more space than the constraint allowed.
pub const MEASURED_STATE_TOO_SMALL: u32 = 0x0100_0000;

/// How the size in a [`MeasureSpec`] constrains the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// No constraint; the child may be any size.
    Unspecified,
    /// The child must be exactly this size.
    Exactly,
    /// The child may be at most this size.
    AtMost,
}

impl Mode {
    /// Packed representation of this mode.
    const fn bits(self) -> u32 {
        match self {
            Self::Unspecified => 0,
            Self::Exactly => 1 << MODE_SHIFT,
            Self::AtMost => 2 << MODE_SHIFT,
        }
    }
}

/// A measurement constraint packed into 32 bits: a 2-bit mode in the high
/// bits and a 30-bit size below it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MeasureSpec(u32);

impl MeasureSpec {
    /// The largest size a spec can carry.
    pub const MAX_SIZE: u32 = SIZE_MASK;

    /// Pack a size and mode. Sizes wider than 30 bits are truncated.
    pub const fn make(size: u32, mode: Mode) -> Self {
        Self((size & SIZE_MASK) | mode.bits())
    }

    /// Shorthand for an `Exactly` spec.
    pub const fn exactly(size: u32) -> Self {
        Self::make(size, Mode::Exactly)
    }

    /// Shorthand for an `AtMost` spec.
    pub const fn at_most(size: u32) -> Self {
        Self::make(size, Mode::AtMost)
    }

    /// An `Unspecified` spec with no size.
    pub const fn unspecified() -> Self {
        Self::make(0, Mode::Unspecified)
    }

    /// Rebuild a spec from its packed bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The packed bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// The mode. The reserved fourth mode value decodes as `AtMost`.
    pub const fn mode(self) -> Mode {
        match (self.0 & MODE_MASK) >> MODE_SHIFT {
            0 => Mode::Unspecified,
            1 => Mode::Exactly,
            _ => Mode::AtMost,
        }
    }

    /// The size.
    pub const fn size(self) -> u32 {
        self.0 & SIZE_MASK
    }

    /// Shift the size by `delta` while keeping the mode. An unspecified spec
    /// always comes back as size zero, and negative results clamp to zero.
    pub fn adjust(self, delta: i32) -> Self {
        let mode = self.mode();
        if mode == Mode::Unspecified {
            return Self::make(0, Mode::Unspecified);
        }
        let mut size = i64::from(self.size()) + i64::from(delta);
        if size < 0 {
            tracing::warn!("measure spec adjust: new size would be negative ({size}), spec {self}, delta {delta}");
            size = 0;
        }
        Self::make(size.min(i64::from(SIZE_MASK)) as u32, mode)
    }
}

impl fmt::Display for MeasureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode() {
            Mode::Unspecified => "UNSPECIFIED",
            Mode::Exactly => "EXACTLY",
            Mode::AtMost => "AT_MOST",
        };
        write!(f, "{mode} {}", self.size())
    }
}

impl fmt::Debug for MeasureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MeasureSpec({self})")
    }
}

/// Pick the size a view reports when it has no opinion of its own: the
/// constraint for `Exactly` and `AtMost`, otherwise `size`. Clamped to
/// [`MEASURED_SIZE_MASK`].
pub fn get_default_size(size: u32, spec: MeasureSpec) -> u32 {
    let size = match spec.mode() {
        Mode::Unspecified => size,
        Mode::AtMost | Mode::Exactly => spec.size(),
    };
    size.min(MEASURED_SIZE_MASK)
}

/// Reconcile a desired size with a constraint. The result is a measured
/// size whose high byte carries state: `MEASURED_STATE_TOO_SMALL` is set when
/// an `AtMost` constraint had to cut the desired size, and `child_state`
/// bits are merged in. Both sizes clamp to [`MEASURED_SIZE_MASK`] first so
/// they never spill into the state byte.
pub fn resolve_size_and_state(size: u32, spec: MeasureSpec, child_state: u32) -> u32 {
    let size = size.min(MEASURED_SIZE_MASK);
    let spec_size = spec.size().min(MEASURED_SIZE_MASK);
    let result = match spec.mode() {
        Mode::AtMost if spec_size < size => spec_size | MEASURED_STATE_TOO_SMALL,
        Mode::AtMost | Mode::Unspecified => size,
        Mode::Exactly => spec_size,
    };
    result | (child_state & MEASURED_STATE_MASK)
}

/// [`resolve_size_and_state`] with the state bits stripped.
pub fn resolve_size(size: u32, spec: MeasureSpec) -> u32 {
    resolve_size_and_state(size, spec, 0) & MEASURED_SIZE_MASK
}

/// Merge two combined measured states.
pub fn combine_measured_states(cur: u32, new: u32) -> u32 {
    cur | new
}

/// Derive the spec for one child dimension from the parent's spec, the space
/// the parent has already consumed (padding, margins, siblings), and the
/// child's requested dimension.
///
/// | parent \ child | exact n      | match parent   | wrap content   |
/// |----------------|--------------|----------------|----------------|
/// | Exactly s      | Exactly n    | Exactly avail  | AtMost avail   |
/// | AtMost s       | Exactly n    | AtMost avail   | AtMost avail   |
/// | Unspecified    | Exactly n    | Unspecified 0  | Unspecified 0  |
///
/// `avail` is `s - padding`, floored at zero.
pub fn get_child_measure_spec(spec: MeasureSpec, padding: i32, child: Dimension) -> MeasureSpec {
    let avail = (i64::from(spec.size()) - i64::from(padding)).clamp(0, i64::from(SIZE_MASK)) as u32;
    match (spec.mode(), child) {
        (_, Dimension::Px(n)) => MeasureSpec::exactly(n),
        (Mode::Exactly, Dimension::MatchParent) => MeasureSpec::exactly(avail),
        (Mode::Exactly | Mode::AtMost, Dimension::WrapContent)
        | (Mode::AtMost, Dimension::MatchParent) => MeasureSpec::at_most(avail),
        (Mode::Unspecified, Dimension::MatchParent | Dimension::WrapContent) => {
            MeasureSpec::unspecified()
        }
    }
}
