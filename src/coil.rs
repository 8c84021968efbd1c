//! Coil configuration and the temperature-adjustment layer.
//!
//! All temperature-dependent quantities are pure functions of the raw
//! as-specified geometry plus the temperature context; nothing derived is
//! cached, so changing the operating temperature alone changes every derived
//! value consistently.

use std::f64::consts::PI;
use std::fmt;

use crate::constants::DEFAULT_TEMPERATURE;
use crate::errors::CoilError;
use crate::materials::WireMaterial;
use crate::math::Scalar;

/// Thermally expanded wire diameter: `d0 · (1 + α·ΔT)`.
#[must_use]
pub fn expanded_wire_diameter(
    raw_wire_diameter: Scalar,
    expansion_coeff: Scalar,
    delta_t: Scalar,
) -> Scalar {
    raw_wire_diameter * (1.0 + expansion_coeff * delta_t)
}

/// Thermally expanded former diameter.
///
/// The wire length along the helix (hypotenuse of axial length and total
/// circumference) expands with temperature; the new former diameter is
/// back-solved from the expanded helix net of the independently expanded wire
/// diameter. This couples axial and radial expansion rather than scaling the
/// two diameters independently.
#[must_use]
pub fn expanded_former_diameter(
    raw_former_diameter: Scalar,
    raw_wire_diameter: Scalar,
    turns: Scalar,
    length: Scalar,
    expansion_coeff: Scalar,
    delta_t: Scalar,
) -> Scalar {
    let coil_diameter = raw_former_diameter + raw_wire_diameter;
    let wire_len_squared = length * length + (PI * turns * coil_diameter).powi(2);
    let scale =
        1.0 + delta_t * expansion_coeff * wire_len_squared / (wire_len_squared - length * length);
    coil_diameter * scale - expanded_wire_diameter(raw_wire_diameter, expansion_coeff, delta_t)
}

/// Complete description of a single-layer helical round-wire coil at an
/// operating point.
///
/// Geometry fields hold the raw, as-specified values; the `expanded_*` and
/// `effective_resistivity` accessors apply the temperature-adjustment layer
/// relative to `reference_temperature`, which is frozen when the
/// configuration is constructed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CoilConfig {
    /// Number of turns N (> 0, and away from the Grover–Knight singularity
    /// at 0.0246).
    pub turns: Scalar,
    /// Raw former (support tube) diameter in meters.
    pub former_diameter: Scalar,
    /// Raw wire diameter in meters.
    pub wire_diameter: Scalar,
    /// Coil length in meters.
    pub length: Scalar,
    /// Operating frequency in hertz.
    pub frequency: Scalar,
    /// Operating temperature in °C.
    pub temperature: Scalar,
    /// Temperature the raw geometry was specified at, frozen at construction.
    pub reference_temperature: Scalar,
    /// Relative permeability of the core (1 for air).
    pub core_permeability: Scalar,
    /// Winding material constants.
    pub material: WireMaterial,
}

impl CoilConfig {
    /// Creates a configuration at the default operating temperature with an
    /// air core. The reference temperature is frozen to the same default.
    #[must_use]
    pub fn new(
        turns: Scalar,
        former_diameter: Scalar,
        wire_diameter: Scalar,
        length: Scalar,
        frequency: Scalar,
        material: WireMaterial,
    ) -> Self {
        Self {
            turns,
            former_diameter,
            wire_diameter,
            length,
            frequency,
            temperature: DEFAULT_TEMPERATURE,
            reference_temperature: DEFAULT_TEMPERATURE,
            core_permeability: 1.0,
            material,
        }
    }

    /// Sets the operating temperature, leaving the frozen reference alone.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: Scalar) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the core relative permeability.
    #[must_use]
    pub const fn with_core_permeability(mut self, mu_r_core: Scalar) -> Self {
        self.core_permeability = mu_r_core;
        self
    }

    /// ΔT between the operating point and the frozen reference.
    #[must_use]
    pub fn delta_t(&self) -> Scalar {
        self.temperature - self.reference_temperature
    }

    /// Wire diameter at the operating temperature.
    #[must_use]
    pub fn expanded_wire_diameter(&self) -> Scalar {
        expanded_wire_diameter(
            self.wire_diameter,
            self.material.expansion_coeff,
            self.delta_t(),
        )
    }

    /// Former diameter at the operating temperature.
    #[must_use]
    pub fn expanded_former_diameter(&self) -> Scalar {
        expanded_former_diameter(
            self.former_diameter,
            self.wire_diameter,
            self.turns,
            self.length,
            self.material.expansion_coeff,
            self.delta_t(),
        )
    }

    /// Wire resistivity at the operating temperature. Note the scaling is
    /// relative to the material's own resistivity reference temperature, not
    /// the coil's frozen reference.
    #[must_use]
    pub fn effective_resistivity(&self) -> Scalar {
        self.material.resistivity_at(self.temperature)
    }

    /// Free gap between adjacent turns at the operating temperature.
    #[must_use]
    pub fn turn_spacing(&self) -> Scalar {
        self.length / self.turns - self.expanded_wire_diameter()
    }
}

/// The closed set of configuration inputs the tuner and sensitivity analyzer
/// may vary. An explicit dispatch table instead of by-name field mutation, so
/// unrecognized names are rejected at the boundary.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TunableField {
    /// Turn count N.
    Turns,
    /// Raw former diameter.
    FormerDiameter,
    /// Raw wire diameter.
    WireDiameter,
    /// Coil length.
    Length,
    /// Operating frequency.
    Frequency,
    /// Operating temperature.
    Temperature,
}

impl TunableField {
    /// Reads the field's current value.
    #[must_use]
    pub const fn get(self, config: &CoilConfig) -> Scalar {
        match self {
            Self::Turns => config.turns,
            Self::FormerDiameter => config.former_diameter,
            Self::WireDiameter => config.wire_diameter,
            Self::Length => config.length,
            Self::Frequency => config.frequency,
            Self::Temperature => config.temperature,
        }
    }

    /// Writes a new value into the field.
    pub fn set(self, config: &mut CoilConfig, value: Scalar) {
        match self {
            Self::Turns => config.turns = value,
            Self::FormerDiameter => config.former_diameter = value,
            Self::WireDiameter => config.wire_diameter = value,
            Self::Length => config.length = value,
            Self::Frequency => config.frequency = value,
            Self::Temperature => config.temperature = value,
        }
    }

    /// Resolves a field name, rejecting anything outside the closed set.
    ///
    /// # Errors
    ///
    /// Returns [`CoilError::InvalidConfig`] for unrecognized names.
    pub fn parse(name: &str) -> Result<Self, CoilError> {
        match name {
            "turns" => Ok(Self::Turns),
            "former_diameter" => Ok(Self::FormerDiameter),
            "wire_diameter" => Ok(Self::WireDiameter),
            "length" => Ok(Self::Length),
            "frequency" => Ok(Self::Frequency),
            "temperature" => Ok(Self::Temperature),
            other => Err(CoilError::InvalidConfig(format!(
                "not a tunable field: {other:?}"
            ))),
        }
    }
}

impl fmt::Display for TunableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Turns => "turns",
            Self::FormerDiameter => "former_diameter",
            Self::WireDiameter => "wire_diameter",
            Self::Length => "length",
            Self::Frequency => "frequency",
            Self::Temperature => "temperature",
        };
        f.write_str(name)
    }
}
