//! Wire material property records and the immutable material registry.

use std::collections::HashMap;

use crate::errors::CoilError;
use crate::math::Scalar;

/// Physical constants of a winding material, expressed in SI units.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireMaterial {
    /// DC resistivity ρ in Ω·m, quoted at `resistivity_ref_temperature`.
    pub resistivity: Scalar,
    /// Temperature at which `resistivity` was measured, in °C.
    pub resistivity_ref_temperature: Scalar,
    /// Linear temperature coefficient of resistivity, per °C.
    pub resistivity_temp_coeff: Scalar,
    /// Relative magnetic permeability μᵣ of the wire.
    pub relative_permeability: Scalar,
    /// Linear thermal expansion coefficient, per °C.
    pub expansion_coeff: Scalar,
}

impl WireMaterial {
    /// Resistivity scaled to an operating temperature in °C, using the
    /// material's own reference temperature.
    #[must_use]
    pub fn resistivity_at(&self, temperature: Scalar) -> Scalar {
        let factor =
            1.0 + self.resistivity_temp_coeff * (temperature - self.resistivity_ref_temperature);
        self.resistivity * factor
    }
}

/// Immutable name → [`WireMaterial`] lookup, constructed explicitly and passed
/// into the analysis entry points that need it. Keeping the table an owned
/// value (rather than process-wide state) lets tests substitute their own
/// materials.
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    entries: HashMap<String, WireMaterial>,
}

impl MaterialRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the standard winding materials.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.insert(
            "Cu, annealed",
            WireMaterial {
                resistivity: 17.241e-9,
                resistivity_ref_temperature: 20.0,
                resistivity_temp_coeff: 0.00393,
                relative_permeability: 0.99999044,
                expansion_coeff: 16.6e-6,
            },
        );
        registry.insert(
            "Cu, hard-drawn",
            WireMaterial {
                resistivity: 17.71e-9,
                resistivity_ref_temperature: 20.0,
                resistivity_temp_coeff: 0.00382,
                relative_permeability: 0.99999044,
                expansion_coeff: 16.6e-6,
            },
        );
        registry.insert(
            "Ag",
            WireMaterial {
                resistivity: 15.9e-9,
                resistivity_ref_temperature: 20.0,
                resistivity_temp_coeff: 0.0038,
                relative_permeability: 0.9999738,
                expansion_coeff: 14.2e-6,
            },
        );
        registry.insert(
            "Al",
            WireMaterial {
                resistivity: 28.24e-9,
                resistivity_ref_temperature: 20.0,
                resistivity_temp_coeff: 0.0039,
                relative_permeability: 1.00002212,
                expansion_coeff: 22.2e-6,
            },
        );
        registry.insert(
            "Pt",
            WireMaterial {
                resistivity: 100e-9,
                resistivity_ref_temperature: 20.0,
                resistivity_temp_coeff: 0.003,
                relative_permeability: 1.0002617,
                expansion_coeff: 9.0e-6,
            },
        );
        registry.insert(
            "Zn",
            WireMaterial {
                // The source table literally reads "58 - 9" Ω·m here, almost
                // certainly a mangled exponent literal for ~59e-9. Kept
                // verbatim rather than guessed at; see the flagging test.
                resistivity: 49.0,
                resistivity_ref_temperature: 20.0,
                resistivity_temp_coeff: 0.0037,
                relative_permeability: 0.9999844,
                expansion_coeff: 29.7e-6,
            },
        );
        registry
    }

    /// Adds or replaces a named material.
    pub fn insert(&mut self, name: impl Into<String>, material: WireMaterial) {
        self.entries.insert(name.into(), material);
    }

    /// Looks up a material by name.
    ///
    /// # Errors
    ///
    /// Returns [`CoilError::UnknownMaterial`] for names not in the registry.
    pub fn get(&self, name: &str) -> Result<&WireMaterial, CoilError> {
        self.entries
            .get(name)
            .ok_or_else(|| CoilError::UnknownMaterial(name.to_owned()))
    }

    /// Registered material names, in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn lookup_known_material() {
        let registry = MaterialRegistry::standard();
        let cu = registry.get("Cu, annealed").expect("known material");
        assert_relative_eq!(cu.resistivity, 17.241e-9, epsilon = 1.0e-20);
        assert_relative_eq!(cu.resistivity_ref_temperature, 20.0);
    }

    #[test]
    fn lookup_unknown_material_fails() {
        let registry = MaterialRegistry::standard();
        let err = registry.get("unobtainium").unwrap_err();
        assert!(matches!(err, CoilError::UnknownMaterial(name) if name == "unobtainium"));
    }

    #[test]
    fn resistivity_scales_with_temperature() {
        let registry = MaterialRegistry::standard();
        let cu = registry.get("Cu, annealed").expect("known material");
        // Identity at the material's own reference temperature.
        assert_relative_eq!(cu.resistivity_at(20.0), cu.resistivity, epsilon = 1.0e-20);
        assert_relative_eq!(
            cu.resistivity_at(25.0),
            17.241e-9 * (1.0 + 0.00393 * 5.0),
            max_relative = 1.0e-12
        );
        assert!(cu.resistivity_at(30.0) > cu.resistivity_at(20.0));
    }

    #[test]
    fn zinc_entry_carries_suspect_absolute_resistivity() {
        // Quarantines the transcription defect in the zinc reference data: a
        // plausible metal resistivity is ~1e-8 Ω·m, this one is 49 Ω·m.
        let registry = MaterialRegistry::standard();
        let zn = registry.get("Zn").expect("known material");
        assert_relative_eq!(zn.resistivity, 49.0, epsilon = 1.0e-12);
        assert!(zn.resistivity > 1.0, "value is not a plausible metal resistivity");
    }

    #[test]
    fn custom_materials_can_shadow_standard_entries() {
        let mut registry = MaterialRegistry::standard();
        registry.insert(
            "Cu, annealed",
            WireMaterial {
                resistivity: 1.0e-9,
                resistivity_ref_temperature: 0.0,
                resistivity_temp_coeff: 0.0,
                relative_permeability: 1.0,
                expansion_coeff: 0.0,
            },
        );
        let cu = registry.get("Cu, annealed").expect("shadowed entry");
        assert_relative_eq!(cu.resistivity, 1.0e-9, epsilon = 1.0e-20);
    }
}
