use std::fmt;

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Field – one of the six user-entered measurements
// ---------------------------------------------------------------------------

/// A raw soil-property input, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Gravel,
    Sand,
    Silt,
    LiquidLimit,
    PlasticLimit,
    CompactionEnergy,
}

impl Field {
    /// All fields in declaration order. This order drives the input form,
    /// the copy-all text and the first six slots of the feature vector.
    pub const ALL: [Field; 6] = [
        Field::Gravel,
        Field::Sand,
        Field::Silt,
        Field::LiquidLimit,
        Field::PlasticLimit,
        Field::CompactionEnergy,
    ];

    /// Label shown next to the entry, including the unit.
    pub fn label(self) -> &'static str {
        match self {
            Field::Gravel => "Gravel (%)",
            Field::Sand => "Sand (%)",
            Field::Silt => "Silt (%)",
            Field::LiquidLimit => "Liquid Limit (%)",
            Field::PlasticLimit => "Plastic Limit (%)",
            Field::CompactionEnergy => "Compaction Energy (kN-m/m³)",
        }
    }

    /// One-line hint shown under the label.
    pub fn description(self) -> &'static str {
        match self {
            Field::Gravel => "Gravel content as a percentage",
            Field::Sand => "Sand content as a percentage",
            Field::Silt => "Silt content as a percentage",
            Field::LiquidLimit => "Water content where soil flows",
            Field::PlasticLimit => "Water content where soil deforms plastically",
            Field::CompactionEnergy => "Energy applied during compaction",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RawInputs – text as typed by the user
// ---------------------------------------------------------------------------

/// The six entry texts, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
    texts: [String; 6],
}

impl RawInputs {
    /// Build from `(field, text)` pairs; fields not mentioned stay blank.
    #[cfg(test)]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (Field, &'a str)>) -> Self {
        let mut inputs = Self::default();
        for (field, text) in pairs {
            inputs.set(field, text);
        }
        inputs
    }

    pub fn text(&self, field: Field) -> &str {
        &self.texts[field.index()]
    }

    pub fn text_mut(&mut self, field: Field) -> &mut String {
        &mut self.texts[field.index()]
    }

    #[cfg(test)]
    pub fn set(&mut self, field: Field, text: impl Into<String>) {
        self.texts[field.index()] = text.into();
    }

    /// Parse one field. Blank text is `Ok(None)`; anything that is not a
    /// finite number is an error.
    pub fn value(&self, field: Field) -> Result<Option<f64>, ValidationError> {
        let text = self.text(field).trim();
        if text.is_empty() {
            return Ok(None);
        }
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(ValidationError::NotNumeric {
                field,
                text: text.to_string(),
            }),
        }
    }

    /// Parse one field, treating blank text as an error.
    pub fn required(&self, field: Field) -> Result<f64, ValidationError> {
        self.value(field)?.ok_or(ValidationError::Missing(field))
    }

    /// Iterate `(field, text)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.into_iter().map(move |f| (f, self.text(f)))
    }
}

// ---------------------------------------------------------------------------
// ValidatedInputs – all six fields present and numeric
// ---------------------------------------------------------------------------

/// Raw inputs after strict (final) validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedInputs {
    pub gravel: f64,
    pub sand: f64,
    pub silt: f64,
    pub liquid_limit: f64,
    pub plastic_limit: f64,
    pub compaction_energy: f64,
}

impl ValidatedInputs {
    /// Check every field in declaration order and stop at the first one
    /// that is blank or not numeric.
    pub fn from_raw(raw: &RawInputs) -> Result<Self, ValidationError> {
        let mut values = [0.0; 6];
        for field in Field::ALL {
            values[field.index()] = raw.required(field)?;
        }
        let [gravel, sand, silt, liquid_limit, plastic_limit, compaction_energy] = values;
        Ok(Self {
            gravel,
            sand,
            silt,
            liquid_limit,
            plastic_limit,
            compaction_energy,
        })
    }
}

// ---------------------------------------------------------------------------
// DerivedFeatures
// ---------------------------------------------------------------------------

/// Clay fraction and plasticity index computed from the raw inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    pub clay: f64,
    pub plasticity_index: f64,
}

// ---------------------------------------------------------------------------
// FeatureVector – the model input row
// ---------------------------------------------------------------------------

/// Number of features each model consumes.
pub const N_FEATURES: usize = 8;

/// Feature names in the order the models were trained on.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "Gravel",
    "Sand",
    "Silt",
    "LiquidLimit",
    "PlasticLimit",
    "CompactionEnergy",
    "PlasticityIndex",
    "Clay",
];

/// A single row in the fixed training-time order, see [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; N_FEATURES]);

impl FeatureVector {
    pub fn assemble(inputs: &ValidatedInputs, derived: &DerivedFeatures) -> Self {
        FeatureVector([
            inputs.gravel,
            inputs.sand,
            inputs.silt,
            inputs.liquid_limit,
            inputs.plastic_limit,
            inputs.compaction_energy,
            derived.plasticity_index,
            derived.clay,
        ])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Prediction – the two model outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Optimum moisture content, %.
    pub omc: f64,
    /// Maximum dry density, g/cm³.
    pub mdd: f64,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Predicted OMC: {:.2}%\nPredicted MDD: {:.2} g/cm³",
            self.omc, self.mdd
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_inputs() -> RawInputs {
        RawInputs::from_pairs([
            (Field::Gravel, "20"),
            (Field::Sand, "30"),
            (Field::Silt, "25"),
            (Field::LiquidLimit, "40"),
            (Field::PlasticLimit, "20"),
            (Field::CompactionEnergy, "600"),
        ])
    }

    #[test]
    fn blank_and_whitespace_are_missing() {
        let mut raw = full_inputs();
        raw.set(Field::Sand, "   ");
        assert_eq!(raw.value(Field::Sand), Ok(None));
        assert_eq!(
            raw.required(Field::Sand),
            Err(ValidationError::Missing(Field::Sand))
        );
    }

    #[test]
    fn non_finite_text_is_not_numeric() {
        for text in ["abc", "NaN", "inf", "-infinity", "1,5"] {
            let raw = RawInputs::from_pairs([(Field::Silt, text)]);
            assert!(
                matches!(
                    raw.value(Field::Silt),
                    Err(ValidationError::NotNumeric { field: Field::Silt, .. })
                ),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn strict_validation_names_first_missing_field() {
        let mut raw = full_inputs();
        raw.set(Field::PlasticLimit, "");
        raw.set(Field::CompactionEnergy, "");
        assert_eq!(
            ValidatedInputs::from_raw(&raw),
            Err(ValidationError::Missing(Field::PlasticLimit))
        );
    }

    #[test]
    fn feature_vector_follows_training_order() {
        let inputs = ValidatedInputs::from_raw(&full_inputs()).unwrap();
        let derived = DerivedFeatures {
            clay: 25.0,
            plasticity_index: 20.0,
        };
        let vector = FeatureVector::assemble(&inputs, &derived);
        assert_eq!(
            vector.as_slice(),
            &[20.0, 30.0, 25.0, 40.0, 20.0, 600.0, 20.0, 25.0]
        );
    }

    #[test]
    fn prediction_display_has_two_decimals_and_units() {
        let p = Prediction {
            omc: 14.456,
            mdd: 1.8,
        };
        assert_eq!(
            p.to_string(),
            "Predicted OMC: 14.46%\nPredicted MDD: 1.80 g/cm³"
        );
    }
}
