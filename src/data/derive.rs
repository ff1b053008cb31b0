use crate::error::{RangeError, ValidationError};

use super::model::{DerivedFeatures, Field, RawInputs, ValidatedInputs};

// ---------------------------------------------------------------------------
// Pure derivations
// ---------------------------------------------------------------------------

/// Clay fraction: whatever the coarse fractions leave of 100%.
pub fn derive_clay(gravel: f64, sand: f64, silt: f64) -> Result<f64, ValidationError> {
    let clay = 100.0 - (gravel + sand + silt);
    if !clay.is_finite() {
        return Err(RangeError::NotFinite("Clay").into());
    }
    if clay < 0.0 {
        return Err(RangeError::ClayBelowZero(clay).into());
    }
    if clay > 100.0 {
        return Err(RangeError::ClayAboveHundred(clay).into());
    }
    Ok(clay)
}

/// Plasticity index. Absent limits give `Ok(None)`, which is "not
/// applicable" rather than an error.
pub fn derive_plasticity_index(
    liquid_limit: Option<f64>,
    plastic_limit: Option<f64>,
) -> Result<Option<f64>, ValidationError> {
    let (Some(ll), Some(pl)) = (liquid_limit, plastic_limit) else {
        return Ok(None);
    };
    let pi = ll - pl;
    if !pi.is_finite() {
        return Err(RangeError::NotFinite("Plasticity Index").into());
    }
    if pi < 0.0 {
        return Err(RangeError::NegativePlasticityIndex(pi).into());
    }
    Ok(Some(pi))
}

// ---------------------------------------------------------------------------
// Preview mode – live feedback while the form is incomplete
// ---------------------------------------------------------------------------

/// Clay from the raw form. Blank Gravel/Sand/Silt count as 0 here and only here.
pub fn preview_clay(raw: &RawInputs) -> Result<f64, ValidationError> {
    let gravel = raw.value(Field::Gravel)?.unwrap_or(0.0);
    let sand = raw.value(Field::Sand)?.unwrap_or(0.0);
    let silt = raw.value(Field::Silt)?.unwrap_or(0.0);
    derive_clay(gravel, sand, silt)
}

/// Plasticity index from the raw form. A blank limit gives `Ok(None)`,
/// even when the other limit is not a number.
pub fn preview_plasticity_index(raw: &RawInputs) -> Result<Option<f64>, ValidationError> {
    let ll = raw.value(Field::LiquidLimit);
    let pl = raw.value(Field::PlasticLimit);
    if matches!(ll, Ok(None)) || matches!(pl, Ok(None)) {
        return Ok(None);
    }
    derive_plasticity_index(ll?, pl?)
}

// ---------------------------------------------------------------------------
// Final mode – every input required
// ---------------------------------------------------------------------------

/// Derived features from fully validated inputs.
pub fn derive_features(inputs: &ValidatedInputs) -> Result<DerivedFeatures, ValidationError> {
    let clay = derive_clay(inputs.gravel, inputs.sand, inputs.silt)?;
    let plasticity_index =
        derive_plasticity_index(Some(inputs.liquid_limit), Some(inputs.plastic_limit))?
            .unwrap_or_default();
    Ok(DerivedFeatures {
        clay,
        plasticity_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clay_is_exact_complement() {
        let cases = [
            (0.0, 0.0, 0.0),
            (20.0, 30.0, 25.0),
            (33.3, 33.3, 33.4),
            (100.0, 0.0, 0.0),
            (12.5, 0.25, 61.0),
        ];
        for (g, s, si) in cases {
            assert_eq!(derive_clay(g, s, si), Ok(100.0 - (g + s + si)));
        }
    }

    #[test]
    fn clay_rejects_sum_over_hundred() {
        let err = derive_clay(50.0, 40.0, 20.0).unwrap_err();
        assert!(matches!(err, ValidationError::Range(_)));
        assert_eq!(
            err,
            ValidationError::Range(RangeError::ClayBelowZero(-10.0))
        );
    }

    #[test]
    fn clay_rejects_negative_fractions() {
        assert!(matches!(
            derive_clay(-10.0, 0.0, 0.0),
            Err(ValidationError::Range(RangeError::ClayAboveHundred(_)))
        ));
    }

    #[test]
    fn plasticity_index_cases() {
        assert_eq!(derive_plasticity_index(Some(50.0), Some(30.0)), Ok(Some(20.0)));
        assert_eq!(derive_plasticity_index(Some(30.0), Some(30.0)), Ok(Some(0.0)));
        assert_eq!(derive_plasticity_index(None, Some(30.0)), Ok(None));
        assert_eq!(derive_plasticity_index(Some(50.0), None), Ok(None));
        assert_eq!(
            derive_plasticity_index(Some(30.0), Some(50.0)),
            Err(ValidationError::Range(RangeError::NegativePlasticityIndex(-20.0)))
        );
    }

    #[test]
    fn overflowing_derivations_are_rejected() {
        assert_eq!(
            derive_plasticity_index(Some(1e308), Some(-1e308)),
            Err(ValidationError::Range(RangeError::NotFinite("Plasticity Index")))
        );
        assert_eq!(
            derive_clay(1e308, 1e308, 0.0),
            Err(ValidationError::Range(RangeError::NotFinite("Clay")))
        );
    }

    #[test]
    fn preview_clay_defaults_blank_fractions_to_zero() {
        let raw = RawInputs::from_pairs([(Field::Gravel, "40")]);
        assert_eq!(preview_clay(&raw), Ok(60.0));
        assert_eq!(preview_clay(&RawInputs::default()), Ok(100.0));
    }

    #[test]
    fn preview_clay_rejects_garbage_text() {
        let raw = RawInputs::from_pairs([(Field::Gravel, "40"), (Field::Sand, "x")]);
        assert!(matches!(
            preview_clay(&raw),
            Err(ValidationError::NotNumeric { field: Field::Sand, .. })
        ));
    }

    #[test]
    fn preview_plasticity_index_is_not_applicable_until_both_limits_exist() {
        let mut raw = RawInputs::from_pairs([(Field::LiquidLimit, "45")]);
        assert_eq!(preview_plasticity_index(&raw), Ok(None));
        raw.set(Field::PlasticLimit, "21.5");
        assert_eq!(preview_plasticity_index(&raw), Ok(Some(23.5)));
    }

    #[test]
    fn preview_plasticity_index_ignores_garbage_while_other_limit_is_blank() {
        let mut raw = RawInputs::from_pairs([(Field::PlasticLimit, "abc")]);
        assert_eq!(preview_plasticity_index(&raw), Ok(None));
        raw.set(Field::LiquidLimit, "40");
        assert!(matches!(
            preview_plasticity_index(&raw),
            Err(ValidationError::NotNumeric { field: Field::PlasticLimit, .. })
        ));
    }
}
