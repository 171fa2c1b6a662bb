use std::collections::BTreeMap;

use crate::markers::NumericProps;

use super::edit::ElementTarget;

/// Equation currently open in the equation modal.
#[derive(Debug, Clone, PartialEq)]
pub struct EquationFocus {
    pub section_id: String,
    pub component_type: String,
    /// Latex as loaded; the key of any pending equation edit.
    pub original_latex: String,
    /// Latex currently shown, possibly already edited.
    pub latex: String,
    pub color_map: Option<BTreeMap<String, String>>,
}

/// Number scrubber currently open in the widget modal.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericWidgetFocus {
    pub target: ElementTarget,
    /// Props as loaded; the revert baseline of any pending widget edit.
    pub original_props: NumericProps,
    /// Props currently in effect.
    pub props: NumericProps,
    /// User-facing message from the last refused save.
    pub validation_message: Option<String>,
}

impl NumericWidgetFocus {
    pub fn new(target: ElementTarget, original_props: NumericProps, props: NumericProps) -> Self {
        Self {
            target,
            original_props,
            props,
            validation_message: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Minimum ({min}) must be less than maximum ({max})")]
    RangeInverted { min: f64, max: f64 },
    #[error("Step must be greater than zero")]
    NonPositiveStep { step: f64 },
    #[error("Default value ({value}) must be between {min} and {max}")]
    DefaultOutOfRange { value: f64, min: f64, max: f64 },
}

/// Checks scrubber constraints before a save reaches the ledger. NaN fails
/// every check.
pub fn validate_numeric_props(props: &NumericProps) -> Result<(), ValidationError> {
    if props.min.is_nan() || props.max.is_nan() || props.min >= props.max {
        return Err(ValidationError::RangeInverted {
            min: props.min,
            max: props.max,
        });
    }
    if props.step.is_nan() || props.step <= 0.0 {
        return Err(ValidationError::NonPositiveStep { step: props.step });
    }
    if !(props.min..=props.max).contains(&props.default_value) {
        return Err(ValidationError::DefaultOutOfRange {
            value: props.default_value,
            min: props.min,
            max: props.max,
        });
    }
    Ok(())
}
