//! Shared helpers for resolving dimension constraints and hit testing.

use tessera_ui::{ComputedData, DimensionValue, Px, PxPosition};

fn clamp_wrap(min: Option<Px>, max: Option<Px>, measure: Px) -> Px {
    min.unwrap_or(Px(0))
        .max(measure)
        .min(max.unwrap_or(Px::MAX))
}

fn fill_value(min: Option<Px>, max: Option<Px>, measure: Px) -> Px {
    max.expect("Seems that you are trying to fill an infinite dimension, which is not allowed")
        .max(measure)
        .max(min.unwrap_or(Px(0)))
}

/// Turns a dimension behavior into a concrete extent, given the measured
/// content extent along the same axis.
pub(crate) fn resolve_dimension(dim: DimensionValue, measure: Px) -> Px {
    match dim {
        DimensionValue::Fixed(v) => v,
        DimensionValue::Wrap { min, max } => clamp_wrap(min, max, measure),
        DimensionValue::Fill { min, max } => fill_value(min, max, measure),
    }
}

/// Whether a component-relative cursor position lies inside the component.
pub(crate) fn cursor_within(size: ComputedData, position: PxPosition) -> bool {
    position.x >= Px::ZERO
        && position.x <= size.width
        && position.y >= Px::ZERO
        && position.y <= size.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_fixed_ignores_measurement() {
        assert_eq!(resolve_dimension(DimensionValue::Fixed(Px(120)), Px(999)), Px(120));
    }

    #[test]
    fn resolve_wrap_clamps_to_bounds() {
        let dim = DimensionValue::Wrap {
            min: Some(Px(50)),
            max: Some(Px(100)),
        };
        assert_eq!(resolve_dimension(dim, Px(10)), Px(50));
        assert_eq!(resolve_dimension(dim, Px(70)), Px(70));
        assert_eq!(resolve_dimension(dim, Px(400)), Px(100));
    }

    #[test]
    fn resolve_fill_expands_to_max() {
        let dim = DimensionValue::Fill {
            min: None,
            max: Some(Px(300)),
        };
        assert_eq!(resolve_dimension(dim, Px(40)), Px(300));
    }

    #[test]
    fn cursor_bounds_check() {
        let size = ComputedData {
            width: Px(100),
            height: Px(40),
        };
        assert!(cursor_within(size, PxPosition::new(Px(0), Px(0))));
        assert!(cursor_within(size, PxPosition::new(Px(99), Px(39))));
        assert!(!cursor_within(size, PxPosition::new(Px(101), Px(20))));
        assert!(!cursor_within(size, PxPosition::new(Px(50), Px(41))));
    }
}
