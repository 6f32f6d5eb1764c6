use crate::error::InvalidParameterError;

/// Basic reproduction number: the expected number of secondary infections
/// per infectious individual in a fully susceptible population of size
/// `population`, i.e. N * beta / gamma.
pub fn basic_reproduction_number(
    population: f64,
    beta: f64,
    gamma: f64,
) -> Result<f64, InvalidParameterError> {
    if !(gamma > 0.0) {
        return Err(InvalidParameterError::new(
            "gamma",
            "recovery rate must be positive",
        ));
    }
    Ok(population * beta / gamma)
}

#[cfg(test)]
mod test {
    use assert_approx_eq::assert_approx_eq;

    use crate::metrics::basic_reproduction_number;

    #[test]
    fn test_scenario_value() {
        let r0 =
            basic_reproduction_number(100_010.0, 50.0 / 30_000_000.0, 1.0 / 14.0).unwrap();
        assert_approx_eq!(r0, 2.3336, 1e-3);
    }

    #[test]
    fn test_rejects_nonpositive_gamma() {
        assert!(basic_reproduction_number(1000.0, 0.1, 0.0).is_err());
        assert!(basic_reproduction_number(1000.0, 0.1, -0.5).is_err());
    }
}
