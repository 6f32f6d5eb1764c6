use serde::Deserialize;

use crate::error::InvalidParameterError;
use crate::metrics;

/// Caller-supplied model configuration.
///
/// The transmission coefficient is derived rather than supplied directly:
/// beta = `contacts_per_day` * `transmission_probability`.
#[derive(Debug, Clone, Deserialize)]
pub struct Parameters {
    pub initial_susceptible: f64,
    pub initial_infected: f64,
    pub initial_recovered: f64,
    /// Average daily interactions per individual (alpha).
    pub contacts_per_day: f64,
    /// Per-interaction transmission probability, in [0, 1].
    pub transmission_probability: f64,
    /// Daily recovery fraction (gamma); 1/gamma is the mean infectious
    /// duration in days.
    pub recovery_rate: f64,
    /// Number of days to step; the trajectory has `sim_length + 1` entries.
    pub sim_length: usize,
    #[serde(default)]
    pub intervention: Option<Intervention>,
}

/// A one-time change of the contact process, applied from `day` onward.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Intervention {
    pub day: usize,
    pub contacts_per_day: f64,
    pub transmission_probability: f64,
}

impl Intervention {
    pub fn beta(&self) -> f64 {
        self.contacts_per_day * self.transmission_probability
    }
}

impl Parameters {
    /// Total population N. The model is closed, so this is conserved across
    /// the whole trajectory.
    pub fn population(&self) -> f64 {
        self.initial_susceptible + self.initial_infected + self.initial_recovered
    }

    pub fn beta(&self) -> f64 {
        self.contacts_per_day * self.transmission_probability
    }

    pub fn basic_reproduction_number(&self) -> Result<f64, InvalidParameterError> {
        metrics::basic_reproduction_number(self.population(), self.beta(), self.recovery_rate)
    }

    /// Checks every value against its domain. A day index past the end of
    /// the run is not rejected here; the run loop simply never reaches it.
    pub fn validate(&self) -> Result<(), InvalidParameterError> {
        if self.initial_susceptible < 0.0 {
            return Err(InvalidParameterError::new(
                "initial_susceptible",
                "population counts must be non-negative",
            ));
        }
        if self.initial_infected < 0.0 {
            return Err(InvalidParameterError::new(
                "initial_infected",
                "population counts must be non-negative",
            ));
        }
        if self.initial_recovered < 0.0 {
            return Err(InvalidParameterError::new(
                "initial_recovered",
                "population counts must be non-negative",
            ));
        }
        if self.population() == 0.0 {
            return Err(InvalidParameterError::new(
                "initial_susceptible",
                "total population must be positive",
            ));
        }
        check_rates(
            self.contacts_per_day,
            self.transmission_probability,
            "contacts_per_day",
            "transmission_probability",
        )?;
        if !(self.recovery_rate > 0.0) {
            return Err(InvalidParameterError::new(
                "recovery_rate",
                "recovery rate must be positive",
            ));
        }
        if let Some(intervention) = &self.intervention {
            check_rates(
                intervention.contacts_per_day,
                intervention.transmission_probability,
                "intervention.contacts_per_day",
                "intervention.transmission_probability",
            )?;
        }
        Ok(())
    }
}

fn check_rates(
    contacts_per_day: f64,
    transmission_probability: f64,
    contacts_name: &'static str,
    probability_name: &'static str,
) -> Result<(), InvalidParameterError> {
    if !(contacts_per_day > 0.0) {
        return Err(InvalidParameterError::new(
            contacts_name,
            "contact rate must be positive",
        ));
    }
    if !(0.0..=1.0).contains(&transmission_probability) {
        return Err(InvalidParameterError::new(
            probability_name,
            "probability must be in [0, 1]",
        ));
    }
    Ok(())
}
