use log::debug;

use crate::error::InvalidParameterError;
use crate::output::SirOutput;
use crate::parameters::{Intervention, Parameters};

pub struct SirModel {}

impl SirModel {
    /// Runs the full simulation: validates the parameters, then steps
    /// `sim_length` days from the day-0 snapshot, applying the configured
    /// intervention if one exists. Deterministic: identical parameters
    /// produce a bit-for-bit identical trajectory.
    pub fn simulate(parameters: &Parameters) -> Result<SirOutput, InvalidParameterError> {
        let mut state = SimulationState::initialize(parameters)?;
        state.run(parameters.sim_length, parameters.intervention);
        Ok(state.into_output())
    }
}

/// Running state of a single simulation: the current day index, the three
/// compartment counts, the active rate coefficients, and the trajectory
/// accumulated so far.
pub struct SimulationState {
    day: usize,
    susceptible: f64,
    infected: f64,
    recovered: f64,
    beta: f64,
    gamma: f64,
    population: f64,
    output: SirOutput,
}

impl SimulationState {
    /// Validates the parameter domains, computes N and beta, and records the
    /// day-0 snapshot.
    pub fn initialize(parameters: &Parameters) -> Result<SimulationState, InvalidParameterError> {
        parameters.validate()?;
        let mut output = SirOutput::with_capacity(parameters.sim_length + 1);
        output.push(
            parameters.initial_susceptible,
            parameters.initial_infected,
            parameters.initial_recovered,
        );
        Ok(SimulationState {
            day: 0,
            susceptible: parameters.initial_susceptible,
            infected: parameters.initial_infected,
            recovered: parameters.initial_recovered,
            beta: parameters.beta(),
            gamma: parameters.recovery_rate,
            population: parameters.population(),
            output,
        })
    }

    /// Advances the simulation by one day with a forward-Euler update at
    /// unit step size:
    ///
    /// ```text
    /// dS = -beta * I * S
    /// dI =  beta * I * S - gamma * I
    /// dR =  gamma * I
    /// ```
    ///
    /// No clamping is applied: under extreme parameter choices the
    /// discretization can push S or I below zero, and the trajectory records
    /// that faithfully.
    pub fn step(&mut self) {
        let new_infections = self.beta * self.infected * self.susceptible;
        let recoveries = self.gamma * self.infected;
        self.susceptible -= new_infections;
        self.infected += new_infections - recoveries;
        self.recovered += recoveries;
        self.day += 1;
        self.output
            .push(self.susceptible, self.infected, self.recovered);
    }

    /// Recomputes beta from a changed contact process. The new value holds
    /// for every subsequent step.
    pub fn apply_intervention(&mut self, intervention: &Intervention) {
        self.beta = intervention.beta();
        debug!(
            "day {}: intervention applied, beta = {:e}",
            self.day, self.beta
        );
    }

    /// Steps until `total_days` days have been simulated. Before each step,
    /// a still-pending intervention whose day has been reached is applied;
    /// a day at or past the end of the run is never reached and leaves the
    /// trajectory untouched.
    pub fn run(&mut self, total_days: usize, intervention: Option<Intervention>) {
        let mut pending = intervention;
        while self.day < total_days {
            if let Some(intervention) = pending
                && self.day >= intervention.day
            {
                self.apply_intervention(&intervention);
                pending = None;
            }
            self.step();
        }
    }

    pub fn day(&self) -> usize {
        self.day
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn population(&self) -> f64 {
        self.population
    }

    pub fn output(&self) -> &SirOutput {
        &self.output
    }

    pub fn into_output(self) -> SirOutput {
        self.output
    }
}

#[cfg(test)]
mod test {
    use assert_approx_eq::assert_approx_eq;

    use crate::parameters::{Intervention, Parameters};
    use crate::sir::{SimulationState, SirModel};

    fn scenario_a() -> Parameters {
        Parameters {
            initial_susceptible: 100_000.0,
            initial_infected: 10.0,
            initial_recovered: 0.0,
            contacts_per_day: 50.0,
            transmission_probability: 1.0 / 30_000_000.0,
            recovery_rate: 1.0 / 14.0,
            sim_length: 200,
            intervention: None,
        }
    }

    fn scenario_b() -> Parameters {
        let mut parameters = scenario_a();
        parameters.intervention = Some(Intervention {
            day: 60,
            contacts_per_day: 30.0,
            transmission_probability: 1.0 / 30_000_000.0,
        });
        parameters
    }

    fn peak_day(infected: &[f64]) -> usize {
        let mut peak = 0;
        for (day, value) in infected.iter().enumerate() {
            if *value > infected[peak] {
                peak = day;
            }
        }
        peak
    }

    #[test]
    fn test_trajectory_length() {
        let output = SirModel::simulate(&scenario_a()).unwrap();
        assert_eq!(output.len(), 201);
    }

    #[test]
    fn test_single_step_matches_update_rule() {
        let parameters = scenario_a();
        let mut state = SimulationState::initialize(&parameters).unwrap();
        state.step();

        let beta = 50.0 * (1.0 / 30_000_000.0);
        let gamma = 1.0 / 14.0;
        let new_infections = beta * 10.0 * 100_000.0;
        let recoveries = gamma * 10.0;
        assert_eq!(state.day(), 1);
        assert_eq!(
            state.output().snapshot(1),
            Some((
                100_000.0 - new_infections,
                10.0 + (new_infections - recoveries),
                recoveries
            ))
        );
        // Day 0 stays the untouched initial condition.
        assert_eq!(state.output().snapshot(0), Some((100_000.0, 10.0, 0.0)));
    }

    #[test]
    fn test_conservation() {
        let parameters = scenario_a();
        let n = parameters.population();
        let output = SirModel::simulate(&parameters).unwrap();
        for day in 0..output.len() {
            let total = output.susceptible[day] + output.infected[day] + output.recovered[day];
            assert_approx_eq!(total, n, 1e-6 * n);
        }
    }

    #[test]
    fn test_monotone_compartments() {
        let output = SirModel::simulate(&scenario_a()).unwrap();
        for day in 1..output.len() {
            assert!(output.susceptible[day] <= output.susceptible[day - 1]);
            assert!(output.recovered[day] >= output.recovered[day - 1]);
        }
    }

    #[test]
    fn test_deterministic() {
        let first = SirModel::simulate(&scenario_a()).unwrap();
        let second = SirModel::simulate(&scenario_a()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_infections_fixed_point() {
        let mut parameters = scenario_a();
        parameters.initial_infected = 0.0;
        parameters.initial_recovered = 5.0;
        let output = SirModel::simulate(&parameters).unwrap();
        for day in 0..output.len() {
            assert_eq!(output.snapshot(day), Some((100_000.0, 0.0, 5.0)));
        }
    }

    #[test]
    fn test_epidemic_curve_shape() {
        let output = SirModel::simulate(&scenario_a()).unwrap();
        let peak = peak_day(&output.infected);
        // R0 ~ 2.33: the wave peaks in the middle of the run and burns out.
        assert!(peak > 30 && peak < 130, "peak on day {peak}");
        assert!(output.infected[peak] > 5_000.0);
        assert!(output.infected[200] < output.infected[peak] / 4.0);
        assert!(output.susceptible[200] < 0.3 * 100_000.0);
    }

    #[test]
    fn test_intervention_flattens_curve() {
        let baseline = SirModel::simulate(&scenario_a()).unwrap();
        let mitigated = SirModel::simulate(&scenario_b()).unwrap();
        let baseline_peak = peak_day(&baseline.infected);
        let mitigated_peak = peak_day(&mitigated.infected);
        assert!(mitigated.infected[mitigated_peak] < baseline.infected[baseline_peak]);
        assert!(mitigated_peak >= baseline_peak);
        assert!(mitigated.susceptible[200] > baseline.susceptible[200]);
    }

    #[test]
    fn test_intervention_on_day_zero_applies_from_first_step() {
        let mut reduced_from_start = scenario_a();
        reduced_from_start.contacts_per_day = 30.0;

        let mut immediate = scenario_a();
        immediate.intervention = Some(Intervention {
            day: 0,
            contacts_per_day: 30.0,
            transmission_probability: 1.0 / 30_000_000.0,
        });

        assert_eq!(
            SirModel::simulate(&immediate).unwrap(),
            SirModel::simulate(&reduced_from_start).unwrap()
        );
    }

    #[test]
    fn test_intervention_past_end_is_inert() {
        let mut parameters = scenario_a();
        parameters.intervention = Some(Intervention {
            day: 500,
            contacts_per_day: 1.0,
            transmission_probability: 1.0,
        });
        assert_eq!(
            SirModel::simulate(&parameters).unwrap(),
            SirModel::simulate(&scenario_a()).unwrap()
        );
    }

    #[test]
    fn test_apply_intervention_switches_beta() {
        let parameters = scenario_b();
        let mut state = SimulationState::initialize(&parameters).unwrap();
        assert_eq!(state.beta(), 50.0 * (1.0 / 30_000_000.0));
        assert_eq!(state.gamma(), 1.0 / 14.0);
        assert_eq!(state.population(), 100_010.0);
        state.apply_intervention(&parameters.intervention.unwrap());
        assert_eq!(state.beta(), 30.0 * (1.0 / 30_000_000.0));
    }

    #[test]
    fn test_initialize_rejects_invalid_parameters() {
        let mut parameters = scenario_a();
        parameters.recovery_rate = -1.0;
        assert!(SimulationState::initialize(&parameters).is_err());
    }
}
