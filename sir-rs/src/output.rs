/// Trajectory of the three compartments. The vectors stay aligned: index t
/// holds the population snapshot at day t, with day 0 being the initial
/// condition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SirOutput {
    pub susceptible: Vec<f64>,
    pub infected: Vec<f64>,
    pub recovered: Vec<f64>,
}

impl SirOutput {
    pub fn with_capacity(days: usize) -> SirOutput {
        SirOutput {
            susceptible: Vec::with_capacity(days),
            infected: Vec::with_capacity(days),
            recovered: Vec::with_capacity(days),
        }
    }

    pub fn push(&mut self, susceptible: f64, infected: f64, recovered: f64) {
        self.susceptible.push(susceptible);
        self.infected.push(infected);
        self.recovered.push(recovered);
    }

    /// Number of recorded days, including day 0.
    pub fn len(&self) -> usize {
        self.susceptible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.susceptible.is_empty()
    }

    pub fn snapshot(&self, day: usize) -> Option<(f64, f64, f64)> {
        if day < self.len() {
            Some((self.susceptible[day], self.infected[day], self.recovered[day]))
        } else {
            None
        }
    }

    /// New infections per day, derived from susceptible depletion: element t
    /// is S(t) - S(t+1), so the series is one entry shorter than the
    /// trajectory. Non-negative under valid parameters, since S only ever
    /// decreases.
    pub fn daily_new_infections(&self) -> impl Iterator<Item = f64> + '_ {
        self.susceptible.windows(2).map(|pair| pair[0] - pair[1])
    }
}
