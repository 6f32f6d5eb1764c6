use cfa_sir::parameters::{Intervention, Parameters};
use cfa_sir::runner::Environment;
use cfa_sir::sir::SirModel;

fn main() {
    env_logger::init();

    let mut ctx = match std::env::args().nth(1) {
        Some(path) => Environment::from_config_file(path),
        None => Environment::from_stdin(),
    };

    // Parse parameters from the input section; defaults reproduce the
    // no-intervention baseline scenario.
    let initial_susceptible = ctx
        .input_map()
        .get("initial_susceptible")
        .and_then(|v| v.as_f64())
        .unwrap_or(100_000.0);

    let initial_infected = ctx
        .input_map()
        .get("initial_infected")
        .and_then(|v| v.as_f64())
        .unwrap_or(10.0);

    let initial_recovered = ctx
        .input_map()
        .get("initial_recovered")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);

    let contacts_per_day = ctx
        .input_map()
        .get("contacts_per_day")
        .and_then(|v| v.as_f64())
        .unwrap_or(50.0);

    let transmission_probability = ctx
        .input_map()
        .get("transmission_probability")
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0 / 30_000_000.0);

    let recovery_rate = ctx
        .input_map()
        .get("recovery_rate")
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0 / 14.0);

    let sim_length = ctx
        .input_map()
        .get("sim_length")
        .and_then(|v| v.as_u64())
        .unwrap_or(200) as usize;

    let intervention = ctx
        .input_map()
        .get("intervention")
        .and_then(|v| v.as_object())
        .map(|obj| Intervention {
            day: obj.get("day").and_then(|v| v.as_u64()).unwrap_or(0) as usize,
            contacts_per_day: obj
                .get("contacts_per_day")
                .and_then(|v| v.as_f64())
                .expect("missing intervention contacts_per_day"),
            transmission_probability: obj
                .get("transmission_probability")
                .and_then(|v| v.as_f64())
                .unwrap_or(transmission_probability),
        });

    let parameters = Parameters {
        initial_susceptible,
        initial_infected,
        initial_recovered,
        contacts_per_day,
        transmission_probability,
        recovery_rate,
        sim_length,
        intervention,
    };

    // Run simulation
    let result = match SirModel::simulate(&parameters) {
        Ok(output) => output,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    let r0 = parameters
        .basic_reproduction_number()
        .expect("recovery rate already validated");
    log::info!(
        "simulated {} days over a population of {}, r0 = {:.3}",
        parameters.sim_length,
        parameters.population(),
        r0
    );

    // Build CSV rows; the day-0 row has no preceding day, so its
    // new-infections cell is 0.
    let new_infections: Vec<f64> = result.daily_new_infections().collect();
    let rows: Vec<Vec<String>> = (0..result.len())
        .map(|day| {
            vec![
                day.to_string(),
                result.susceptible[day].to_string(),
                result.infected[day].to_string(),
                result.recovered[day].to_string(),
                (if day == 0 { 0.0 } else { new_infections[day - 1] }).to_string(),
            ]
        })
        .collect();

    ctx.write_csv(
        "sir_trajectory.csv",
        &["day", "susceptible", "infected", "recovered", "new_infections"],
        &rows,
    );

    let last = result.len() - 1;
    let summary = serde_json::json!({
        "population": parameters.population(),
        "beta": parameters.beta(),
        "gamma": parameters.recovery_rate,
        "r0": r0,
        "r0_post_intervention": parameters.intervention.map(|intervention| {
            parameters.population() * intervention.beta() / parameters.recovery_rate
        }),
        "final": {
            "day": last,
            "susceptible": result.susceptible[last],
            "infected": result.infected[last],
            "recovered": result.recovered[last],
        },
        "total_infections": parameters.initial_susceptible - result.susceptible[last],
    });
    ctx.write(
        "summary.json",
        &serde_json::to_vec_pretty(&summary).expect("failed to serialize summary"),
    );
    ctx.write_manifest();
}
