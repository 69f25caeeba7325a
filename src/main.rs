//! Trip planner entry point — CLI wiring and config-driven simulation.

use std::path::Path;
use std::process;

use ev_trip_sim::chargers::{ChargerDirectory, fetch_candidates, sample_points};
use ev_trip_sim::config::PlannerConfig;
use ev_trip_sim::geo::Route;
use ev_trip_sim::io::export::export_stops_csv;
use ev_trip_sim::io::import::load_route_csv;
use ev_trip_sim::providers::VehicleSpecSource;
use ev_trip_sim::providers::specs::{CsvSpecSource, ScaledTripTable};
use ev_trip_sim::providers::static_dir::StaticChargerDirectory;
use ev_trip_sim::report::{RangeEstimate, TripReport};
use ev_trip_sim::sim::engine::TripSimulator;
use ev_trip_sim::sim::types::SimParams;
use ev_trip_sim::vehicle::VehicleProfile;

#[cfg(feature = "online")]
use ev_trip_sim::providers::RouteProvider;
#[cfg(feature = "online")]
use ev_trip_sim::providers::ocm::OcmDirectory;
#[cfg(feature = "online")]
use ev_trip_sim::providers::ors::OrsRouteProvider;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    route_path: Option<String>,
    chargers_path: Option<String>,
    specs_path: Option<String>,
    model_override: Option<String>,
    soc_override: Option<f64>,
    buffer_override: Option<f64>,
    stops_out: Option<String>,
    #[cfg(feature = "online")]
    start: Option<String>,
    #[cfg(feature = "online")]
    dest: Option<String>,
}

fn print_help() {
    eprintln!("ev-trip-sim — EV trip simulator with charging-stop planning");
    eprintln!();
    eprintln!("Usage: ev-trip-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>     Load scenario from TOML config file");
    eprintln!("  --preset <name>       Use a built-in preset (baseline)");
    eprintln!("  --route <path>        Load route waypoints from CSV (latitude,longitude)");
    eprintln!("  --chargers <path>     Load an offline charger directory from CSV");
    eprintln!("  --specs <path>        Load the scaled-trip energy CSV for consumption data");
    eprintln!("  --model <name>        Override the vehicle model name");
    eprintln!("  --soc <percent>       Override the starting state of charge");
    eprintln!("  --buffer <km>         Override the range safety buffer");
    eprintln!("  --stops-out <path>    Export planned stops to CSV");
    #[cfg(feature = "online")]
    {
        eprintln!("  --start <postcode>    Geocode and route from this start (needs ORS key)");
        eprintln!("  --dest <postcode>     Geocode and route to this destination");
    }
    eprintln!("  --help                Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> String {
    *i += 1;
    if *i >= args.len() {
        eprintln!("error: {flag} requires an argument");
        process::exit(1);
    }
    args[*i].clone()
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        route_path: None,
        chargers_path: None,
        specs_path: None,
        model_override: None,
        soc_override: None,
        buffer_override: None,
        stops_out: None,
        #[cfg(feature = "online")]
        start: None,
        #[cfg(feature = "online")]
        dest: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => cli.scenario_path = Some(take_value(&args, &mut i, "--scenario")),
            "--preset" => cli.preset = Some(take_value(&args, &mut i, "--preset")),
            "--route" => cli.route_path = Some(take_value(&args, &mut i, "--route")),
            "--chargers" => cli.chargers_path = Some(take_value(&args, &mut i, "--chargers")),
            "--specs" => cli.specs_path = Some(take_value(&args, &mut i, "--specs")),
            "--model" => cli.model_override = Some(take_value(&args, &mut i, "--model")),
            "--soc" => {
                let raw = take_value(&args, &mut i, "--soc");
                match raw.parse::<f64>() {
                    Ok(v) => cli.soc_override = Some(v),
                    Err(_) => {
                        eprintln!("error: --soc value \"{raw}\" is not a valid number");
                        process::exit(1);
                    }
                }
            }
            "--buffer" => {
                let raw = take_value(&args, &mut i, "--buffer");
                match raw.parse::<f64>() {
                    Ok(v) => cli.buffer_override = Some(v),
                    Err(_) => {
                        eprintln!("error: --buffer value \"{raw}\" is not a valid number");
                        process::exit(1);
                    }
                }
            }
            "--stops-out" => cli.stops_out = Some(take_value(&args, &mut i, "--stops-out")),
            #[cfg(feature = "online")]
            "--start" => cli.start = Some(take_value(&args, &mut i, "--start")),
            #[cfg(feature = "online")]
            "--dest" => cli.dest = Some(take_value(&args, &mut i, "--dest")),
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Resolves the vehicle profile: scaled-trip table when supplied, otherwise
/// the configured vehicle parameters.
fn build_profile(cli: &CliArgs, config: &PlannerConfig) -> VehicleProfile {
    let fallback = match VehicleProfile::new(
        config.vehicle.consumption_wh_per_km,
        config.vehicle.battery_kwh,
    ) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let Some(ref specs_path) = cli.specs_path else {
        return fallback;
    };

    let table = match ScaledTripTable::from_csv_file(Path::new(specs_path)) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };
    let source = CsvSpecSource::new(table, config.scaling.clone(), fallback);
    match source.get_specs(&config.vehicle.model) {
        Ok(p) => {
            if p.consumption_wh_per_km != fallback.consumption_wh_per_km {
                eprintln!(
                    "Using empirical consumption for {}: {:.1} Wh/km",
                    config.vehicle.model, p.consumption_wh_per_km
                );
            } else {
                eprintln!(
                    "No trip data for {}, using configured consumption.",
                    config.vehicle.model
                );
            }
            p
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

/// Resolves the route: waypoint CSV when supplied, otherwise online
/// geocoding and routing when available.
fn build_route(cli: &CliArgs, config: &PlannerConfig) -> Route {
    if let Some(ref path) = cli.route_path {
        match load_route_csv(Path::new(path)) {
            Ok(route) => return route,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    }

    #[cfg(feature = "online")]
    if let (Some(start), Some(dest)) = (&cli.start, &cli.dest) {
        let p = &config.providers;
        if p.ors_api_key.is_empty() {
            eprintln!("error: --start/--dest require providers.ors_api_key in the scenario");
            process::exit(1);
        }
        let provider = OrsRouteProvider::new(&p.ors_base_url, &p.ors_api_key, &p.geocode_country);
        eprintln!("Geocoding {start} and {dest} ...");
        match provider.get_route(start, dest) {
            Ok(route) => return route,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    }

    let _ = config;
    eprintln!("error: no route source; pass --route <csv>");
    #[cfg(feature = "online")]
    eprintln!("       or --start/--dest with an ORS key configured");
    process::exit(1);
}

/// Resolves the charger directory: offline CSV, then the online directory,
/// then an empty one (every stop will report no candidates).
fn build_directory(cli: &CliArgs, config: &PlannerConfig) -> Box<dyn ChargerDirectory> {
    if let Some(ref path) = cli.chargers_path {
        match StaticChargerDirectory::from_csv_file(Path::new(path)) {
            Ok(dir) => {
                eprintln!("Loaded {} chargers from {path}", dir.len());
                return Box::new(dir);
            }
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    }

    #[cfg(feature = "online")]
    if !config.providers.ocm_api_key.is_empty() {
        return Box::new(OcmDirectory::new(
            &config.providers.ocm_base_url,
            &config.providers.ocm_api_key,
        ));
    }

    let _ = config;
    eprintln!("warning: no charger source configured; stops will have no candidates");
    Box::new(StaticChargerDirectory::default())
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline
    let mut config = if let Some(ref path) = cli.scenario_path {
        match PlannerConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match PlannerConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        PlannerConfig::baseline()
    };

    // Apply CLI overrides
    if let Some(ref model) = cli.model_override {
        config.vehicle.model = model.clone();
    }
    if let Some(soc) = cli.soc_override {
        config.trip.start_soc_percent = soc;
    }
    if let Some(buffer) = cli.buffer_override {
        config.trip.buffer_km = buffer;
    }

    // Validate
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let profile = build_profile(&cli, &config);
    let route = build_route(&cli, &config);
    let directory = build_directory(&cli, &config);

    println!("Car: {}", config.vehicle.model);
    println!(
        "{}",
        RangeEstimate::new(&profile, config.trip.start_soc_percent)
    );

    // Route overview: one batched lookup over sampled points, not one per
    // waypoint.
    let overview_points = sample_points(&route, config.search.route_sample_points);
    match fetch_candidates(
        &*directory,
        &overview_points,
        config.search.max_results,
        config.search.radius_km,
    ) {
        Ok(chargers) => println!("Chargers known near route: {}", chargers.len()),
        Err(e) => eprintln!("warning: route overview lookup failed: {e}"),
    }

    let params = SimParams {
        buffer_km: config.trip.buffer_km,
        search_radius_km: config.search.radius_km,
        search_max_results: config.search.max_results,
        candidates_per_stop: config.search.candidates_per_stop,
    };
    let simulator = TripSimulator::new(&*directory, params);
    let plan = simulator.simulate(&route, &profile, config.trip.start_soc_percent);

    println!("\n{plan}");
    println!("\n{}", TripReport::from_plan(&plan));

    if let Some(ref path) = cli.stops_out {
        if let Err(e) = export_stops_csv(&plan, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Stops written to {path}");
    }
}
