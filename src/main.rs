use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde_json::json;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use trailsync::effort::{
    self, AidStation, EffortRecord, EphConditions, RaceProfile, RaceStrategy, RouteType,
};
use trailsync::grip::{self, RiskLevel, Shoe, Surface, Weather};
use trailsync::intervals::{self, IntervalSet};
use trailsync::planner::{self, TargetPace, Warmup, WorkoutRequest};
use trailsync::units::{self, parse_amount, Quantity, UnitSystem};
use trailsync::weather::{self, HeatRisk};
use trailsync::{
    gap, logging, risk, summarize_with, training_paces, treadmill, AppConfig, ElevationPolicy,
    ImportManager, TrailSyncError,
};

/// TrailSync - Running and trail training calculator
///
/// Track distance and elevation from GPX files, grade-adjusted and treadmill
/// paces, effort-based race prediction, training paces and workouts, and
/// heat, grip and route risk.
#[derive(Parser)]
#[command(name = "trailsync")]
#[command(author = "TrailSync Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Running and trail training calculator", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Unit system for input and output (overrides the config file)
    #[arg(short, long, global = true)]
    units: Option<UnitSystem>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Total distance and elevation gain/loss of a GPX track
    Track {
        /// GPX file
        file: PathBuf,

        /// Ignore segments touching points without elevation instead of treating them as 0 m
        #[arg(long)]
        skip_missing_elevation: bool,
    },

    /// Grade-adjusted and normalized graded pace for a pace held on a slope
    Gap {
        /// Pace as m:ss or decimal minutes
        #[arg(short, long, value_parser = units::parse_pace)]
        pace: Decimal,

        /// Grade in percent, negative downhill
        #[arg(short, long, allow_hyphen_values = true)]
        grade: Decimal,

        /// Terrain technicality, 0 for smooth ground
        #[arg(long, default_value = "0", value_parser = parse_amount)]
        technicality: Decimal,
    },

    /// Road pace equivalent to a treadmill setting
    Treadmill {
        /// Belt speed (km/h, or mph with imperial units)
        #[arg(short, long, value_parser = parse_amount)]
        speed: Decimal,

        /// Incline in percent
        #[arg(short, long, default_value = "0", value_parser = parse_amount)]
        incline: Decimal,
    },

    /// Treadmill speed that matches a road pace
    TreadmillSpeed {
        /// Road pace as m:ss or decimal minutes
        #[arg(short, long, value_parser = units::parse_pace)]
        pace: Decimal,

        /// Incline in percent
        #[arg(short, long, default_value = "0", value_parser = parse_amount)]
        incline: Decimal,
    },

    /// Effort points per hour of a finished run
    Eph {
        /// Distance covered
        #[arg(short, long, value_parser = parse_amount)]
        distance: Decimal,

        /// Elevation gain
        #[arg(short, long, default_value = "0", value_parser = parse_amount)]
        gain: Decimal,

        /// Elapsed time as h:mm:ss
        #[arg(short, long, value_parser = units::parse_duration)]
        time: Decimal,

        /// Kind of route
        #[arg(long, value_enum, default_value_t = RouteType::FireTrail)]
        route_type: RouteType,

        /// Altitude of the route
        #[arg(long, default_value = "0", value_parser = parse_amount)]
        altitude: Decimal,

        /// Apply ultra-distance fatigue
        #[arg(long)]
        ultra: bool,
    },

    /// Predict a race finishing time from your EPH
    Race {
        /// Race distance
        #[arg(short, long, value_parser = parse_amount)]
        distance: Decimal,

        /// Total elevation gain
        #[arg(short, long, default_value = "0", value_parser = parse_amount)]
        gain: Decimal,

        /// Total elevation loss
        #[arg(short, long, default_value = "0", value_parser = parse_amount)]
        loss: Decimal,

        /// Effort points per hour (defaults to the config value)
        #[arg(short, long, value_parser = parse_amount)]
        eph: Option<Decimal>,

        /// Climbing ability, 1.0 = average
        #[arg(long, value_parser = parse_amount)]
        climbing_factor: Option<Decimal>,

        /// Descending ability, 1.0 = average
        #[arg(long, value_parser = parse_amount)]
        descending_factor: Option<Decimal>,

        /// Aid station as DISTANCE:MINUTES, repeatable
        #[arg(long = "aid", value_parser = parse_aid_station)]
        aid_stations: Vec<AidStation>,
    },

    /// Expected duration of a training run, paced off a reference effort
    TrainingTime {
        /// Reference distance
        #[arg(long, value_parser = parse_amount)]
        ref_distance: Decimal,

        /// Reference elevation gain
        #[arg(long, default_value = "0", value_parser = parse_amount)]
        ref_gain: Decimal,

        /// Reference time as h:mm:ss
        #[arg(long, value_parser = units::parse_duration)]
        ref_time: Decimal,

        /// Planned distance
        #[arg(short, long, value_parser = parse_amount)]
        distance: Decimal,

        /// Planned elevation gain
        #[arg(short, long, default_value = "0", value_parser = parse_amount)]
        gain: Decimal,
    },

    /// Interval, LSD and recovery paces from a recent race or time trial
    Paces {
        /// Distance raced
        #[arg(short, long, value_parser = parse_amount)]
        distance: Decimal,

        /// Finishing time as h:mm:ss
        #[arg(short, long, value_parser = units::parse_duration)]
        time: Decimal,

        /// Interval rep distance in metres
        #[arg(long, default_value = "400", value_parser = parse_amount)]
        interval_distance: Decimal,

        /// Long run distance
        #[arg(long, default_value = "20", value_parser = parse_amount)]
        lsd_distance: Decimal,
    },

    /// Finishing time at another distance, by Riegel's formula
    Riegel {
        /// Distance raced
        #[arg(short, long, value_parser = parse_amount)]
        distance: Decimal,

        /// Finishing time as h:mm:ss
        #[arg(short, long, value_parser = units::parse_duration)]
        time: Decimal,

        /// Distance to predict
        #[arg(long, value_parser = parse_amount)]
        target: Decimal,
    },

    /// Interval, threshold, marathon and easy paces from a recent race
    Zones {
        /// Distance raced
        #[arg(short, long, value_parser = parse_amount)]
        distance: Decimal,

        /// Finishing time as h:mm:ss
        #[arg(short, long, value_parser = units::parse_duration)]
        time: Decimal,
    },

    /// Warm-up, main set and cool-down paced from a recent race
    Workout {
        /// Distance raced
        #[arg(short, long, value_parser = parse_amount)]
        distance: Decimal,

        /// Finishing time as h:mm:ss
        #[arg(short, long, value_parser = units::parse_duration)]
        time: Decimal,

        /// Intensity of the main set
        #[arg(long, value_enum)]
        target: TargetPace,

        /// Main set description, e.g. 6x800m
        #[arg(long, default_value = "")]
        main_set: String,

        /// Warm-up length in minutes
        #[arg(long, default_value = "15", value_parser = parse_amount)]
        warmup_minutes: Decimal,

        /// Warm-up length as a distance, instead of minutes
        #[arg(long, value_parser = parse_amount)]
        warmup_distance: Option<Decimal>,
    },

    /// Pace impact and risk of running in the heat
    Heat {
        /// Wet-bulb globe temperature in °C
        #[arg(long)]
        wbgt: Decimal,

        /// Wind speed in m/s
        #[arg(long, default_value = "0", value_parser = parse_amount)]
        wind: Decimal,

        /// Relative humidity in percent
        #[arg(long, default_value = "50", value_parser = parse_amount)]
        humidity: Decimal,
    },

    /// Roughness, downhill risk and technicality of a route
    Risk {
        /// Route distance
        #[arg(short, long, value_parser = parse_amount)]
        distance: Decimal,

        /// Total elevation gain
        #[arg(short, long, default_value = "0", value_parser = parse_amount)]
        gain: Decimal,

        /// Distance spent descending
        #[arg(long, default_value = "0", value_parser = parse_amount)]
        downhill_distance: Decimal,

        /// Total descent
        #[arg(long, default_value = "0", value_parser = parse_amount)]
        descent: Decimal,

        /// Kind of route
        #[arg(long, value_enum, default_value_t = RouteType::FireTrail)]
        route_type: RouteType,
    },

    /// Interval paces from rep times, or rep times from a target pace
    Intervals {
        /// Rep distance in metres
        #[arg(short, long, value_parser = parse_amount)]
        distance: Decimal,

        /// Set as SECONDSxCOUNT (e.g. 90x6), repeatable
        #[arg(short, long = "set", value_parser = parse_interval_set)]
        sets: Vec<IntervalSet>,

        /// Target pace as m:ss, instead of sets
        #[arg(short, long, value_parser = units::parse_pace, conflicts_with = "sets", requires = "reps")]
        pace: Option<Decimal>,

        /// Number of reps at the target pace
        #[arg(short, long)]
        reps: Option<u32>,

        /// Threshold pace as m:ss (defaults to the config value)
        #[arg(short, long, value_parser = units::parse_pace)]
        threshold: Option<Decimal>,
    },

    /// Footing risk for surface, shoe and weather
    Grip {
        #[arg(long, value_enum)]
        surface: Surface,

        #[arg(long, value_enum)]
        shoe: Shoe,

        #[arg(long, value_enum)]
        weather: Weather,

        /// Terrain technicality from 0 (smooth) to 1
        #[arg(long, default_value = "0", value_parser = parse_amount)]
        technicality: Decimal,
    },

    /// Show or create the configuration file
    Config {
        /// Write a default config file (to --config FILE if given) unless one exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Tabled)]
struct PaceRow {
    #[tabled(rename = "Zone")]
    zone: &'static str,
    #[tabled(rename = "Pace")]
    pace: String,
}

#[derive(Tabled)]
struct SetRow {
    #[tabled(rename = "Set")]
    set: usize,
    #[tabled(rename = "Reps")]
    reps: u32,
    #[tabled(rename = "Pace")]
    pace: String,
    #[tabled(rename = "Threshold")]
    threshold: String,
}

fn parse_aid_station(s: &str) -> Result<AidStation, String> {
    let (distance, minutes) = s
        .split_once(':')
        .ok_or_else(|| format!("Expected DISTANCE:MINUTES, got {}", s))?;
    Ok(AidStation {
        distance_km: parse_amount(distance)
            .map_err(|e| format!("Invalid aid station distance: {}", e))?,
        stop_minutes: parse_amount(minutes)
            .map_err(|e| format!("Invalid aid station stop: {}", e))?,
    })
}

fn parse_interval_set(s: &str) -> Result<IntervalSet, String> {
    let (seconds, count) = s
        .to_lowercase()
        .split_once('x')
        .map(|(a, b)| (a.trim().to_string(), b.trim().to_string()))
        .ok_or_else(|| format!("Expected SECONDSxCOUNT, got {}", s))?;
    Ok(IntervalSet {
        seconds: seconds
            .parse()
            .map_err(|_| format!("Invalid rep seconds: {}", seconds))?,
        count: count
            .parse()
            .map_err(|_| format!("Invalid rep count: {}", count))?,
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn colored_risk(risk: RiskLevel) -> ColoredString {
    match risk {
        RiskLevel::Low => risk.to_string().green(),
        RiskLevel::Moderate => risk.to_string().yellow(),
        RiskLevel::High => risk.to_string().red(),
        RiskLevel::Critical => risk.to_string().red().bold(),
    }
}

fn as_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    // `config --init` may point at a file that does not exist yet
    match (&cli.command, cli.config.as_deref()) {
        (Commands::Config { init: true }, Some(path)) if !path.exists() => {
            Ok(AppConfig::default())
        }
        (_, path) => AppConfig::load_or_default(path),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    logging::init_logging(&config.logging.clone().with_verbosity(cli.verbose))?;

    let units = cli.units.unwrap_or(config.settings.units);

    match run(cli.command, &config, cli.config.as_deref(), units, cli.json) {
        Ok(()) => Ok(()),
        Err(err) => {
            // Library errors get the friendlier wording
            if let Some(err) = err.downcast_ref::<TrailSyncError>() {
                tracing::debug!(severity = ?err.severity(), error = %err, "Command failed");
                eprintln!("{} {}", "✗".red().bold(), err.user_message());
                std::process::exit(1);
            }
            Err(err)
        }
    }
}

fn run(
    command: Commands,
    config: &AppConfig,
    config_path: Option<&Path>,
    units: UnitSystem,
    json: bool,
) -> Result<()> {
    let distance = |v: Decimal| units::to_internal_decimal(v, Quantity::Distance, units);
    let elevation = |v: Decimal| units::to_internal_decimal(v, Quantity::Elevation, units);
    let pace = |v: Decimal| units::to_internal_decimal(v, Quantity::Pace, units);

    match command {
        Commands::Track {
            file,
            skip_missing_elevation,
        } => {
            let policy = if skip_missing_elevation {
                ElevationPolicy::SkipMissing
            } else {
                config.settings.elevation_policy
            };

            let points = ImportManager::new()
                .import_file(&file)
                .map_err(TrailSyncError::from)?;
            let summary = summarize_with(&points, policy).map_err(TrailSyncError::from)?;
            let roughness = risk::roughness_index(
                Decimal::from_f64(summary.total_distance_km).unwrap_or_default(),
                Decimal::from_f64(summary.total_elevation_gain_m).unwrap_or_default(),
            );

            if json {
                return print_json(&json!({
                    "summary": summary,
                    "roughness_index": roughness,
                }));
            }
            println!("{}", format!("Track: {}", file.display()).green().bold());
            println!("  Points:    {}", summary.point_count);
            println!(
                "  Distance:  {}",
                units::format_distance(summary.total_distance_km, units)
            );
            println!(
                "  Gain:      {}",
                units::format_elevation(summary.total_elevation_gain_m, units)
            );
            println!(
                "  Loss:      {}",
                units::format_elevation(summary.total_elevation_loss_m, units)
            );
            println!("  RRI:       {:.2}", roughness);
        }

        Commands::Gap {
            pace: p,
            grade,
            technicality,
        } => {
            let comparison =
                gap::compare(pace(p), grade, technicality).map_err(TrailSyncError::from)?;

            if json {
                return print_json(&comparison);
            }
            println!(
                "{} {}",
                "Grade-adjusted pace:".cyan().bold(),
                units::format_pace(comparison.gap, units)
            );
            println!(
                "{} {}",
                "Normalized graded pace:".cyan().bold(),
                units::format_pace(comparison.ngp, units)
            );
            println!(
                "  Difference: {:.2} min/km ({:.1}%)",
                comparison.difference, comparison.difference_percent
            );
        }

        Commands::Treadmill { speed, incline } => {
            let road = treadmill::treadmill_to_road_pace(distance(speed), incline)
                .map_err(TrailSyncError::from)?;

            if json {
                return print_json(&json!({ "road_pace_min_per_km": road }));
            }
            println!(
                "{} {}",
                "Equivalent road pace:".cyan().bold(),
                units::format_pace(road, units)
            );
        }

        Commands::TreadmillSpeed { pace: p, incline } => {
            let kmh = treadmill::road_pace_to_treadmill_speed(pace(p), incline)
                .map_err(TrailSyncError::from)?;

            if json {
                return print_json(&json!({ "speed_kmh": kmh }));
            }
            let speed = units::to_display_units(as_f64(kmh), Quantity::Distance, units);
            println!(
                "{} {:.1} {}/h",
                "Treadmill speed:".cyan().bold(),
                speed,
                units::unit_label(Quantity::Distance, units)
            );
        }

        Commands::Eph {
            distance: d,
            gain,
            time,
            route_type,
            altitude,
            ultra,
        } => {
            let record = EffortRecord {
                distance_km: distance(d),
                gain_m: elevation(gain),
                hours: time,
            };
            let conditions = EphConditions {
                route_type,
                altitude_m: elevation(altitude),
                ultra,
            };
            let eph = effort::advanced_eph(
                record.eph().map_err(TrailSyncError::from)?,
                time,
                &conditions,
            )
            .map_err(TrailSyncError::from)?;

            if json {
                return print_json(&json!({
                    "effort_points": record.effort_points(),
                    "eph": eph,
                }));
            }
            println!("{} {:.1}", "Effort points:".cyan().bold(), record.effort_points());
            println!("{} {:.1}", "EPH:".cyan().bold(), eph.base_eph);
            if eph.final_eph != eph.base_eph {
                println!(
                    "{} {:.1} (terrain x{}, altitude x{:.3}, fatigue x{:.3})",
                    "Adjusted EPH:".cyan().bold(),
                    eph.final_eph,
                    eph.terrain_factor,
                    eph.gravity_factor,
                    eph.fatigue_factor
                );
            }
        }

        Commands::Race {
            distance: d,
            gain,
            loss,
            eph,
            climbing_factor,
            descending_factor,
            aid_stations,
        } => {
            let eph = eph
                .or(config.athlete.eph)
                .context("No EPH given; pass --eph or set athlete.eph in the config file")?;
            let race = RaceProfile {
                distance_km: distance(d),
                gain_m: elevation(gain),
                loss_m: elevation(loss),
            };
            let strategy = RaceStrategy {
                climbing_factor: climbing_factor.unwrap_or(config.athlete.climbing_factor),
                descending_factor: descending_factor.unwrap_or(config.athlete.descending_factor),
                aid_stations: aid_stations
                    .into_iter()
                    .map(|s| AidStation {
                        distance_km: distance(s.distance_km),
                        ..s
                    })
                    .collect(),
            };

            let prediction =
                effort::predict_race(&race, eph, Some(&strategy)).map_err(TrailSyncError::from)?;

            if json {
                return print_json(&prediction);
            }
            println!(
                "{} {} ({:?})",
                "Predicted finish:".magenta().bold(),
                units::format_duration(prediction.total_hours()),
                prediction.mode
            );
            println!(
                "  Effort distance: {:.1} ekm",
                prediction.equivalent_distance_km
            );
        }

        Commands::TrainingTime {
            ref_distance,
            ref_gain,
            ref_time,
            distance: d,
            gain,
        } => {
            let reference = EffortRecord {
                distance_km: distance(ref_distance),
                gain_m: elevation(ref_gain),
                hours: ref_time,
            };
            let reference_eph = reference.eph().map_err(TrailSyncError::from)?;
            let hours = effort::estimate_training_time(&reference, distance(d), elevation(gain))
                .map_err(TrailSyncError::from)?;

            if json {
                return print_json(&json!({
                    "reference_eph": reference_eph,
                    "hours": hours,
                }));
            }
            println!("{} {:.1}", "Reference EPH:".cyan().bold(), reference_eph);
            println!(
                "{} {}",
                "Estimated time:".cyan().bold(),
                units::format_duration(hours)
            );
        }

        Commands::Paces {
            distance: d,
            time,
            interval_distance,
            lsd_distance,
        } => {
            let base = training_paces::equivalent_pace(distance(d), time)
                .map_err(TrailSyncError::from)?;
            let paces =
                training_paces::training_paces(base, interval_distance, distance(lsd_distance))
                    .map_err(TrailSyncError::from)?;

            if json {
                return print_json(&paces);
            }
            let rows = vec![
                PaceRow { zone: "Base", pace: units::format_pace(paces.base, units) },
                PaceRow { zone: "Interval", pace: units::format_pace(paces.interval, units) },
                PaceRow { zone: "LSD", pace: units::format_pace(paces.lsd, units) },
                PaceRow { zone: "Recovery", pace: units::format_pace(paces.recovery, units) },
            ];
            println!("{}", Table::new(rows).with(Style::rounded()));
        }

        Commands::Riegel {
            distance: d,
            time,
            target,
        } => {
            let hours = planner::riegel_prediction(time, distance(d), distance(target))
                .map_err(TrailSyncError::from)?;

            if json {
                return print_json(&json!({ "hours": hours }));
            }
            println!(
                "{} {} over {}",
                "Predicted time:".magenta().bold(),
                units::format_duration(hours),
                units::format_distance(as_f64(distance(target)), units)
            );
        }

        Commands::Zones { distance: d, time } => {
            let base = training_paces::equivalent_pace(distance(d), time)
                .map_err(TrailSyncError::from)?;
            let zones = planner::pace_zones(base).map_err(TrailSyncError::from)?;

            if json {
                return print_json(&zones);
            }
            let rows = vec![
                PaceRow { zone: "Interval", pace: units::format_pace(zones.interval, units) },
                PaceRow { zone: "Threshold", pace: units::format_pace(zones.threshold, units) },
                PaceRow { zone: "Marathon", pace: units::format_pace(zones.marathon, units) },
                PaceRow { zone: "Easy", pace: units::format_pace(zones.easy, units) },
            ];
            println!("{}", Table::new(rows).with(Style::rounded()));
        }

        Commands::Workout {
            distance: d,
            time,
            target,
            main_set,
            warmup_minutes,
            warmup_distance,
        } => {
            let warmup = match warmup_distance {
                Some(w) => Warmup::Kilometres(distance(w)),
                None => Warmup::Minutes(warmup_minutes),
            };
            let workout = planner::generate_workout(&WorkoutRequest {
                base_distance_km: distance(d),
                base_hours: time,
                target,
                main_set,
                warmup,
            })
            .map_err(TrailSyncError::from)?;

            if json {
                return print_json(&workout);
            }
            println!(
                "{} {:.0} min, {} at {} to {}",
                "Warm-up:".cyan().bold(),
                workout.warmup.minutes,
                units::format_distance(as_f64(workout.warmup.distance_km), units),
                units::format_pace(workout.warmup.pace_slow, units),
                units::format_pace(workout.warmup.pace_fast, units)
            );
            if workout.warmup.strides {
                println!("  then 4-6 x 100 m strides");
            }
            println!(
                "{} {} at {} ({:?})",
                "Main set:".cyan().bold(),
                workout.main.main_set,
                units::format_pace(workout.main.pace, units),
                workout.main.target
            );
            println!(
                "{} {:.0} min, {} at {}",
                "Cool-down:".cyan().bold(),
                workout.cooldown.minutes,
                units::format_distance(as_f64(workout.cooldown.distance_km), units),
                units::format_pace(workout.cooldown.pace, units)
            );
        }

        Commands::Heat {
            wbgt,
            wind,
            humidity,
        } => {
            let heat = weather::assess_heat(wbgt, wind, humidity).map_err(TrailSyncError::from)?;

            if json {
                return print_json(&heat);
            }
            let label = match heat.risk {
                HeatRisk::Safe => heat.risk.to_string().green(),
                HeatRisk::Caution => heat.risk.to_string().yellow(),
                HeatRisk::High | HeatRisk::VeryHigh => heat.risk.to_string().red(),
                HeatRisk::Extreme => heat.risk.to_string().red().bold(),
            };
            println!("{} +{:.1}%", "Pace impact:".cyan().bold(), heat.pace_impact);
            println!("{} {}", "Heat risk:".cyan().bold(), label);
        }

        Commands::Risk {
            distance: d,
            gain,
            downhill_distance,
            descent,
            route_type,
        } => {
            let assessment = risk::assess_route(
                distance(d),
                elevation(gain),
                distance(downhill_distance),
                elevation(descent),
                route_type,
            );

            if json {
                return print_json(&assessment);
            }
            println!("{} {:.2}", "RRI:".cyan().bold(), assessment.roughness_index);
            println!(
                "{} {:.1} ({})",
                "Downhill risk:".cyan().bold(),
                assessment.downhill_risk,
                colored_risk(assessment.downhill_level)
            );
            println!("{} {}", "Technicality:".cyan().bold(), assessment.technicality);
        }

        Commands::Intervals {
            distance: rep_m,
            sets,
            pace: target,
            reps,
            threshold,
        } => {
            // Rep distances are always metres
            if let (Some(target), Some(reps)) = (target, reps) {
                let plan = intervals::plan_by_pace(rep_m, pace(target), reps)
                    .map_err(TrailSyncError::from)?;
                if json {
                    return print_json(&plan);
                }
                println!(
                    "{} {} x {}",
                    "Rep time:".cyan().bold(),
                    reps,
                    units::format_duration(plan.seconds_per_rep / Decimal::from(3600))
                );
                println!(
                    "  Total: {} in {}",
                    units::format_distance(as_f64(plan.total_distance_km), units),
                    units::format_duration(plan.total_seconds / Decimal::from(3600))
                );
                return Ok(());
            }

            let threshold = threshold.map(&pace).or(config.athlete.threshold_pace);
            let plan =
                intervals::plan_by_time(rep_m, &sets, threshold).map_err(TrailSyncError::from)?;
            if json {
                return print_json(&plan);
            }
            let rows: Vec<SetRow> = plan
                .sets
                .iter()
                .enumerate()
                .map(|(i, s)| SetRow {
                    set: i + 1,
                    reps: s.set.count,
                    pace: units::format_pace(s.pace, units),
                    threshold: s
                        .threshold_percent
                        .map(|p| format!("{:.0}%", p))
                        .unwrap_or_else(|| "-".to_string()),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
            println!(
                "  Total: {} in {}",
                units::format_distance(as_f64(plan.total_distance_km), units),
                units::format_duration(plan.total_seconds / Decimal::from(3600))
            );
        }

        Commands::Grip {
            surface,
            shoe,
            weather,
            technicality,
        } => {
            let score = grip::grip_score(surface, shoe, weather, technicality)
                .map_err(TrailSyncError::from)?;
            let risk = grip::risk_level(score);

            if json {
                return print_json(&json!({ "score": score, "risk": risk }));
            }
            println!("{} {:.1}/10", "Grip score:".cyan().bold(), score);
            println!("{} {}", "Risk:".cyan().bold(), colored_risk(risk));
        }

        Commands::Config { init } => {
            if init {
                let (path, created) = AppConfig::init_file(config_path)?;
                if json {
                    return print_json(&json!({ "path": path, "created": created }));
                }
                if created {
                    println!("{} {}", "✓ Wrote".green(), path.display());
                } else {
                    println!("Config already exists at {}", path.display());
                }
            } else if json {
                return print_json(config);
            } else {
                print!("{}", toml::to_string_pretty(config)?);
            }
        }
    }

    Ok(())
}
