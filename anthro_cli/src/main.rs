use anthro_core::parse::{
    parse_age, parse_number, parse_optional, parse_positive, parse_rating, parse_reps,
};
use anthro_core::*;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "anthro")]
#[command(about = "Body composition, energy, readiness and load autoregulation estimates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read coefficient tables from this file instead of the default path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate body fat from girths (navy) or skinfolds (jp3, jp7)
    BodyFat {
        #[arg(long)]
        sex: String,
        #[arg(long)]
        age: String,
        /// Body weight in kg
        #[arg(long)]
        weight: String,
        /// Height in cm
        #[arg(long)]
        height: String,
        #[arg(long, default_value = "navy")]
        method: String,

        /// Girths in cm
        #[arg(long)]
        neck: Option<String>,
        #[arg(long)]
        waist: Option<String>,
        #[arg(long)]
        hip: Option<String>,

        /// Skinfolds in mm
        #[arg(long)]
        chest: Option<String>,
        #[arg(long)]
        abdomen: Option<String>,
        #[arg(long)]
        thigh: Option<String>,
        #[arg(long)]
        triceps: Option<String>,
        #[arg(long)]
        suprailiac: Option<String>,
        #[arg(long)]
        midaxillary: Option<String>,
        #[arg(long)]
        subscapular: Option<String>,
    },

    /// Estimate BMR, TDEE and a goal-adjusted macro plan
    Energy {
        #[arg(long)]
        sex: String,
        #[arg(long)]
        age: String,
        /// Body weight in kg
        #[arg(long)]
        weight: String,
        /// Height in cm
        #[arg(long)]
        height: String,
        /// sedentary, light, moderate, active, very-active
        #[arg(long, default_value = "moderate")]
        activity: String,
        /// cut, maintain, bulk, recomp
        #[arg(long, default_value = "maintain")]
        goal: String,
        /// Also list the calorie ladder around TDEE
        #[arg(long)]
        ladder: bool,
        /// Also split the target by a preset (balanced, high-protein, low-carb, keto)
        #[arg(long)]
        split: Option<String>,
    },

    /// Score today's readiness from 1-5 ratings
    Readiness {
        #[arg(long)]
        sleep_hours: String,
        #[arg(long)]
        sleep_quality: String,
        #[arg(long)]
        soreness: String,
        #[arg(long)]
        stress: String,
        #[arg(long)]
        nutrition: String,
        #[arg(long)]
        hydration: String,
        /// CSV of earlier scores (date,score) for trend and average
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Suggest a load change from today's RPE and recent ones
    Rpe {
        #[arg(long)]
        exercise: String,
        #[arg(long)]
        rpe: String,
        /// CSV of earlier ratings (date,exercise,rpe)
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Estimate a one-rep max from a set
    OneRm {
        /// Weight lifted in kg
        #[arg(long)]
        weight: String,
        #[arg(long)]
        reps: String,
        /// epley or brzycki
        #[arg(long, default_value = "epley")]
        formula: String,
        /// Also list working loads from 100% down to 60%
        #[arg(long)]
        loads: bool,
    },

    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Write the default tables to a config file
    Init {
        /// Destination (defaults to the standard config path)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    anthro_core::logging::init();

    let cli = Cli::parse();

    if let Commands::Config {
        action: ConfigAction::Init { path, force },
    } = &cli.command
    {
        return cmd_config_init(path.as_deref(), *force);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::BodyFat {
            sex,
            age,
            weight,
            height,
            method,
            neck,
            waist,
            hip,
            chest,
            abdomen,
            thigh,
            triceps,
            suprailiac,
            midaxillary,
            subscapular,
        } => {
            let sites = [
                (Site::Neck, neck),
                (Site::Waist, waist),
                (Site::Hip, hip),
                (Site::Chest, chest),
                (Site::Abdomen, abdomen),
                (Site::Thigh, thigh),
                (Site::Triceps, triceps),
                (Site::Suprailiac, suprailiac),
                (Site::Midaxillary, midaxillary),
                (Site::Subscapular, subscapular),
            ];
            let mut measurements = Measurements::default();
            for (site, text) in sites {
                if let Some(value) = parse_optional(site.name(), text.as_deref())? {
                    measurements = measurements.with(site, value);
                }
            }

            let input = AnthropometricInput {
                sex: sex.parse()?,
                age: parse_age(&age)?,
                weight_kg: parse_positive("weight", &weight)?,
                height_cm: parse_positive("height", &height)?,
                method: method.parse()?,
                measurements,
            };
            cmd_body_fat(&config, &input, cli.json)
        }

        Commands::Energy {
            sex,
            age,
            weight,
            height,
            activity,
            goal,
            ladder,
            split,
        } => {
            let input = EnergyInput {
                sex: sex.parse()?,
                age: parse_age(&age)?,
                weight_kg: parse_number("weight", &weight)?,
                height_cm: parse_number("height", &height)?,
                activity_level: activity.parse()?,
                goal: goal.parse()?,
            };
            let split = split.map(|s| s.parse::<MacroSplitPreset>()).transpose()?;
            cmd_energy(&config, &input, ladder, split, cli.json)
        }

        Commands::Readiness {
            sleep_hours,
            sleep_quality,
            soreness,
            stress,
            nutrition,
            hydration,
            history,
        } => {
            let input = ReadinessInput {
                sleep_hours: parse_number("sleep_hours", &sleep_hours)?,
                sleep_quality: parse_rating("sleep_quality", &sleep_quality)?,
                soreness: parse_rating("soreness", &soreness)?,
                stress: parse_rating("stress", &stress)?,
                nutrition: parse_rating("nutrition", &nutrition)?,
                hydration: parse_rating("hydration", &hydration)?,
            };
            cmd_readiness(&config, &input, history.as_deref(), cli.json)
        }

        Commands::Rpe {
            exercise,
            rpe,
            history,
        } => {
            let current = RpeInput::new(exercise, parse_number("rpe", &rpe)?);
            cmd_rpe(&config, &current, history.as_deref(), cli.json)
        }

        Commands::OneRm {
            weight,
            reps,
            formula,
            loads,
        } => {
            let weight_kg = parse_number("weight", &weight)?;
            let reps = parse_reps(&reps)?;
            let formula: OneRepMaxFormula = formula.parse()?;
            let e1rm = estimate_one_rep_max(weight_kg, reps, formula)?;
            let chart = if loads {
                Some(training_loads(e1rm)?)
            } else {
                None
            };

            if cli.json {
                let mut value = json!({
                    "weight_kg": weight_kg,
                    "reps": reps,
                    "formula": formula,
                    "one_rep_max_kg": e1rm,
                });
                if let Some(chart) = &chart {
                    value["loads"] = json!(chart);
                }
                print_json(value)
            } else {
                println!("Estimated 1RM ({:?}): {:.1} kg", formula, e1rm);
                for load in chart.iter().flatten() {
                    println!(
                        "  {:>3}%  {:>6.1} kg  {} reps",
                        load.percent, load.load_kg, load.reps
                    );
                }
                Ok(())
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                print!("{}", config.to_toml()?);
                Ok(())
            }
            ConfigAction::Init { .. } => Ok(()),
        },
    }
}

fn cmd_body_fat(config: &Config, input: &AnthropometricInput, json: bool) -> Result<()> {
    let result = BodyCompositionEstimator::from_config(config)?.estimate(input)?;

    if json {
        return print_json(serde_json::to_value(&result)?);
    }

    println!("Method:    {:?}", result.method);
    println!("Body fat:  {:.1}%", result.body_fat_percent);
    println!("Category:  {:?}", result.category);
    println!("Fat mass:  {:.1} kg", result.fat_mass_kg);
    println!("Lean mass: {:.1} kg", result.lean_mass_kg);
    println!("Density:   {:.4}", result.body_density);
    Ok(())
}

fn cmd_energy(
    config: &Config,
    input: &EnergyInput,
    ladder: bool,
    split: Option<MacroSplitPreset>,
    json: bool,
) -> Result<()> {
    let result = EnergyExpenditureEstimator::from_config(config)?.estimate(input)?;
    let ladder = ladder.then(|| calorie_ladder(result.tdee));
    let split = split
        .map(|preset| split_by_preset(result.target_calories, preset).map(|m| (preset, m)))
        .transpose()?;

    if json {
        return print_json(json!({
            "estimate": result,
            "ladder": ladder,
            "split": split.map(|(preset, macros)| json!({ "preset": preset, "macros": macros })),
        }));
    }

    println!("BMR:     {:.0} kcal", result.bmr);
    println!("TDEE:    {:.0} kcal ({:?})", result.tdee, result.activity_level);
    println!("Target:  {:.0} kcal ({:?})", result.target_calories, result.goal);
    print_macros("Macros", &result.macros);

    if let Some(ladder) = ladder {
        println!();
        for rung in ladder {
            println!(
                "  {:<14} {:>+6.0}  {:>6.0} kcal",
                rung.label, rung.delta_kcal, rung.calories
            );
        }
    }
    if let Some((preset, macros)) = split {
        println!();
        print_macros(&format!("{:?} split", preset), &macros);
    }
    Ok(())
}

fn print_macros(title: &str, macros: &Macros) {
    let pct = macros.percentages();
    println!(
        "{}: protein {:.0} g ({:.0}%), carbs {:.0} g ({:.0}%), fat {:.0} g ({:.0}%)",
        title,
        macros.protein_g,
        pct.protein_percent,
        macros.carbs_g,
        pct.carbs_percent,
        macros.fat_g,
        pct.fat_percent
    );
}

fn cmd_readiness(
    config: &Config,
    input: &ReadinessInput,
    history: Option<&Path>,
    json: bool,
) -> Result<()> {
    let engine = CompositeScoreEngine::from_config(config)?;
    let result = engine.score(input)?;

    // Today's score leads the most-recent-first history
    let mut scores = vec![result.score];
    if let Some(path) = history {
        scores.extend(load_readiness_history(path)?);
    }

    let trend = match engine.trend(&scores) {
        Ok(trend) => Some(trend),
        Err(Error::InsufficientHistory { required, available }) => {
            tracing::debug!("No trend: {} of {} scores", available, required);
            None
        }
        Err(e) => return Err(e),
    };
    let average = history.and_then(|_| average_score(&scores));

    if json {
        return print_json(json!({
            "score": result.score,
            "recommendation": result.recommendation,
            "components": result.components,
            "trend": trend,
            "average": average,
        }));
    }

    println!("Readiness:      {}/100", result.score);
    println!("Recommendation: {:?}", result.recommendation);
    match trend {
        Some(trend) => println!("Trend:          {:?}", trend),
        None => println!("Trend:          not enough history"),
    }
    if let Some(average) = average {
        println!("Average:        {}", average);
    }
    Ok(())
}

fn cmd_rpe(config: &Config, current: &RpeInput, history: Option<&Path>, json: bool) -> Result<()> {
    let advisor = LoadAutoregulationAdvisor::from_config(config)?;
    let entry = advisor.scale_entry(current.rpe)?.clone();

    let history = match history {
        Some(path) => load_rpe_history(path, Some(&current.exercise))?,
        None => Vec::new(),
    };
    let advice = advisor.advise(current, &history)?;

    if json {
        return print_json(json!({
            "advice": advice,
            "scale": entry,
        }));
    }

    println!(
        "RPE {} ({}, {} reps in reserve)",
        entry.value, entry.label, entry.reps_in_reserve
    );
    println!(
        "{}: {:?} (mean RPE {:.2} over {} sessions)",
        advice.exercise, advice.suggestion, advice.basis.mean_rpe, advice.basis.window
    );
    Ok(())
}

fn cmd_config_init(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::default_config_path()?,
    };
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    Config::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn print_json(value: serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
