use anyhow::Result;
use pl_match_predictor::utils::data::save_rolled_to_csv;
use pl_match_predictor::{prepare_rolled_matches, run_full_analysis, AnalysisConfig, AnalysisData};

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("Premier League Match Predictor\n");

    let config = AnalysisConfig::from_env();
    let use_cache = std::env::var("USE_CACHE").unwrap_or_default() == "1";
    let save_csv = std::env::var("SAVE_CSV").unwrap_or_default() == "1";

    println!(
        "Loading match table from {} (window: {}, cutoff: {})\n",
        config.matches_csv.display(),
        config.window,
        config.cutoff
    );

    if save_csv {
        let rolled = prepare_rolled_matches(&config)?;
        save_rolled_to_csv(&rolled, "cache/modified_matches.csv")?;
        println!("Saved rolled match table to cache/modified_matches.csv\n");
    }

    let data = run_full_analysis(&config, use_cache)?;
    print_analysis(&data);

    Ok(())
}

fn print_analysis(data: &AnalysisData) {
    println!("INITIAL MODEL\n");
    println!(
        "Precision score (initial model): {:.2}%",
        data.initial_report.precision_pct
    );
    println!(
        "Trained on {} matches, evaluated on {}\n",
        data.initial_report.train_rows, data.initial_report.test_rows
    );

    println!("ROLLING MODEL\n");
    println!(
        "Precision score (rolling model): {:.2}%",
        data.rolling_report.precision_pct
    );
    println!(
        "Trained on {} matches, evaluated on {}\n",
        data.rolling_report.train_rows, data.rolling_report.test_rows
    );
    for (i, row) in data.rolling_report.predictions.iter().take(10).enumerate() {
        println!("{}. {}", i + 1, row.format());
    }
    if data.rolling_report.predictions.len() > 10 {
        println!(
            "... and {} more",
            data.rolling_report.predictions.len() - 10
        );
    }

    println!("\nPAIRED FIXTURES\n");
    if data.paired.pairs == 0 {
        println!("No fixtures with one side predicted to win and the other to lose/draw.");
    } else {
        println!(
            "{} fixtures with one side predicted to win and the other to lose/draw",
            data.paired.pairs
        );
        println!(
            "Predicted winner won {} of them ({:.2}%)",
            data.paired.wins, data.paired.precision_pct
        );
    }

    println!("\nPREDICTED WINS\n");
    for team in &data.predicted_wins {
        println!("{}: {}", team.team, team.wins);
    }
}
