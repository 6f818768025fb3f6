use std::path::PathBuf;
use std::time::Instant;

use crate::cli_app;
use crate::game::Game;
use crate::inout::Data;
use crate::loader::{ImagePool, Loader};
use crate::prefs::Prefs;
use crate::tui;

// Run one game session in the terminal and write the session data file
pub fn play() {
    let args = cli_app::parse_args();

    let pool = ImagePool::from_sources(&args.image_paths, args.pool_dir.as_deref())
        .unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(2);
        });

    if args.verbosity > 0 {
        println!("Image pool holds {} source(s)", pool.len());
    }

    let prefs_filepath = PathBuf::from(&args.prefs_filepath);
    let mut prefs = Prefs::load(&prefs_filepath);
    let loader = Loader::new(args.width, args.height);
    let mut game = Game::new();

    let start_at = Instant::now();
    let outcome = tui::run(
        &mut game,
        &pool,
        &loader,
        &mut prefs,
        &prefs_filepath,
        (args.width, args.height),
    )
    .expect("Terminal failure");

    for warning in &outcome.warnings {
        eprintln!("{}", warning);
    }

    if let Some(tally) = outcome.tally {
        println!("Final score: {}", tally);
    }

    if let Some(ref data_filepath) = args.data_filepath {
        let totals = game.totals();
        let data = Data {
            image_width: args.width,
            image_height: args.height,
            rounds: outcome.records,
            total_score: totals.total_score,
            completed_rounds: totals.completed_rounds,
            max_possible: totals.completed_rounds * 10,
            elapsed_seconds: start_at.elapsed().as_secs_f64(),
        };
        std::fs::write(data_filepath, serde_json::to_string(&data).unwrap())
            .expect("Unable to write file");
    }

    if args.verbosity > 1 {
        println!(
            "(Recap) rounds completed: {}, total score: {:.2}",
            game.totals().completed_rounds,
            game.totals().total_score
        );
    }
}
