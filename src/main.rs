use std::io;
use std::process;
use std::sync::Arc;

use wordle_game::arbiter::Arbiter;
use wordle_game::cli::{CliInterface, parse_cli};
use wordle_game::evaluator::ExternalEvaluator;
use wordle_game::game_state::game_loop;
use wordle_game::native::{NativeEvaluator, stage_word_list};
use wordle_game::stats::{StatsStore, default_stats_path};
use wordle_game::tui::TuiInterface;
use wordle_game::wordbank::{EMBEDDED_WORDBANK, load_catalog_from_file, load_catalog_from_str};
use wordle_game::{info_log, logging};

fn main() {
    let cli = parse_cli();
    if cli.tui {
        logging::init_for_tui(cli.verbose);
    } else {
        logging::init(cli.verbose);
    }

    let catalog = match &cli.words_path {
        Some(path) => match load_catalog_from_file(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => load_catalog_from_str(EMBEDDED_WORDBANK),
    };
    if catalog.is_empty() {
        eprintln!("The word catalog contains no usable words.");
        process::exit(1);
    }
    info_log!("Loaded {} words", catalog.len());

    if cli.list_categories {
        for category in catalog.categories() {
            println!("{category}");
        }
        return;
    }

    let evaluator: Option<Box<dyn ExternalEvaluator>> = cli.native_lib.as_deref().and_then(|lib| {
        stage_word_list(lib, cli.words_path.as_deref());
        match NativeEvaluator::load(lib) {
            Ok(native) => {
                info_log!("Native evaluator loaded from {}", lib.display());
                Some(Box::new(native) as Box<dyn ExternalEvaluator>)
            }
            Err(e) => {
                log::warn!("Native evaluator unavailable, scoring locally: {e}");
                None
            }
        }
    });

    let mut stats = if cli.no_stats {
        StatsStore::disabled()
    } else {
        match cli.stats_path.clone().or_else(default_stats_path) {
            Some(path) => StatsStore::open(path),
            None => StatsStore::disabled(),
        }
    };

    let config = cli.game_config();
    let mut arbiter = Arbiter::new(Arc::new(catalog), evaluator);

    let result = if cli.tui {
        match TuiInterface::new() {
            Ok(mut tui) => game_loop(&mut arbiter, &config, &mut stats, &mut tui),
            Err(e) => {
                eprintln!("Failed to initialize terminal: {e}");
                process::exit(1);
            }
        }
    } else {
        let stdin = io::stdin();
        let mut interface = CliInterface::new(stdin.lock());
        game_loop(&mut arbiter, &config, &mut stats, &mut interface)
    };

    if let Err(e) = result {
        eprintln!("{e}");
        process::exit(1);
    }
}
