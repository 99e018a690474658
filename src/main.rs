use anyhow::{Context, Result};
use clap::Parser;
use copycat::eval::{ClassicalScorer, LearnedScorer, Scorer};
use copycat::library::MoveLibrary;
use copycat::select::Controller;
use copycat::uci::UciSession;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "UCI chess engine that imitates a player's move patterns", long_about = None)]
struct Args {
    /// Path to a move library JSON file (defaults to the built-in book)
    #[arg(long)]
    book: Option<PathBuf>,

    /// Path to a trained scorer artifact; without it the classical
    /// evaluator is used
    #[arg(long)]
    model: Option<PathBuf>,

    /// JSON file with per-term weights for the classical evaluator
    #[arg(long)]
    eval_config: Option<PathBuf>,

    /// Emit stage and timing diagnostics as info strings
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let library = match &args.book {
        Some(path) => {
            let lib = MoveLibrary::load(path)
                .with_context(|| format!("load move library: {}", path.display()))?;
            info!("loaded move library '{}' ({} positions)", lib.name(), lib.len());
            lib
        }
        None => MoveLibrary::embedded(),
    };

    // A configured model that fails to load is a fatal startup error; a
    // missing --model is not, the classical scorer covers that case.
    let oracle: Arc<dyn Scorer> = match &args.model {
        Some(path) => {
            let scorer = LearnedScorer::load(path)
                .with_context(|| format!("load model: {}", path.display()))?;
            Arc::new(scorer)
        }
        None => {
            let weights = match &args.eval_config {
                Some(path) => copycat::eval::classical::load_weights(path)?,
                None => Default::default(),
            };
            Arc::new(ClassicalScorer::new(weights))
        }
    };
    info!("oracle: {}", oracle.name());

    let mut session = UciSession::new(Controller::new(Arc::new(library), oracle));
    session.set_debug(args.debug);
    session.run()
}
