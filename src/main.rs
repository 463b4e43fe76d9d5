use std::io;

use clap::Parser;

use gpx::solvers::Cplex;
use gpx::tutorial::{Tutorial, TutorialConfig};

fn main() -> anyhow::Result<()> {
    let config = TutorialConfig::parse();
    config.init_logging();
    log::debug!("starting with {:?}", config);

    let backend = Cplex::with_command(config.cplex.clone());
    let stdin = io::stdin();
    let mut tutorial = Tutorial::new(backend, config, stdin.lock(), io::stdout());
    tutorial.run()
}
