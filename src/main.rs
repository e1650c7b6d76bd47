use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rbtree_map::RBTreeMap;
use std::collections::HashMap;
use std::process::ExitCode;
use std::time::Instant;

mod config;

use config::HarnessConfig;

fn keys_for(config: &HarnessConfig) -> Vec<u64> {
    match config.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..config.count).map(|_| rng.gen()).collect()
        }
        None => (0..config.count as u64).collect(),
    }
}

fn run(config: &HarnessConfig) -> Result<(), rbtree_map::MapError> {
    let keys = keys_for(config);
    info!(
        "inserting {} keys ({})",
        keys.len(),
        match config.seed {
            Some(seed) => format!("random, seed {}", seed),
            None => "sequential".to_string(),
        }
    );

    let start = Instant::now();
    let mut hash_map = HashMap::new();
    for &k in &keys {
        hash_map.entry(k).or_insert("dictionary");
    }
    info!("HashMap:    {:?}", start.elapsed());

    let start = Instant::now();
    let mut tree = RBTreeMap::new();
    for &k in &keys {
        tree.insert(k, "tree");
    }
    info!("RBTreeMap:  {:?}", start.elapsed());

    tree.validate()?;
    info!(
        "tree holds {} entries with black height {}",
        tree.len(),
        tree.black_height()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match HarnessConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("bad configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
