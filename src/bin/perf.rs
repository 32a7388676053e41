use log::{info, warn};
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use structopt::StructOpt;

use std::time;

use rbidx::RbTree;

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "inserts", default_value = "0")]
    inserts: usize,

    #[structopt(long = "deletes", default_value = "0")]
    deletes: usize,

    #[structopt(long = "searches", default_value = "0")]
    searches: usize,

    #[structopt(long = "validate")]
    validate: bool,

    #[structopt(long = "verbose")]
    verbose: bool,
}

fn main() {
    let opts = Opt::from_args();

    let level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto).ok();

    let seed = opts.seed.unwrap_or_else(random);
    info!("seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: RbTree<u64> = RbTree::new();

    // initial load
    let start = time::Instant::now();
    for _i in 0..opts.loads {
        index.insert(rng.gen::<u64>());
    }
    info!("loaded {} keys in {:?}", opts.loads, start.elapsed());

    do_incremental(&mut rng, &opts, &mut index);

    let start = time::Instant::now();
    let n = index.iter().count();
    info!("iter for iterating {}, took {:?}", n, start.elapsed());

    if opts.validate {
        let start = time::Instant::now();
        match index.validate() {
            Ok(stats) => info!("validate {} took {:?}", stats, start.elapsed()),
            Err(err) => warn!("validate failed {}", err),
        }
    } else {
        info!("stats {}", index.stats());
    }
}

fn do_incremental(rng: &mut SmallRng, opts: &Opt, index: &mut RbTree<u64>) {
    let total = opts.inserts + opts.deletes + opts.searches;
    if total == 0 {
        return;
    }

    let start = time::Instant::now();
    let (mut n_found, mut n_deleted) = (0_usize, 0_usize);
    for _i in 0..total {
        let op = rng.gen::<usize>() % total;
        // pick keys near existing ones often enough to hit the tree.
        let key = match index.range(rng.gen::<u64>()..).next() {
            Some(key) if rng.gen::<bool>() => *key,
            _ => rng.gen::<u64>(),
        };

        if op < opts.inserts {
            index.insert(key);
        } else if op < (opts.inserts + opts.deletes) {
            if index.delete(&key) {
                n_deleted += 1;
            }
        } else if index.contains(&key) {
            n_found += 1;
        }
    }
    info!(
        "incremental for operations {}, deleted {} found {}, took {:?}",
        total,
        n_deleted,
        n_found,
        start.elapsed()
    );
}
