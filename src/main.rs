use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};

use monster_forge::config::ForgeConfig;
use monster_forge::data::{Bucket, Catalog};
use monster_forge::dex::{art_prompt, dex_entry, generate_dex_batch, write_entries};
use monster_forge::monster::{reroll_cached, ForgeRequest, RerollOptions, RerollOutcome, SeedForge};
use monster_forge::naming::NameSynthesizer;
use monster_forge::persistence::MonsterCache;

#[derive(Parser, Debug)]
#[command(name = "monster_forge")]
#[command(about = "Procedurally generate monsters with types, mutagens and names")]
struct Args {
    /// Random seed (uses random seed if not specified)
    #[arg(short = 'S', long, global = true)]
    seed: Option<u64>,

    /// JSON file with generation settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory with catalog overrides (types.json, mutagens.json, tables.json)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Cache file for saved monsters
    #[arg(long, global = true, default_value = "monsters.jsonl")]
    cache: PathBuf,

    /// Log selection decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Canonical dex entries, no mutagens
    Dexentry {
        #[arg(short, long)]
        primary: Option<String>,

        #[arg(short, long)]
        secondary: Option<String>,

        /// Number of entries
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Write entries to this file as well
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// One mutated monster, printed as JSON
    Unique {
        #[arg(short, long)]
        primary: Option<String>,

        #[arg(short, long)]
        secondary: Option<String>,

        /// Dex number
        #[arg(long, default_value = "1")]
        id: u64,

        #[arg(long, default_value = "1")]
        majors: usize,

        #[arg(long, default_value = "1")]
        utils: usize,

        /// Append the monster to the cache
        #[arg(long)]
        save: bool,

        /// Print an art prompt too
        #[arg(long)]
        prompt: bool,

        /// Print this many alternative names
        #[arg(long)]
        alternatives: Option<usize>,
    },

    /// Many mutated monsters as dex entries
    Batch {
        #[arg(short, long)]
        count: usize,

        #[arg(long, default_value = "1")]
        majors: usize,

        #[arg(long, default_value = "1")]
        utils: usize,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        save: bool,
    },

    /// Show catalog contents
    List {
        #[arg(long)]
        types: bool,

        #[arg(long)]
        habitats: bool,

        #[arg(long)]
        mutagens: bool,
    },

    /// Re-roll a cached monster into a new record
    Reroll {
        id: String,

        #[arg(long)]
        traits: bool,

        #[arg(long)]
        majors: bool,
    },

    /// Print a cached monster as a dex entry
    Show {
        id: String,

        #[arg(long)]
        prompt: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose { "monster_forge=debug" } else { "monster_forge=info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn load_catalog(dir: Option<&Path>) -> Result<Catalog, Box<dyn Error>> {
    let catalog = match dir {
        Some(dir) => Catalog::load_from(dir)?,
        None => Catalog::defaults()?,
    };
    Ok(catalog)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => ForgeConfig::load(path)?,
        None => ForgeConfig::default(),
    };
    let catalog = load_catalog(args.data.as_deref())?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    info!(seed, "rng seeded");

    let forge = SeedForge::new(&catalog, &config);

    match args.command {
        Command::Dexentry { primary, secondary, count, output } => {
            let mut entries = Vec::with_capacity(count);
            for idnum in 1..=count as u64 {
                let request = ForgeRequest {
                    idnum,
                    primary_type: primary.clone(),
                    secondary_type: secondary.clone(),
                    ..ForgeRequest::default()
                };
                let monster = forge.forge(&request, &mut rng)?;
                entries.push(dex_entry(&monster, &catalog));
            }
            for entry in &entries {
                println!("{entry}\n");
            }
            if let Some(path) = output {
                write_entries(&path, &entries)?;
            }
        }

        Command::Unique { primary, secondary, id, majors, utils, save, prompt, alternatives } => {
            let request = ForgeRequest {
                idnum: id,
                primary_type: primary,
                secondary_type: secondary,
                majors,
                utilities: utils,
                ..ForgeRequest::default()
            };
            let mut monster = forge.forge(&request, &mut rng)?;
            if save {
                let mut cache = MonsterCache::open(&args.cache)?;
                let unique_id = cache.save(&mut monster, &mut rng)?;
                println!("Saved as {unique_id} in {}", cache.path().display());
            }
            println!("{}", serde_json::to_string_pretty(&monster)?);
            if prompt {
                println!("\n{}", art_prompt(&monster, &catalog));
            }
            if let Some(count) = alternatives {
                let names = NameSynthesizer::new(&catalog, &config.naming)
                    .generate_alternative_names(&monster, count, &mut rng);
                println!("\nAlternative names:");
                for name in names {
                    println!("  {name}");
                }
            }
        }

        Command::Batch { count, majors, utils, output, save } => {
            let mut monsters = generate_dex_batch(&forge, count, majors, utils, &mut rng)?;
            if save {
                let mut cache = MonsterCache::open(&args.cache)?;
                for monster in &mut monsters {
                    cache.save(monster, &mut rng)?;
                }
            }
            let entries: Vec<String> = monsters.iter().map(|m| dex_entry(m, &catalog)).collect();
            match output {
                Some(path) => write_entries(&path, &entries)?,
                None => {
                    for entry in &entries {
                        println!("{entry}\n");
                    }
                }
            }
        }

        Command::List { types, habitats, mutagens } => {
            let all = !types && !habitats && !mutagens;
            if types || all {
                println!("Types:");
                for t in catalog.types() {
                    println!("  {:<10} ({}) weight {:.2}", t.name, t.adjective, t.weight);
                }
                println!("Incompatible pairs:");
                for (a, b) in catalog.incompatible_pairs() {
                    println!("  {a} / {b}");
                }
            }
            if habitats || all {
                println!("Habitats:");
                for h in catalog.habitats() {
                    println!("  {h}");
                }
            }
            if mutagens || all {
                for bucket in Bucket::ALL {
                    println!("Mutagens ({bucket}):");
                    for m in catalog.mutagens(bucket) {
                        println!("  {:<20} rarity {:.2}", m.name, m.rarity);
                    }
                }
            }
        }

        Command::Reroll { id, traits, majors } => {
            let mut cache = MonsterCache::open(&args.cache)?;
            let options = RerollOptions { traits, majors };
            match reroll_cached(&mut cache, &id, options, &catalog, &config, &mut rng)? {
                RerollOutcome::Rerolled(monster) => {
                    println!("Saved as {}", monster.unique_id().unwrap_or("?"));
                    println!("{}", dex_entry(&monster, &catalog));
                }
                RerollOutcome::Exhausted => println!("No replacement mutagen left for {id}"),
                RerollOutcome::Unchanged => println!("Nothing to re-roll: pass --traits and/or --majors"),
            }
        }

        Command::Show { id, prompt } => {
            let cache = MonsterCache::open(&args.cache)?;
            let monster = cache.load(&id)?;
            println!("{}", dex_entry(&monster, &catalog));
            if prompt {
                println!("\n{}", art_prompt(&monster, &catalog));
            }
        }
    }
    Ok(())
}
