use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trombi::generate::Site;
use trombi::{collect, config, generate, output, person, process, search};

/// Flags that override `config.toml` values for one run.
#[derive(clap::Args, Clone)]
struct BuildArgs {
    /// Pin the homepage card shuffle (same seed, same order)
    #[arg(long)]
    seed: Option<u64>,

    /// Cap the number of parallel thumbnail workers
    #[arg(long)]
    threads: Option<usize>,
}

fn version_string() -> &'static str {
    let hash = env!("GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup — trivial, called exactly once
        Box::leak(format!("{} ({hash})", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "trombi")]
#[command(about = "Static site generator for team directories")]
#[command(long_about = "\
Static site generator for team directories (trombinoscopes)

Markdown files with YAML front-matter are the data source: one file per
collaborator, one per editorial page. Filenames starting with _ are drafts
and are ignored.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── pages/
  │   └── qui-sommes-nous.md       # Page → pages/qui-sommes-nous.html
  └── persons/
      ├── jean-dupont.md           # Person → homepage card + person/jean-dupont.html
      └── _nouvelle-recrue.md      # Draft — ignored
  static/
  └── photos/
      └── jean.jpg                 # Referenced by `photo: jean.jpg`

Person front-matter:

  titre:              displayed role, searchable
  domaines_metiers:   list of business domains, searchable
  technologies:       list of technologies, searchable
  photo:              file under static/photos/ (thumbnailed automatically)
  gravatar:           true (derive from mail) or an address — replaces photo
  mail, telephone:    become obfuscated contact links

Run 'trombi gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "_site", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: collect → enrich → generate → thumbnails
    Build(BuildArgs),
    /// Validate content without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(build_args) => {
            let mut config = config::load_config(&cli.source)?;
            if let Some(seed) = build_args.seed {
                config.homepage.shuffle_seed = Some(seed);
            }
            if let Some(threads) = build_args.threads {
                config.processing.max_processes = Some(threads);
            }
            config.validate()?;

            println!("==> Stage 1: Collecting {}", cli.source.display());
            let pages = collect::collect_dir(&cli.source.join("pages"))?;
            let entities = collect::collect_dir(&cli.source.join("persons"))?;
            let persons = person::enrich_all(&entities)?;
            println!("    {} pages, {} persons", pages.len(), persons.len());

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let index = search::build_index(&persons);
            let site = Site {
                pages,
                persons,
                index,
            };
            let static_dir = PathBuf::from(&config.static_dir);
            let stats = generate::generate(&static_dir, &cli.output, &config, &site)?;

            println!("==> Stage 3: Processing thumbnails");
            init_thread_pool(&config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_process_event(&event);
                }
            });
            let thumbnails = process::process(&cli.output, &config, Some(tx))?;
            printer.join().unwrap();

            output::print_build_summary(&stats, &thumbnails, &cli.output);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let config = config::load_config(&cli.source)?;
            let pages = collect::collect_dir(&cli.source.join("pages"))?;
            let entities = collect::collect_dir(&cli.source.join("persons"))?;
            let persons = person::enrich_all(&entities)?;

            let photos_dir = PathBuf::from(&config.static_dir).join("photos");
            output::print_check_output(&persons, &pages, &photos_dir);

            let missing = persons
                .iter()
                .filter(|p| output::local_photo_missing(p, &photos_dir))
                .count();
            if missing > 0 {
                return Err(format!(
                    "{missing} referenced photo(s) missing from {}",
                    photos_dir.display()
                )
                .into());
            }
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
