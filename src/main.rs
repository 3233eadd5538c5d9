//main.rs
use clap::{Parser, ValueEnum};
use vector_kmeans::{DataSet, InitStrategy, KMeans, KMeansConfig};

#[derive(Parser)]
#[clap(version = "0.2.0")]
struct Opts {
    /// Input file: one point per row, comma-separated components
    #[clap(short, long)]
    file: String,

    /// Number of clusters
    #[clap(short, long)]
    k: usize,

    /// Components per point
    #[clap(short, long)]
    dim: usize,

    /// Expected number of points; the row count must match when given
    #[clap(short = 'n', long)]
    points: Option<usize>,

    /// Iteration cap
    #[clap(long, default_value_t = 200)]
    max_iter: usize,

    /// Centroid seeding strategy
    #[clap(long, value_enum, default_value_t = InitArg::FirstK)]
    init: InitArg,

    /// RNG seed for random-sample seeding
    #[clap(long)]
    seed: Option<u64>,

    /// Write the centroids here instead of stdout
    #[clap(short, long)]
    outfile: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum InitArg {
    FirstK,
    RandomSample,
}

impl From<InitArg> for InitStrategy {
    fn from(arg: InitArg) -> Self {
        match arg {
            InitArg::FirstK => InitStrategy::FirstK,
            InitArg::RandomSample => InitStrategy::RandomSample,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let ds = DataSet::from_path(&opts.file, opts.dim)?;
    println!("Loaded {} points × {} components", ds.len(), ds.dim());

    if let Some(expected) = opts.points {
        if ds.len() != expected {
            anyhow::bail!("expected {} points, file has {}", expected, ds.len());
        }
    }

    let mut config = KMeansConfig::new(opts.k)
        .with_max_iter(opts.max_iter)
        .with_init(opts.init.into());
    if let Some(seed) = opts.seed {
        config = config.with_seed(seed);
    }

    let fit = KMeans::new(config).fit(ds.points())?;

    if fit.converged {
        println!("Converged after {} iterations", fit.iterations);
    } else {
        println!("Iteration cap reached after {} iterations", fit.iterations);
    }

    let mut out = String::new();
    for centroid in &fit.centroids {
        out.push_str(&centroid.to_string());
        out.push('\n');
    }

    match &opts.outfile {
        Some(path) => std::fs::write(path, out)?,
        None => print!("{}", out),
    }

    Ok(())
}
