use clap::Parser;
use geocaching_json::{
    client::blocking::GeocachingClient,
    config::GeocachingApiConfiguration,
    protocol::{
        Filter,
        v6::{
            filter::{GeocacheExclusionsFilter, PointRadiusFilter, QueryBuilder},
            response::SearchForGeocachesResponse,
        },
    },
};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// OAuth access token
    #[arg(short, long, env = "GEOCACHING_ACCESS_TOKEN")]
    token: String,
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
    #[arg(short, long, default_value = "1000")]
    radius: i64,
    #[arg(short, long, default_value = "20")]
    max: u32,
    #[arg(long)]
    entry_point: Option<String>,
    /// Log response bodies
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = GeocachingApiConfiguration::default().with_debug(args.debug);
    if let Some(url) = args.entry_point {
        config.entry_point_url = url;
    }

    let client = GeocachingClient::new(&config).unwrap();

    let filters: Vec<Box<dyn Filter>> = vec![
        Box::new(PointRadiusFilter::new(args.lat, args.lon, args.radius)),
        Box::new(GeocacheExclusionsFilter::new(Some(false), Some(true), None)),
    ];
    let query = QueryBuilder::new()
        .field("AccessToken", &args.token)
        .and_then(|q| q.field("IsLite", true))
        .and_then(|q| q.field("MaxPerPage", args.max))
        .and_then(|q| q.field("GeocacheLogCount", 0))
        .and_then(|q| q.filters(&filters))
        .unwrap();

    let result = match client
        .call("SearchForGeocaches", &query)
        .and_then(|response| response.decode::<SearchForGeocachesResponse>())
    {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Search failed: {e}");
            return;
        }
    };

    if let Some(status) = result.status.as_ref().filter(|s| !s.is_ok()) {
        eprintln!("Service error {:?}: {:?}", status.code, status.message);
        return;
    }

    println!(
        "{} of {:?} matching caches",
        result.geocaches.len(),
        result.total_matching_caches
    );
    for cache in &result.geocaches {
        println!(
            "{:<10} {:<12} D{:?}/T{:?}  {}",
            cache.code.as_deref().unwrap_or("?"),
            cache
                .geocache_type
                .map(|ty| format!("{ty:?}"))
                .unwrap_or_default(),
            cache.difficulty.unwrap_or_default(),
            cache.terrain.unwrap_or_default(),
            cache.name.as_deref().unwrap_or_default(),
        );
    }
}
