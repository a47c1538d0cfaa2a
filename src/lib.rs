pub mod gameplay;
pub mod hoo;
pub mod hoot;
pub mod simulate;

/// dimensional analysis types
pub type Reward = f64;
pub type Action = Vec<f64>;

// planner defaults
const N_ACTIONS: usize = 150;
const SEARCH_DEPTH: usize = 50;
const ALGORITHM_ITER: usize = 100;
const GAMMA: f64 = 0.99;
const CE: f64 = 1.0;

// poly-hoo confidence schedule defaults
const POLY_ALPHA: f64 = 5.0;
const POLY_ETA: f64 = 20.0;
const POLY_XI: f64 = 0.5;

/// trait for random generation, for tests that want unremarkable inputs
pub trait Arbitrary {
    fn random() -> Self;
}

/// progress bar over committed actions
pub fn progress(n: usize) -> indicatif::ProgressBar {
    let style = "{spinner:.cyan} {elapsed} ~ {percent:>3}% {wide_bar:.cyan}";
    let style = indicatif::ProgressStyle::with_template(style).unwrap();
    let progress = indicatif::ProgressBar::new(n as u64);
    progress.set_style(style);
    progress
}

/// initialize terminal and file logging
pub fn init() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
