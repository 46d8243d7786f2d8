use bisup::print_error;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_env("BISUP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

fn main() {
    init_logging();
    if let Err(err) = bisup::cmd::run() {
        print_error!("{err}");
        std::process::exit(err.exit_code());
    }
}
