use std::io::Write;

/// Installs the stderr logger. `RUST_LOG` wins over the `debug` flag.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(debug: bool) {
    let filter = if debug { "debug" } else { "warn" };

    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();

    if result.is_ok() {
        log::debug!("logging initialized at {}", filter);
    }
}
