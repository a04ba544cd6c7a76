use std::io::Write;

use log::LevelFilter;

/// Route `log` records to stderr as `<program>:<level>: <message>`.
///
/// `verbose` lowers the default filter from warnings to debug output.
/// `RUST_LOG` still takes precedence when set.
pub fn init(program: &str, verbose: bool) {
    let program = program.to_string();
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(move |buf, record| {
            writeln!(
                buf,
                "{}:{}: {}",
                program,
                record.level().as_str().to_lowercase(),
                record.args()
            )
        })
        .try_init();
}
