//! Default logging setup for linprobe and programs embedding it
#![deny(unsafe_code)]
#![warn(missing_docs)]

use std::time::Instant;

/// Environment variable holding the `env_logger` filter, e.g. `LINPROBE_LOG=linprobe=debug`.
pub const FILTER_ENV: &str = "LINPROBE_LOG";
/// Environment variable controlling colored output (`auto`, `always` or `never`).
pub const STYLE_ENV: &str = "LINPROBE_LOG_STYLE";

const TIMESTAMP_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightBlack)));

const TARGET_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Magenta)));

fn builder() -> env_logger::Builder {
    let start_time = Instant::now();

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or(FILTER_ENV, "info")
            .write_style(STYLE_ENV),
    );
    builder.format(move |buf, record| {
        use std::io::Write;

        let timestamp = start_time.elapsed();
        let level = record.level();

        writeln!(
            buf,
            "{} {} {} {}",
            format_args!("{style}{timestamp:>9.2?}{style:#}", style = TIMESTAMP_STYLE),
            format_args!(
                "{style}{level:<5}{style:#}",
                style = buf.default_level_style(level),
            ),
            format_args!("{style}{}{style:#}", record.target(), style = TARGET_STYLE),
            record.args(),
        )
    });
    builder
}

/// Installs the default logger.
///
/// # Panics
///
/// Panics if a logger was already installed.
pub fn setup() {
    builder().init();
}

/// Installs the default logger writing through the test harness's captured output.
///
/// Can be called from every test; only the first call has an effect.
pub fn setup_for_tests() {
    let _ = builder().is_test(true).try_init();
}
