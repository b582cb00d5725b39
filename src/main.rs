// SPDX-License-Identifier: MIT
use clap::Parser;

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<std::path::PathBuf>,

    /// Source language, matched verbatim with xml:lang (default: en)
    #[arg(long, value_parser = lang_code)]
    source_lang: Option<String>,

    /// Target language, matched verbatim with xml:lang (default: es)
    #[arg(long, value_parser = lang_code)]
    target_lang: Option<String>,

    /// Input TBX file
    input: std::path::PathBuf,

    /// Output TSV file
    output: std::path::PathBuf,
}

/// Language code, at least 2 characters without whitespace
fn lang_code(s: &str) -> Result<String, String> {
    if s.chars().count() < 2 {
        Err(format!("language code {:?} is too short", s))
    } else if s.chars().any(char::is_whitespace) {
        Err(format!("language code {:?} contains whitespace", s))
    } else {
        Ok(s.to_string())
    }
}

fn run(cli: Cli) -> tbx2tsv::Result<usize> {
    let config = if let Some(cfg_file) = &cli.config {
        tbx2tsv::Config::with_config(cfg_file)?
    } else {
        tbx2tsv::Config::new()?
    };
    let langs = config.language_pair(cli.source_lang, cli.target_lang);
    log::debug!("Converting {:?} => {:?}", langs.source, langs.target);

    tbx2tsv::convert_tbx_file(&cli.input, &cli.output, &langs)
}

fn main() -> std::process::ExitCode {
    env_logger::init();

    // parse commandline
    let cli = Cli::parse();
    let output = cli.output.clone();

    match run(cli) {
        Ok(count) => {
            println!("Converted {} entries to {}", count, output.display());
            std::process::ExitCode::SUCCESS
        }
        Err(err) => {
            log::debug!("{:?}", err);
            eprintln!("Error: {}", err);
            std::process::ExitCode::FAILURE
        }
    }
}
