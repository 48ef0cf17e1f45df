use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Result};
use chromium_multibuild::{pipeline, Config, StepError};

fn usage() -> &'static str {
    "Usage:\n  chromium-multibuild [config.toml]\n\n\
     Run from the directory holding the .gclient file. Builds every commit\n\
     of chrome/VERSION whose MAJOR falls in the configured range, for every\n\
     configured architecture, and archives the artifacts under the release\n\
     directory."
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let root = std::env::current_dir()?;

    let cfg = match args.as_slice() {
        [] => Config::load(&root, None)?,
        [config] if config != "-h" && config != "--help" => {
            Config::load(&root, Some(Path::new(config)))?
        }
        _ => bail!(usage()),
    };

    pipeline::run(&cfg)
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[multibuild] error: {:#}", err);
            let code = err
                .downcast_ref::<StepError>()
                .map(StepError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}
