use anyhow::Result;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert an image to 8-bit grayscale, written to bw_<input>")]
struct Args {
    /// Input image path (png/jpg/etc)
    #[arg(allow_hyphen_values = true)]
    input: PathBuf,

    /// Anything after the input path is accepted and ignored.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    _rest: Vec<OsString>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    bw_convert::convert_file(&args.input)?;
    Ok(())
}
