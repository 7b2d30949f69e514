mod commands;
mod terminal;

use commands::{CommandLine, import};
use drone_bbot_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    if commands.show_version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    logging::init_logging()?;

    let cfg = Config::resolve(commands.into_invocation(), |key| std::env::var(key).ok())?;

    print::header("importing bbot results");
    import::import(&cfg).await
}
