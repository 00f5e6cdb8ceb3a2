use clap::Parser;
use contactbook::cli::display::Renderer;
use contactbook::cli::{run_command, run_session, ui, Cli};
use contactbook::config::{Paths, Settings};
use contactbook::db::SnapshotStore;
use contactbook::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let paths = Paths::resolve()?;
    std::fs::create_dir_all(paths.dir())?;

    // Logging is optional: a read-only data dir should not stop the app
    if let Err(e) = logging::init_logger(&paths.log_file()) {
        ui::error(&format!("logging disabled: {}", e));
    }

    let settings = Settings::load(&paths.config_file())?;
    let data_file = cli.file.clone().unwrap_or_else(|| settings.data_file(&paths));
    let store = SnapshotStore::new(data_file);
    let view = cli.view.unwrap_or(settings.view);
    let renderer = Renderer::for_stdout(view);
    let clock = cli.clock();

    match cli.command {
        None => {
            // No subcommand provided - start the interactive session
            run_session(&store, renderer, clock, settings.greeting)?;
        }
        Some(ref command) => {
            let book = store.load();
            let response = run_command(&book, command, clock.today())?;
            println!("{}", renderer.render(&response));
        }
    }

    Ok(())
}
