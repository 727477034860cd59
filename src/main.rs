fn main() {
    env_logger::init();
    let matches = multizone::cli::build_command().get_matches();

    if let Err(err) = multizone::cli::run(&matches) {
        log::error!("{err:?}");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
