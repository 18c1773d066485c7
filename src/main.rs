fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();

    if let Err(err) = nmr_label_layout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
