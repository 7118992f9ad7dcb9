fn main() {
    if let Err(e) = moodline::cli::main() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
