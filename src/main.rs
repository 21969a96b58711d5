fn main() {
    if let Err(err) = strategic_stock::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
