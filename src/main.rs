fn main() {
    if let Err(err) = profitlens::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
