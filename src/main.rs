fn main() {
    if let Err(err) = qa_tracker_lib::run() {
        eprintln!("qa-tracker: {}", err);
        std::process::exit(1);
    }
}
