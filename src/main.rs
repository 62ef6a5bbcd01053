fn main() {
  if let Err(e) = periodization_engine::run() {
    eprintln!("periodization-engine: {}", e);
    std::process::exit(1);
  }
}
