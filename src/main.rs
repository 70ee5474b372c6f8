fn main() {
    std::process::exit(sigscan::app::startup::run());
}
