use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    lightweight_coreset::app::run_coreset(std::env::args().skip(1))
}
