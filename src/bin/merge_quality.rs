use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    slam_datagen::app::run_merge_quality(std::env::args().skip(1))
}
